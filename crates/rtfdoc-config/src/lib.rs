//! Configuration management for rtfdoc.
//!
//! Parses `rtfdoc.toml` with serde and discovers the file in the current
//! directory or its parents. CLI settings are applied on top via
//! [`CliSettings`].
//!
//! ```toml
//! [render]
//! hyperlinks = true
//! cleanup = true
//! image_format = "png"
//! max_indent_level = 10
//! language = "cpp"
//!
//! [output]
//! dir = "rtf"
//!
//! [style]
//! stylesheet = "doc/rtf-style.cfg"
//! extensions = "doc/rtf-ext.cfg"
//!
//! [tools]
//! dot = "/usr/bin/dot"
//! plantuml_jar = "${PLANTUML_HOME}/plantuml.jar"
//! plantuml_include_path = "doc/uml"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `${VAR}` and `${VAR:-default}` are expanded in `output.dir`,
//! `style.stylesheet`, `style.extensions` and every `tools.*` value.

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "rtfdoc.toml";

/// Image formats the diagram tools can produce and RTF readers accept.
const IMAGE_FORMATS: [&str; 4] = ["png", "jpg", "gif", "svg"];

/// Deepest supported indent level count.
const MAX_INDENT_LEVELS: usize = 10;

/// CLI settings that override configuration file values.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override hyperlink generation.
    pub hyperlinks: Option<bool>,
    /// Override intermediate file cleanup.
    pub cleanup: Option<bool>,
    /// Override image format for rendered graphs.
    pub image_format: Option<String>,
    /// Override default source language.
    pub language: Option<String>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rendering options.
    pub render: RenderConfig,
    output: OutputConfigRaw,
    style: StyleConfigRaw,
    tools: ToolsConfigRaw,

    /// Resolved output directory (set after loading).
    #[serde(skip)]
    pub output_dir: PathBuf,
    /// Resolved style file locations (set after loading).
    #[serde(skip)]
    pub style_resolved: StyleConfig,
    /// Resolved external tools (set after loading).
    #[serde(skip)]
    pub tools_resolved: ToolsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Rendering options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Emit real hyperlink fields for cross-references.
    pub hyperlinks: bool,
    /// Delete intermediate diagram sources after rasterizing.
    pub cleanup: bool,
    /// Image format produced for dot graphs.
    pub image_format: String,
    /// Number of usable indent levels.
    pub max_indent_level: usize,
    /// Source language assumed for code without an explicit one.
    pub language: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            hyperlinks: true,
            cleanup: true,
            image_format: "png".to_owned(),
            max_indent_level: MAX_INDENT_LEVELS,
            language: "cpp".to_owned(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    dir: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct StyleConfigRaw {
    stylesheet: Option<String>,
    extensions: Option<String>,
}

/// Resolved stylesheet and extensions locations.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct StyleConfig {
    /// Stylesheet overriding built-in styles.
    pub stylesheet: Option<PathBuf>,
    /// Extensions file with document info fields.
    pub extensions: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ToolsConfigRaw {
    dot: Option<String>,
    mscgen: Option<String>,
    dia: Option<String>,
    java: Option<String>,
    plantuml_jar: Option<String>,
    plantuml_include_path: Option<String>,
}

/// External diagram tools.
#[derive(Debug, PartialEq, Eq)]
pub struct ToolsConfig {
    /// Graphviz `dot` executable.
    pub dot: PathBuf,
    /// `mscgen` executable.
    pub mscgen: PathBuf,
    /// `dia` executable.
    pub dia: PathBuf,
    /// Java runtime used for `PlantUML`.
    pub java: PathBuf,
    /// `plantuml.jar`, `PlantUML` is disabled without it.
    pub plantuml_jar: Option<PathBuf>,
    /// Directory searched by `!include` in `PlantUML` sources.
    pub plantuml_include_path: Option<PathBuf>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            dot: PathBuf::from("dot"),
            mscgen: PathBuf::from("mscgen"),
            dia: PathBuf::from("dia"),
            java: PathBuf::from("java"),
            plantuml_jar: None,
            plantuml_include_path: None,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`tools.plantuml_jar`").
        field: String,
        /// Error message (e.g., "${`PLANTUML_HOME`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `rtfdoc.toml` in the current directory and its parents, falling
    /// back to defaults relative to the current directory.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(output_dir) = &settings.output_dir {
            self.output_dir.clone_from(output_dir);
        }
        if let Some(hyperlinks) = settings.hyperlinks {
            self.render.hyperlinks = hyperlinks;
        }
        if let Some(cleanup) = settings.cleanup {
            self.render.cleanup = cleanup;
        }
        if let Some(image_format) = &settings.image_format {
            self.render.image_format.clone_from(image_format);
        }
        if let Some(language) = &settings.language {
            self.render.language.clone_from(language);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            render: RenderConfig::default(),
            output: OutputConfigRaw::default(),
            style: StyleConfigRaw::default(),
            tools: ToolsConfigRaw::default(),
            output_dir: base.join("rtf"),
            style_resolved: StyleConfig::default(),
            tools_resolved: ToolsConfig::default(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_render()?;
        self.validate_tools()?;
        Ok(())
    }

    fn validate_render(&self) -> Result<(), ConfigError> {
        let render = &self.render;

        if render.max_indent_level == 0 || render.max_indent_level > MAX_INDENT_LEVELS {
            return Err(ConfigError::Validation(format!(
                "render.max_indent_level must be between 1 and {MAX_INDENT_LEVELS}"
            )));
        }

        if !IMAGE_FORMATS.contains(&render.image_format.as_str()) {
            return Err(ConfigError::Validation(format!(
                "render.image_format must be one of {}",
                IMAGE_FORMATS.join(", ")
            )));
        }

        require_non_empty(&render.language, "render.language")?;
        Ok(())
    }

    fn validate_tools(&self) -> Result<(), ConfigError> {
        let tools = &self.tools_resolved;
        for (path, field) in [
            (&tools.dot, "tools.dot"),
            (&tools.mscgen, "tools.mscgen"),
            (&tools.dia, "tools.dia"),
            (&tools.java, "tools.java"),
        ] {
            require_non_empty(&path.to_string_lossy(), field)?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        expand::expand_opt(&mut self.output.dir, "output.dir")?;
        expand::expand_opt(&mut self.style.stylesheet, "style.stylesheet")?;
        expand::expand_opt(&mut self.style.extensions, "style.extensions")?;
        expand::expand_opt(&mut self.tools.dot, "tools.dot")?;
        expand::expand_opt(&mut self.tools.mscgen, "tools.mscgen")?;
        expand::expand_opt(&mut self.tools.dia, "tools.dia")?;
        expand::expand_opt(&mut self.tools.java, "tools.java")?;
        expand::expand_opt(&mut self.tools.plantuml_jar, "tools.plantuml_jar")?;
        expand::expand_opt(
            &mut self.tools.plantuml_include_path,
            "tools.plantuml_include_path",
        )?;
        Ok(())
    }

    /// Resolve relative paths against the config file directory.
    ///
    /// Tool names without a path separator stay as-is so they are looked up
    /// on `PATH`.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: &str| config_dir.join(path);
        let resolve_tool = |tool: Option<&str>, default: &str| match tool {
            Some(t) if t.contains('/') => config_dir.join(t),
            Some(t) => PathBuf::from(t),
            None => PathBuf::from(default),
        };

        self.output_dir = resolve(self.output.dir.as_deref().unwrap_or("rtf"));

        self.style_resolved = StyleConfig {
            stylesheet: self.style.stylesheet.as_deref().map(resolve),
            extensions: self.style.extensions.as_deref().map(resolve),
        };

        self.tools_resolved = ToolsConfig {
            dot: resolve_tool(self.tools.dot.as_deref(), "dot"),
            mscgen: resolve_tool(self.tools.mscgen.as_deref(), "mscgen"),
            dia: resolve_tool(self.tools.dia.as_deref(), "dia"),
            java: resolve_tool(self.tools.java.as_deref(), "java"),
            plantuml_jar: self.tools.plantuml_jar.as_deref().map(resolve),
            plantuml_include_path: self.tools.plantuml_include_path.as_deref().map(resolve),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert!(config.render.hyperlinks);
        assert!(config.render.cleanup);
        assert_eq!(config.render.image_format, "png");
        assert_eq!(config.render.max_indent_level, 10);
        assert_eq!(config.render.language, "cpp");
        assert_eq!(config.output_dir, PathBuf::from("/test/rtf"));
        assert_eq!(config.tools_resolved, ToolsConfig::default());
        assert_eq!(config.style_resolved, StyleConfig::default());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.render.hyperlinks);
        assert_eq!(config.render.image_format, "png");
    }

    #[test]
    fn test_parse_render_config() {
        let toml = r#"
[render]
hyperlinks = false
cleanup = false
image_format = "svg"
max_indent_level = 4
language = "rust"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(!config.render.hyperlinks);
        assert!(!config.render.cleanup);
        assert_eq!(config.render.image_format, "svg");
        assert_eq!(config.render.max_indent_level, 4);
        assert_eq!(config.render.language, "rust");
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[output]
dir = "build/rtf"

[style]
stylesheet = "doc/style.cfg"
extensions = "doc/ext.cfg"

[tools]
dot = "bin/dot"
mscgen = "mscgen-0.20"
plantuml_jar = "vendor/plantuml.jar"
plantuml_include_path = "doc/uml"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.output_dir, PathBuf::from("/project/build/rtf"));
        assert_eq!(
            config.style_resolved.stylesheet,
            Some(PathBuf::from("/project/doc/style.cfg"))
        );
        assert_eq!(
            config.style_resolved.extensions,
            Some(PathBuf::from("/project/doc/ext.cfg"))
        );
        assert_eq!(config.tools_resolved.dot, PathBuf::from("/project/bin/dot"));
        assert_eq!(config.tools_resolved.mscgen, PathBuf::from("mscgen-0.20"));
        assert_eq!(config.tools_resolved.java, PathBuf::from("java"));
        assert_eq!(
            config.tools_resolved.plantuml_jar,
            Some(PathBuf::from("/project/vendor/plantuml.jar"))
        );
        assert_eq!(
            config.tools_resolved.plantuml_include_path,
            Some(PathBuf::from("/project/doc/uml"))
        );
    }

    #[test]
    fn test_validate_indent_level_range() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.render.max_indent_level = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("render.max_indent_level"));

        config.render.max_indent_level = 11;
        assert!(config.validate().is_err());

        config.render.max_indent_level = 10;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_image_format() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.render.image_format = "bmp".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("render.image_format"));
    }

    #[test]
    fn test_validate_empty_language() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.render.language = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("render.language cannot be empty"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            output_dir: Some(PathBuf::from("/out")),
            hyperlinks: Some(false),
            image_format: Some("gif".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.output_dir, PathBuf::from("/out"));
        assert!(!config.render.hyperlinks);
        assert_eq!(config.render.image_format, "gif");
        assert!(config.render.cleanup); // Unchanged
        assert_eq!(config.render.language, "cpp"); // Unchanged
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[render]\nhyperlinks = false\n\n[output]\ndir = \"out\"\n")
            .unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert!(!config.render.hyperlinks);
        assert_eq!(config.output_dir, dir.path().join("out"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("absent.toml")), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_invalid_file_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[render]\nimage_format = \"tiff\"\n").unwrap();

        let result = Config::load(Some(&path), None);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_cli_settings_are_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();

        let overrides = CliSettings {
            image_format: Some("tiff".to_owned()),
            ..Default::default()
        };
        let result = Config::load(Some(&path), Some(&overrides));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
