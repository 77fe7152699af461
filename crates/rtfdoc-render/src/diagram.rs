//! Diagram rasterization.
//!
//! Inline diagrams are written to a numbered source file in the output
//! directory, handed to a [`DiagramRasterizer`], and referenced from the
//! document by the image file it produces:
//!
//! | Kind      | Source file                    | Image                    |
//! |-----------|--------------------------------|--------------------------|
//! | Dot       | `inline_dotgraph_N.dot`        | `inline_dotgraph_N.<fmt>`|
//! | Msc       | `inline_mscgraph_N.msc`        | `inline_mscgraph_N.png`  |
//! | `PlantUML`| `inline_umlgraph_N.pu`         | `inline_umlgraph_N.png`  |
//!
//! Dia diagrams only come from user files and are rasterized to `<stem>.png`.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicU32, Ordering};

/// Diagram language.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagramKind {
    Dot,
    Msc,
    Dia,
    PlantUml,
}

impl DiagramKind {
    /// Extension of the produced image. Only Dot honors the configured format.
    #[must_use]
    pub fn image_extension(self, image_format: &str) -> &str {
        match self {
            Self::Dot => image_format,
            Self::Msc | Self::Dia | Self::PlantUml => "png",
        }
    }

    fn tool(self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::Msc => "mscgen",
            Self::Dia => "dia",
            Self::PlantUml => "plantuml",
        }
    }
}

/// Diagram language that can appear inline in documentation text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InlineDiagram {
    Dot,
    Msc,
    PlantUml,
}

impl InlineDiagram {
    #[must_use]
    pub fn kind(self) -> DiagramKind {
        match self {
            Self::Dot => DiagramKind::Dot,
            Self::Msc => DiagramKind::Msc,
            Self::PlantUml => DiagramKind::PlantUml,
        }
    }

    /// Stem prefix for numbered source files.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Dot => "inline_dotgraph_",
            Self::Msc => "inline_mscgraph_",
            Self::PlantUml => "inline_umlgraph_",
        }
    }

    /// Extension of the source file.
    #[must_use]
    pub fn source_extension(self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::Msc => "msc",
            Self::PlantUml => "pu",
        }
    }

    /// Source text as the tool expects it.
    #[must_use]
    pub fn wrap_source(self, text: &str) -> String {
        match self {
            Self::Msc => format!("msc {{{text}}}"),
            Self::PlantUml => format!("@startuml\n{text}\n@enduml\n"),
            Self::Dot => text.to_owned(),
        }
    }
}

/// Per-language sequence numbers for inline diagram files.
///
/// Starts at 1. Shared through an `Arc` by renders writing into the same
/// output directory, so file names never collide.
#[derive(Debug)]
pub struct DiagramCounters {
    dot: AtomicU32,
    msc: AtomicU32,
    uml: AtomicU32,
}

impl Default for DiagramCounters {
    fn default() -> Self {
        Self {
            dot: AtomicU32::new(1),
            msc: AtomicU32::new(1),
            uml: AtomicU32::new(1),
        }
    }
}

impl DiagramCounters {
    /// Take the next number for `diagram`.
    pub fn next(&self, diagram: InlineDiagram) -> u32 {
        let counter = match diagram {
            InlineDiagram::Dot => &self.dot,
            InlineDiagram::Msc => &self.msc,
            InlineDiagram::PlantUml => &self.uml,
        };
        counter.fetch_add(1, Ordering::Relaxed)
    }
}

/// One rasterization job.
#[derive(Clone, Copy, Debug)]
pub struct RasterRequest<'a> {
    pub kind: DiagramKind,
    /// Diagram source file.
    pub source: &'a Path,
    /// Directory receiving the image.
    pub output_dir: &'a Path,
    /// Image file name without extension.
    pub base_name: &'a str,
    /// Configured bitmap format (`png`, `jpg`, ...).
    pub image_format: &'a str,
}

impl RasterRequest<'_> {
    /// Where the image is expected to appear.
    #[must_use]
    pub fn image_path(&self) -> PathBuf {
        self.output_dir.join(format!(
            "{}.{}",
            self.base_name,
            self.kind.image_extension(self.image_format)
        ))
    }
}

/// Diagram tool failure.
#[derive(Debug, thiserror::Error)]
pub enum DiagramError {
    /// The tool could not be started.
    #[error("Failed to run {tool}: {source}")]
    Spawn {
        tool: &'static str,
        source: std::io::Error,
    },
    /// The tool ran and reported failure.
    #[error("{tool} failed with {status}: {stderr}")]
    Failed {
        tool: &'static str,
        status: std::process::ExitStatus,
        stderr: String,
    },
    /// No `PlantUML` jar is configured.
    #[error("PlantUML jar not configured")]
    PlantUmlJarMissing,
    /// Reading or writing a diagram file failed.
    #[error("Could not access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Turns a diagram source file into an image.
pub trait DiagramRasterizer: Send + Sync {
    /// Produce [`RasterRequest::image_path`] from the request's source.
    fn rasterize(&self, request: &RasterRequest<'_>) -> Result<(), DiagramError>;
}

/// Runs the diagram tools as external commands.
#[derive(Clone, Debug)]
pub struct CommandRasterizer {
    pub dot: PathBuf,
    pub mscgen: PathBuf,
    pub dia: PathBuf,
    pub java: PathBuf,
    pub plantuml_jar: Option<PathBuf>,
    /// Extra `PlantUML` include directory.
    pub plantuml_include_path: Option<PathBuf>,
}

impl Default for CommandRasterizer {
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

impl CommandRasterizer {
    fn command(&self, request: &RasterRequest<'_>) -> Result<Command, DiagramError> {
        let image = request.image_path();
        let command = match request.kind {
            DiagramKind::Dot => {
                let mut cmd = Command::new(&self.dot);
                cmd.arg(format!("-T{}", request.image_format))
                    .arg("-o")
                    .arg(&image)
                    .arg(request.source);
                cmd
            }
            DiagramKind::Msc => {
                let mut cmd = Command::new(&self.mscgen);
                cmd.args(["-T", "png", "-o"]).arg(&image).arg(request.source);
                cmd
            }
            DiagramKind::Dia => {
                let mut cmd = Command::new(&self.dia);
                cmd.arg("-n")
                    .arg("-e")
                    .arg(&image)
                    .args(["-t", "png"])
                    .arg(request.source);
                cmd
            }
            DiagramKind::PlantUml => {
                let jar = self
                    .plantuml_jar
                    .as_ref()
                    .ok_or(DiagramError::PlantUmlJarMissing)?;
                // PlantUML resolves a relative -o against the source directory.
                let output_dir =
                    std::path::absolute(request.output_dir).map_err(|source| DiagramError::Io {
                        path: request.output_dir.to_path_buf(),
                        source,
                    })?;
                let mut cmd = Command::new(&self.java);
                if let Some(include) = &self.plantuml_include_path {
                    cmd.arg(format!("-Dplantuml.include.path={}", include.display()));
                }
                cmd.arg("-Djava.awt.headless=true")
                    .arg("-jar")
                    .arg(jar)
                    .arg("-o")
                    .arg(output_dir)
                    .arg("-tpng")
                    .arg(request.source)
                    .args(["-charset", "UTF-8"]);
                cmd
            }
        };
        Ok(command)
    }
}

impl DiagramRasterizer for CommandRasterizer {
    fn rasterize(&self, request: &RasterRequest<'_>) -> Result<(), DiagramError> {
        let tool = request.kind.tool();
        let mut command = self.command(request)?;
        tracing::debug!(tool, source = %request.source.display(), "Running diagram tool");

        let output = command
            .output()
            .map_err(|source| DiagramError::Spawn { tool, source })?;
        if !output.status.success() {
            return Err(DiagramError::Failed {
                tool,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }
        Ok(())
    }
}
