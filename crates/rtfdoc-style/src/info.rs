//! Document information fields.

use std::path::Path;

use crate::StyleError;
use crate::sheet::assignments;

/// Fields of the RTF `\info` group, read from an extensions file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentInfo {
    pub title: String,
    pub subject: String,
    pub comments: String,
    pub company: String,
    pub logo_filename: String,
    pub author: String,
    pub manager: String,
    pub document_type: String,
    pub document_id: String,
    pub keywords: String,
}

impl DocumentInfo {
    /// Apply `Key = value` lines from an extensions file.
    ///
    /// Unknown keys are ignored; malformed lines are returned as warnings.
    pub fn apply_extensions(&mut self, content: &str, source: &str) -> Vec<String> {
        let mut warnings = Vec::new();

        for (line_nr, parsed) in assignments(content) {
            let Ok((key, value)) = parsed else {
                warnings.push(format!(
                    "{source}:{line_nr}: assignment of extension field expected"
                ));
                continue;
            };
            let field = match key {
                "Title" => &mut self.title,
                "Subject" => &mut self.subject,
                "Comments" => &mut self.comments,
                "Company" => &mut self.company,
                "LogoFilename" => &mut self.logo_filename,
                "Author" => &mut self.author,
                "Manager" => &mut self.manager,
                "DocumentType" => &mut self.document_type,
                "DocumentId" => &mut self.document_id,
                "Keywords" => &mut self.keywords,
                _ => continue,
            };
            value.clone_into(field);
        }

        for warning in &warnings {
            tracing::warn!(warning = %warning, "Extensions file problem");
        }
        warnings
    }

    /// Load fields from an extensions file.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::Io`] if the file cannot be read.
    pub fn load_extensions(&mut self, path: &Path) -> Result<Vec<String>, StyleError> {
        let content = std::fs::read_to_string(path).map_err(|source| StyleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "Loading RTF extensions");
        Ok(self.apply_extensions(&content, &path.display().to_string()))
    }
}
