//! Prompt template loading.
//!
//! The summary prompt starts from a plain-text template with three literal
//! placeholder tokens: `<$num$>`, `<$product_type$>` and `<$product_name$>`.
//! Each is expected to occur once; the template is not validated here.

use crate::error::{OmtaleError, Result};
use std::path::PathBuf;

/// The bundled summary prompt template.
const DEFAULT_TEMPLATE: &str = "\
Below are <$num$> transcripts of YouTube video reviews of the <$product_type$> \
<$product_name$>, each attributed to the channel that published it. Please read \
all of them and write a concise summary of the overall opinion: what reviewers \
liked, what they disliked, recurring complaints or praise, and whether they \
would recommend <$product_name$>. Mention when reviewers disagree.";

/// Trait for prompt template sources.
///
/// A seam for tests; production code reads a file or falls back to the
/// bundled default.
pub trait TemplateSource: Send + Sync {
    /// Load the raw template text.
    fn load(&self) -> Result<String>;
}

/// File-backed template source.
pub struct FileTemplate {
    path: Option<PathBuf>,
}

impl FileTemplate {
    /// Create a template source. With no path, the bundled default template
    /// is served.
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }
}

impl TemplateSource for FileTemplate {
    fn load(&self) -> Result<String> {
        match &self.path {
            Some(path) => std::fs::read_to_string(path).map_err(|e| {
                OmtaleError::Template(format!(
                    "Failed to read template file {}: {}",
                    path.display(),
                    e
                ))
            }),
            None => Ok(DEFAULT_TEMPLATE.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_template_has_all_placeholders() {
        let template = FileTemplate::new(None).load().unwrap();
        assert!(template.contains("<$num$>"));
        assert!(template.contains("<$product_type$>"));
        assert!(template.contains("<$product_name$>"));
    }

    #[test]
    fn test_loads_custom_template_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Summarize <$num$> reviews of <$product_name$>").unwrap();

        let template = FileTemplate::new(Some(file.path().to_path_buf()))
            .load()
            .unwrap();
        assert_eq!(template, "Summarize <$num$> reviews of <$product_name$>");
    }

    #[test]
    fn test_missing_template_file_is_template_error() {
        let result = FileTemplate::new(Some(PathBuf::from("/nonexistent/prompt.txt"))).load();
        assert!(matches!(result, Err(OmtaleError::Template(_))));
    }
}
