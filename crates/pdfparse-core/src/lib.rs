use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod backend;
pub mod config_file;
pub mod options;
pub mod pages;
pub mod search;
pub mod text_processing;

// Re-export for convenience
pub use backend::{BackendError, HtmlRenderer, TextBackend, TextDocument};
pub use options::{
    ConversionOptions, CssSource, DEFAULT_MARGIN, DEFAULT_MARGIN_INCHES, Margins, PageSize,
};
pub use pages::{PageRangeError, PageSelector, parse_page_range};
pub use search::{SearchMatch, find_matches};
pub use text_processing::clean_text;

/// Errors that indicate caller misuse. These are always returned to the
/// caller, unlike engine failures which the facades log and absorb.
#[derive(Error, Debug)]
pub enum PdfParseError {
    #[error("backend '{name}' not supported. Choose from: {supported}")]
    UnsupportedBackend { name: String, supported: String },
    #[error("backend '{0}' is not available in this build")]
    BackendUnavailable(String),
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("file must be a PDF: {}", .0.display())]
    InvalidFormat(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PdfParseError {
    /// Build an [`UnsupportedBackend`](Self::UnsupportedBackend) error listing
    /// the accepted names.
    pub fn unsupported(name: &str, supported: &[&str]) -> Self {
        PdfParseError::UnsupportedBackend {
            name: name.to_string(),
            supported: supported.join(", "),
        }
    }
}

/// Fail with [`PdfParseError::InputNotFound`] unless `path` exists.
pub fn require_existing(path: &Path) -> Result<(), PdfParseError> {
    if path.exists() {
        Ok(())
    } else {
        Err(PdfParseError::InputNotFound(path.to_path_buf()))
    }
}

/// Fail unless `path` exists and carries a `.pdf` extension (any case).
pub fn require_pdf(path: &Path) -> Result<(), PdfParseError> {
    require_existing(path)?;
    let is_pdf = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    if is_pdf {
        Ok(())
    } else {
        Err(PdfParseError::InvalidFormat(path.to_path_buf()))
    }
}
