use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;

use crate::options::ConversionOptions;

/// Failures raised inside a third-party engine.
///
/// The facades never hand these to their callers: they are logged and turned
/// into `false` (conversion) or an empty/partial result (extraction).
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    Open(String),
    #[error("failed to extract text: {0}")]
    Extraction(String),
    #[error("failed to render PDF: {0}")]
    Render(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for PDF text extraction engines.
///
/// Implementors only open the file; page selection, cleaning, joining and
/// searching live in the extraction facade.
pub trait TextBackend: Send + Sync {
    /// Engine identifier for logging.
    fn name(&self) -> &'static str;

    /// Open a PDF file for page-wise extraction.
    fn open(&self, path: &Path) -> Result<Box<dyn TextDocument>, BackendError>;
}

/// An opened PDF as seen by one engine.
pub trait TextDocument {
    /// Total number of pages the engine reports.
    fn page_count(&self) -> usize;

    /// Raw text of the zero-indexed page `index`.
    fn page_text(&self, index: usize) -> Result<String, BackendError>;

    /// Engine-native document metadata, without the `pages` entry.
    ///
    /// Keys are deliberately left in the engine's own casing and format.
    fn metadata(&self) -> Result<BTreeMap<String, String>, BackendError>;
}

/// Trait for HTML to PDF rendering engines.
///
/// A renderer writes exactly one file at `output` when it succeeds. Options
/// it has no equivalent for are ignored.
pub trait HtmlRenderer: Send + Sync {
    /// Engine identifier for logging.
    fn name(&self) -> &'static str;

    /// Render `html` to a PDF at `output`.
    fn render(
        &self,
        html: &str,
        output: &Path,
        options: &ConversionOptions,
    ) -> Result<(), BackendError>;
}
