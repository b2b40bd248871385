//! Text, metadata and search extraction from PDF files.
//!
//! [`PdfTextExtractor`] is the entry point. It selects one of three engines
//! by name, opens the document through the [`TextBackend`] trait and applies
//! the same page selection, cleaning and joining rules whatever the engine.

use std::fmt;
use std::str::FromStr;

use pdfparse_core::{PdfParseError, TextBackend};

mod extractor;
mod info;
pub mod lopdf_backend;
pub mod pdf_extract_backend;

pub use extractor::PdfTextExtractor;
pub use lopdf_backend::LopdfBackend;
pub use pdf_extract_backend::PdfExtractBackend;
// Re-export the types callers need alongside the facade
pub use pdfparse_core::{PageSelector, SearchMatch};

/// Text extraction engines known to pdfparse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExtractionBackend {
    #[default]
    Lopdf,
    PdfExtract,
    Mupdf,
}

impl ExtractionBackend {
    pub const ALL: [ExtractionBackend; 3] = [
        ExtractionBackend::Lopdf,
        ExtractionBackend::PdfExtract,
        ExtractionBackend::Mupdf,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExtractionBackend::Lopdf => "lopdf",
            ExtractionBackend::PdfExtract => "pdf-extract",
            ExtractionBackend::Mupdf => "mupdf",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|b| b.as_str()).collect()
    }

    /// Instantiate the engine behind this identifier.
    ///
    /// Fails with [`PdfParseError::BackendUnavailable`] when the engine was
    /// compiled out.
    pub fn engine(self) -> Result<Box<dyn TextBackend>, PdfParseError> {
        match self {
            ExtractionBackend::Lopdf => Ok(Box::new(LopdfBackend)),
            ExtractionBackend::PdfExtract => Ok(Box::new(PdfExtractBackend)),
            #[cfg(feature = "mupdf")]
            ExtractionBackend::Mupdf => Ok(Box::new(pdfparse_pdf_mupdf::MupdfBackend::new())),
            #[cfg(not(feature = "mupdf"))]
            ExtractionBackend::Mupdf => Err(PdfParseError::BackendUnavailable(
                self.as_str().to_string(),
            )),
        }
    }
}

impl FromStr for ExtractionBackend {
    type Err = PdfParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|b| b.as_str() == lowered)
            .ok_or_else(|| PdfParseError::unsupported(&lowered, &Self::names()))
    }
}

impl fmt::Display for ExtractionBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
