use std::collections::BTreeMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;

use pdfparse_core::{BackendError, TextBackend, TextDocument};

use crate::info::info_dictionary;

/// Layout-aware engine built on the `pdf-extract` crate.
///
/// `pdf-extract` renders every page in one pass, so the whole document is
/// extracted when it is opened and individual pages are served from memory.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfExtractBackend;

impl TextBackend for PdfExtractBackend {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn open(&self, path: &Path) -> Result<Box<dyn TextDocument>, BackendError> {
        let bytes = std::fs::read(path)?;

        // pdf-extract panics on some malformed fonts and encodings
        let pages = catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(&bytes)
        }))
        .map_err(|_| BackendError::Open("pdf-extract panicked while parsing".into()))?
        .map_err(|e| BackendError::Open(e.to_string()))?;

        // Metadata is read through lopdf; a failure there only affects metadata
        let metadata = lopdf::Document::load_mem(&bytes)
            .map(|doc| info_dictionary(&doc))
            .map_err(|e| e.to_string());

        Ok(Box::new(PdfExtractDocument { pages, metadata }))
    }
}

struct PdfExtractDocument {
    pages: Vec<String>,
    metadata: Result<BTreeMap<String, String>, String>,
}

impl TextDocument for PdfExtractDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<String, BackendError> {
        self.pages
            .get(index)
            .cloned()
            .ok_or_else(|| BackendError::Extraction(format!("no page at index {index}")))
    }

    fn metadata(&self) -> Result<BTreeMap<String, String>, BackendError> {
        self.metadata
            .clone()
            .map_err(BackendError::Extraction)
    }
}
