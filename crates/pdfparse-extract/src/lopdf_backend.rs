use std::collections::BTreeMap;
use std::path::Path;

use lopdf::Document;

use pdfparse_core::{BackendError, TextBackend, TextDocument};

use crate::info::info_dictionary;

/// Pure-Rust engine built on `lopdf`'s content-stream text extraction.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfBackend;

impl TextBackend for LopdfBackend {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn open(&self, path: &Path) -> Result<Box<dyn TextDocument>, BackendError> {
        let document = Document::load(path).map_err(|e| BackendError::Open(e.to_string()))?;
        // get_pages() is keyed by 1-based page number
        let page_numbers = document.get_pages().keys().copied().collect();
        Ok(Box::new(LopdfDocument {
            document,
            page_numbers,
        }))
    }
}

struct LopdfDocument {
    document: Document,
    page_numbers: Vec<u32>,
}

impl TextDocument for LopdfDocument {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn page_text(&self, index: usize) -> Result<String, BackendError> {
        let page_number = self
            .page_numbers
            .get(index)
            .copied()
            .ok_or_else(|| BackendError::Extraction(format!("no page at index {index}")))?;
        self.document
            .extract_text(&[page_number])
            .map_err(|e| BackendError::Extraction(e.to_string()))
    }

    fn metadata(&self) -> Result<BTreeMap<String, String>, BackendError> {
        Ok(info_dictionary(&self.document))
    }
}
