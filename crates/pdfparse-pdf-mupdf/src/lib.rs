use std::collections::BTreeMap;
use std::path::Path;

use mupdf::{Document, MetadataName, TextPageFlags};

use pdfparse_core::{BackendError, TextBackend, TextDocument};

/// MuPDF-based implementation of [`TextBackend`].
///
/// This crate is the sole AGPL island: it isolates the mupdf dependency
/// (which is AGPL-3.0) so that builds without the `mupdf` feature do not
/// transitively depend on it.
#[derive(Debug, Default, Clone, Copy)]
pub struct MupdfBackend;

impl MupdfBackend {
    pub fn new() -> Self {
        Self
    }
}

impl TextBackend for MupdfBackend {
    fn name(&self) -> &'static str {
        "mupdf"
    }

    fn open(&self, path: &Path) -> Result<Box<dyn TextDocument>, BackendError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::Open("invalid path encoding".into()))?;

        let document = Document::open(path_str).map_err(|e| BackendError::Open(e.to_string()))?;
        let page_count = document
            .page_count()
            .map_err(|e| BackendError::Open(e.to_string()))?;

        Ok(Box::new(MupdfDocument {
            document,
            page_count: usize::try_from(page_count).unwrap_or(0),
        }))
    }
}

struct MupdfDocument {
    document: Document,
    page_count: usize,
}

/// Metadata fields in the order and spelling PyMuPDF-style tools report them.
const METADATA_FIELDS: [(&str, MetadataName); 10] = [
    ("format", MetadataName::Format),
    ("encryption", MetadataName::Encryption),
    ("title", MetadataName::Title),
    ("author", MetadataName::Author),
    ("subject", MetadataName::Subject),
    ("keywords", MetadataName::Keywords),
    ("creator", MetadataName::Creator),
    ("producer", MetadataName::Producer),
    ("creationDate", MetadataName::CreationDate),
    ("modDate", MetadataName::ModDate),
];

impl TextDocument for MupdfDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn page_text(&self, index: usize) -> Result<String, BackendError> {
        let page_no = i32::try_from(index)
            .map_err(|_| BackendError::Extraction(format!("page index {index} out of range")))?;
        let page = self
            .document
            .load_page(page_no)
            .map_err(|e| BackendError::Extraction(e.to_string()))?;
        let text_page = page
            .to_text_page(TextPageFlags::empty())
            .map_err(|e| BackendError::Extraction(e.to_string()))?;

        // Block/line iteration matches PyMuPDF's get_text() layout
        let mut page_text = String::new();
        for block in text_page.blocks() {
            for line in block.lines() {
                let line_text: String = line
                    .chars()
                    .map(|c| c.char().unwrap_or('\u{FFFD}'))
                    .collect();
                page_text.push_str(&line_text);
                page_text.push('\n');
            }
        }
        Ok(page_text)
    }

    fn metadata(&self) -> Result<BTreeMap<String, String>, BackendError> {
        let mut metadata = BTreeMap::new();
        for (key, name) in METADATA_FIELDS {
            let value = self
                .document
                .metadata(name)
                .map_err(|e| BackendError::Extraction(e.to_string()))?;
            metadata.insert(key.to_string(), value);
        }
        Ok(metadata)
    }
}
