use std::collections::BTreeMap;
use std::path::Path;

use tracing::{Span, debug, error, info_span, warn};

use pdfparse_core::{
    PageSelector, PdfParseError, SearchMatch, TextBackend, TextDocument, clean_text,
    find_matches, require_pdf,
};

use crate::ExtractionBackend;

/// Facade over a single text extraction engine.
///
/// All operations validate the input path first (missing file or a non-PDF
/// extension is returned as an error). Anything that goes wrong inside the
/// engine afterwards is logged and turned into an empty or partial result.
pub struct PdfTextExtractor {
    engine: Box<dyn TextBackend>,
    span: Span,
}

impl PdfTextExtractor {
    /// Create an extractor for the named engine (`lopdf`, `pdf-extract` or
    /// `mupdf`, any case).
    pub fn new(backend: &str) -> Result<Self, PdfParseError> {
        let backend: ExtractionBackend = backend.parse()?;
        Ok(Self::from_engine(backend.engine()?))
    }

    /// Wrap an already constructed engine.
    pub fn from_engine(engine: Box<dyn TextBackend>) -> Self {
        let span = info_span!("pdf_extract", backend = engine.name());
        Self { engine, span }
    }

    /// Replace the span every operation is recorded under.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Name of the engine in use, always lowercase.
    pub fn backend_name(&self) -> &'static str {
        self.engine.name()
    }

    fn open(&self, path: &Path) -> Option<Box<dyn TextDocument>> {
        match self.engine.open(path) {
            Ok(doc) => {
                debug!(path = %path.display(), pages = doc.page_count(), "opened PDF");
                Some(doc)
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "could not open PDF");
                None
            }
        }
    }

    /// Extract the selected pages as one string.
    ///
    /// Each non-blank page becomes a `--- Page N ---` block (N is 1-based);
    /// blocks are separated by a blank line. Pages the engine fails on are
    /// logged and left out.
    pub fn extract_text(
        &self,
        path: &Path,
        pages: &PageSelector,
        clean: bool,
    ) -> Result<String, PdfParseError> {
        require_pdf(path)?;
        let _guard = self.span.enter();

        let Some(doc) = self.open(path) else {
            return Ok(String::new());
        };

        let mut blocks = Vec::new();
        for index in pages.resolve(doc.page_count()) {
            match doc.page_text(index) {
                Ok(raw) => {
                    let text = if clean { clean_text(&raw) } else { raw };
                    if text.trim().is_empty() {
                        continue;
                    }
                    blocks.push(format!("--- Page {} ---\n{}", index + 1, text));
                }
                Err(e) => {
                    warn!(path = %path.display(), page = index + 1, error = %e, "skipping page");
                }
            }
        }

        Ok(blocks.join("\n\n"))
    }

    /// Cleaned text of every page, keyed by zero-based index.
    ///
    /// The map always has one entry per page; pages that fail map to `""`.
    pub fn extract_text_by_page(
        &self,
        path: &Path,
    ) -> Result<BTreeMap<usize, String>, PdfParseError> {
        require_pdf(path)?;
        let _guard = self.span.enter();

        let Some(doc) = self.open(path) else {
            return Ok(BTreeMap::new());
        };
        Ok(pages_by_index(doc.as_ref(), path))
    }

    /// Document metadata with engine-native keys plus `pages`.
    pub fn get_metadata(&self, path: &Path) -> Result<BTreeMap<String, String>, PdfParseError> {
        require_pdf(path)?;
        let _guard = self.span.enter();

        let Some(doc) = self.open(path) else {
            return Ok(BTreeMap::new());
        };

        match doc.metadata() {
            Ok(mut metadata) => {
                metadata.insert("pages".to_string(), doc.page_count().to_string());
                Ok(metadata)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read metadata");
                Ok(BTreeMap::new())
            }
        }
    }

    /// Find every literal occurrence of `query` in the cleaned page texts.
    pub fn search_text(
        &self,
        path: &Path,
        query: &str,
        case_sensitive: bool,
    ) -> Result<Vec<SearchMatch>, PdfParseError> {
        let pages = self.extract_text_by_page(path)?;
        let _guard = self.span.enter();

        match find_matches(&pages, query, case_sensitive) {
            Ok(matches) => {
                debug!(query, count = matches.len(), "search complete");
                Ok(matches)
            }
            Err(e) => {
                // An escaped literal only fails to compile when it is huge
                error!(query, error = %e, "search pattern rejected");
                Ok(Vec::new())
            }
        }
    }
}

fn pages_by_index(doc: &dyn TextDocument, path: &Path) -> BTreeMap<usize, String> {
    (0..doc.page_count())
        .map(|index| {
            let text = match doc.page_text(index) {
                Ok(raw) => clean_text(&raw),
                Err(e) => {
                    warn!(path = %path.display(), page = index + 1, error = %e, "page text unavailable");
                    String::new()
                }
            };
            (index, text)
        })
        .collect()
}
