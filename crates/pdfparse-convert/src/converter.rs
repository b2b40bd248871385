use std::path::{Path, PathBuf};

use tracing::{Span, error, info, info_span};

use pdfparse_core::{ConversionOptions, HtmlRenderer, PdfParseError, require_existing};

use crate::{ConversionBackend, GenpdfRenderer, PrintpdfRenderer};

/// Facade over a single HTML to PDF engine.
///
/// Setup problems (unknown backend, missing input) are returned as errors.
/// Failures inside the engine are logged and reported as `false`.
pub struct HtmlToPdfConverter {
    backend: Option<ConversionBackend>,
    renderer: Box<dyn HtmlRenderer>,
    span: Span,
}

impl HtmlToPdfConverter {
    /// Create a converter for the named engine (`chromium`, `printpdf` or
    /// `genpdf`, any case).
    pub fn new(backend: &str) -> Result<Self, PdfParseError> {
        let backend: ConversionBackend = backend.parse()?;
        let renderer: Box<dyn HtmlRenderer> = match backend {
            #[cfg(feature = "chromium")]
            ConversionBackend::Chromium => Box::new(crate::ChromiumRenderer::default()),
            #[cfg(not(feature = "chromium"))]
            ConversionBackend::Chromium => {
                return Err(PdfParseError::BackendUnavailable(backend.to_string()));
            }
            ConversionBackend::Printpdf => Box::new(PrintpdfRenderer),
            ConversionBackend::Genpdf => Box::new(GenpdfRenderer::default()),
        };
        let mut converter = Self::from_renderer(renderer);
        converter.backend = Some(backend);
        Ok(converter)
    }

    /// Wrap an already constructed renderer.
    pub fn from_renderer(renderer: Box<dyn HtmlRenderer>) -> Self {
        let span = info_span!("html_to_pdf", backend = renderer.name());
        Self {
            backend: None,
            renderer,
            span,
        }
    }

    /// Use a specific Chrome/Chromium binary. Ignored by other engines.
    pub fn with_chrome_executable(self, path: impl Into<PathBuf>) -> Self {
        #[cfg(feature = "chromium")]
        {
            if self.backend == Some(ConversionBackend::Chromium) {
                return Self {
                    renderer: Box::new(crate::ChromiumRenderer::new(Some(path.into()))),
                    ..self
                };
            }
        }
        let _ = path;
        self
    }

    /// Load the `genpdf` font family `name` from `dir`. Ignored by other
    /// engines.
    pub fn with_fonts(self, dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        if self.backend == Some(ConversionBackend::Genpdf) {
            return Self {
                renderer: Box::new(GenpdfRenderer::new(dir, name)),
                ..self
            };
        }
        self
    }

    /// Replace the span every conversion is recorded under.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Name of the engine in use, always lowercase.
    pub fn backend_name(&self) -> &'static str {
        self.renderer.name()
    }

    /// Convert an HTML file.
    ///
    /// Relative references in the document resolve against the file's own
    /// directory, overriding any `base_url` in `options`.
    pub fn convert_file(
        &self,
        input: &Path,
        output: &Path,
        options: &ConversionOptions,
    ) -> Result<bool, PdfParseError> {
        require_existing(input)?;
        let html = std::fs::read_to_string(input)?;

        let dir = std::path::absolute(input)?
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let options = options
            .clone()
            .with_base_url(format!("file://{}/", dir.display()));

        Ok(self.convert_string(&html, output, &options))
    }

    /// Convert an HTML string. Returns whether a PDF was written to `output`.
    pub fn convert_string(&self, html: &str, output: &Path, options: &ConversionOptions) -> bool {
        let _guard = self.span.enter();

        match self.renderer.render(html, output, options) {
            Ok(()) => {
                info!(output = %output.display(), "Successfully converted to PDF: {}", output.display());
                true
            }
            Err(e) => {
                error!(output = %output.display(), error = %e, "conversion failed");
                false
            }
        }
    }
}
