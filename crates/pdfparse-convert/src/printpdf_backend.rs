use std::collections::BTreeMap;
use std::path::Path;

use printpdf::{GeneratePdfOptions, PdfDocument, PdfSaveOptions};
use tracing::debug;

use pdfparse_core::{BackendError, ConversionOptions, HtmlRenderer};

use crate::html::{inject_into_head, is_full_document, style_block, wrap_fragment};

/// Pure-Rust HTML renderer from the `printpdf` crate.
///
/// The engine takes neither margins nor a paper size, so bare fragments are
/// wrapped in a document whose stylesheet carries the margins as an `@page`
/// rule. The paper size option is ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrintpdfRenderer;

impl PrintpdfRenderer {
    /// Produce the exact HTML handed to the engine.
    pub(crate) fn prepare(
        &self,
        html: &str,
        options: &ConversionOptions,
    ) -> Result<String, BackendError> {
        let full_document = is_full_document(html);
        let css = options.css.as_ref().map(|c| c.load()).transpose()?;

        let prepared = match (full_document, css) {
            (true, Some(css)) => inject_into_head(html, &style_block(&css)),
            (true, None) => html.to_string(),
            (false, Some(css)) => wrap_fragment(
                &format!("{}{}", style_block(&css), html),
                &options.margins,
            ),
            (false, None) => wrap_fragment(html, &options.margins),
        };
        Ok(prepared)
    }
}

impl HtmlRenderer for PrintpdfRenderer {
    fn name(&self) -> &'static str {
        "printpdf"
    }

    fn render(
        &self,
        html: &str,
        output: &Path,
        options: &ConversionOptions,
    ) -> Result<(), BackendError> {
        let html = self.prepare(html, options)?;

        let mut warnings = Vec::new();
        let doc = PdfDocument::from_html(
            &html,
            &BTreeMap::new(),
            &BTreeMap::new(),
            &GeneratePdfOptions::default(),
            &mut warnings,
        )
        .map_err(|e| BackendError::Render(e.to_string()))?;

        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            debug!(count = warnings.len(), "printpdf reported warnings");
        }

        std::fs::write(output, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfparse_core::CssSource;

    #[test]
    fn fragment_is_wrapped_with_margins() {
        let out = PrintpdfRenderer
            .prepare("<h1>Hi</h1>", &ConversionOptions::default())
            .unwrap();
        assert!(out.starts_with("<!DOCTYPE html>"));
        assert!(out.contains("@page { margin: 0.75in 0.75in 0.75in 0.75in; }"));
        assert!(out.contains("<h1>Hi</h1>"));
    }

    #[test]
    fn css_lands_inside_wrapped_body() {
        let opts = ConversionOptions::new().with_css(CssSource::Inline("h1 { color: red; }".into()));
        let out = PrintpdfRenderer.prepare("<h1>Hi</h1>", &opts).unwrap();
        assert!(out.contains("<body>\n<style>\nh1 { color: red; }\n</style><h1>Hi</h1>"));
    }

    #[test]
    fn full_document_is_not_rewrapped() {
        let html = "<!DOCTYPE html><html><head></head><body>x</body></html>";
        let plain = PrintpdfRenderer
            .prepare(html, &ConversionOptions::default())
            .unwrap();
        assert_eq!(plain, html);

        let opts = ConversionOptions::new().with_css(CssSource::Inline("p{}".into()));
        let styled = PrintpdfRenderer.prepare(html, &opts).unwrap();
        assert_eq!(
            styled,
            "<!DOCTYPE html><html><head><style>\np{}\n</style></head><body>x</body></html>"
        );
    }

    #[test]
    fn missing_css_file_is_an_io_error() {
        let opts =
            ConversionOptions::new().with_css(CssSource::File("/no/such/style.css".into()));
        let err = PrintpdfRenderer.prepare("<p>x</p>", &opts).unwrap_err();
        assert!(matches!(err, BackendError::Io(_)));
    }
}
