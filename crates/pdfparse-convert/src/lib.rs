//! HTML to PDF conversion.
//!
//! [`HtmlToPdfConverter`] picks one rendering engine by name and hands it
//! the HTML together with the subset of [`ConversionOptions`] that engine
//! understands.

use std::fmt;
use std::str::FromStr;

use pdfparse_core::PdfParseError;

#[cfg(feature = "chromium")]
pub mod chromium;
mod converter;
pub mod genpdf_backend;
mod html;
pub mod printpdf_backend;

#[cfg(feature = "chromium")]
pub use chromium::ChromiumRenderer;
pub use converter::HtmlToPdfConverter;
pub use genpdf_backend::{DEFAULT_FONT_DIR, DEFAULT_FONT_NAME, GenpdfRenderer};
pub use pdfparse_core::{ConversionOptions, CssSource, Margins, PageSize};
pub use printpdf_backend::PrintpdfRenderer;

/// Rendering engines known to pdfparse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ConversionBackend {
    #[default]
    Chromium,
    Printpdf,
    Genpdf,
}

impl ConversionBackend {
    pub const ALL: [ConversionBackend; 3] = [
        ConversionBackend::Chromium,
        ConversionBackend::Printpdf,
        ConversionBackend::Genpdf,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConversionBackend::Chromium => "chromium",
            ConversionBackend::Printpdf => "printpdf",
            ConversionBackend::Genpdf => "genpdf",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|b| b.as_str()).collect()
    }
}

impl FromStr for ConversionBackend {
    type Err = PdfParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|b| b.as_str() == lowered)
            .ok_or_else(|| PdfParseError::unsupported(&lowered, &Self::names()))
    }
}

impl fmt::Display for ConversionBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_lowercased() {
        assert_eq!(
            "GenPDF".parse::<ConversionBackend>().unwrap(),
            ConversionBackend::Genpdf
        );
        assert_eq!(
            "CHROMIUM".parse::<ConversionBackend>().unwrap(),
            ConversionBackend::Chromium
        );
    }

    #[test]
    fn unknown_backend_rejected() {
        let err = "weasyprint".parse::<ConversionBackend>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "backend 'weasyprint' not supported. Choose from: chromium, printpdf, genpdf"
        );
    }
}
