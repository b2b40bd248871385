use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Default margin applied on every side when none is configured.
pub const DEFAULT_MARGIN: &str = "0.75in";
/// [`DEFAULT_MARGIN`] in inches.
pub const DEFAULT_MARGIN_INCHES: f64 = 0.75;

/// Where extra CSS for a conversion comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CssSource {
    File(PathBuf),
    Inline(String),
}

impl CssSource {
    /// Load the stylesheet text, reading the file for [`CssSource::File`].
    pub fn load(&self) -> std::io::Result<String> {
        match self {
            CssSource::File(path) => std::fs::read_to_string(path),
            CssSource::Inline(css) => Ok(css.clone()),
        }
    }
}

/// Supported paper sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
    Legal,
}

impl PageSize {
    /// Paper dimensions as (width, height) in inches.
    pub fn inches(self) -> (f64, f64) {
        match self {
            PageSize::A4 => (8.27, 11.69),
            PageSize::Letter => (8.5, 11.0),
            PageSize::Legal => (8.5, 14.0),
        }
    }

    /// Name usable in a CSS `@page { size: ... }` rule.
    pub fn css_name(self) -> &'static str {
        match self {
            PageSize::A4 => "A4",
            PageSize::Letter => "letter",
            PageSize::Legal => "legal",
        }
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "letter" => Ok(PageSize::Letter),
            "legal" => Ok(PageSize::Legal),
            other => Err(format!(
                "unknown page size '{other}' (expected A4, letter or legal)"
            )),
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_name())
    }
}

/// Page margins as CSS length strings (`"0.75in"`, `"2cm"`, `"18pt"`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Margins {
    pub top: String,
    pub right: String,
    pub bottom: String,
    pub left: String,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: DEFAULT_MARGIN.to_string(),
            right: DEFAULT_MARGIN.to_string(),
            bottom: DEFAULT_MARGIN.to_string(),
            left: DEFAULT_MARGIN.to_string(),
        }
    }
}

impl Margins {
    /// The four margins in CSS shorthand order: top right bottom left.
    pub fn css_shorthand(&self) -> String {
        format!("{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

/// Options for a single HTML to PDF conversion.
///
/// Every backend reads only the fields it understands and ignores the rest;
/// passing an option a backend cannot honor is never an error.
#[derive(Debug, Clone, Default)]
pub struct ConversionOptions {
    pub css: Option<CssSource>,
    pub page_size: PageSize,
    pub margins: Margins,
    /// Base URL used to resolve relative asset references.
    pub base_url: Option<String>,
}

impl ConversionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_css(mut self, css: CssSource) -> Self {
        self.css = Some(css);
        self
    }

    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

/// Convert a CSS absolute length (`in`, `cm`, `mm`, `pt`, `pc`, `px`) to inches.
///
/// A bare number is read as inches. Returns `None` for anything else.
pub fn css_length_to_inches(value: &str) -> Option<f64> {
    let value = value.trim().to_lowercase();
    let split = value
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(split);
    let number: f64 = number.trim().parse().ok()?;
    let inches = match unit.trim() {
        "" | "in" => number,
        "cm" => number / 2.54,
        "mm" => number / 25.4,
        "pt" => number / 72.0,
        "pc" => number / 6.0,
        "px" => number / 96.0,
        _ => return None,
    };
    Some(inches)
}
