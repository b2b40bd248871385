use std::ops::RangeInclusive;

use thiserror::Error;

/// Hint shown to users who type a malformed page range.
pub const PAGE_RANGE_HINT: &str = "use comma-separated pages like \"1,3,5\" or a range like \"1-5\"";

/// Which pages an extraction should process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelector {
    #[default]
    All,
    /// Explicit zero-indexed pages, processed in the given order.
    Pages(Vec<usize>),
    /// Zero-indexed inclusive ranges, clipped to the document when resolved.
    /// Produced by [`parse_page_range`]; resolves to sorted, distinct pages.
    Ranges(Vec<RangeInclusive<usize>>),
}

impl PageSelector {
    /// Resolve against the document's page count.
    ///
    /// Indices outside `[0, total_pages)` are dropped without error.
    pub fn resolve(&self, total_pages: usize) -> Vec<usize> {
        match self {
            PageSelector::All => (0..total_pages).collect(),
            PageSelector::Pages(pages) => pages
                .iter()
                .copied()
                .filter(|&p| p < total_pages)
                .collect(),
            PageSelector::Ranges(ranges) => {
                let mut pages: Vec<usize> = ranges
                    .iter()
                    .filter(|r| *r.start() < total_pages)
                    .flat_map(|r| *r.start()..=(*r.end()).min(total_pages - 1))
                    .collect();
                pages.sort_unstable();
                pages.dedup();
                pages
            }
        }
    }
}

impl From<Vec<usize>> for PageSelector {
    fn from(pages: Vec<usize>) -> Self {
        PageSelector::Pages(pages)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PageRangeError {
    #[error("invalid page number '{0}': {hint}", hint = PAGE_RANGE_HINT)]
    InvalidNumber(String),
    #[error("page 0 is invalid (pages start at 1): {hint}", hint = PAGE_RANGE_HINT)]
    ZeroPage,
    #[error("range '{0}' ends before it starts: {hint}", hint = PAGE_RANGE_HINT)]
    Reversed(String),
    #[error("empty page range: {hint}", hint = PAGE_RANGE_HINT)]
    Empty,
}

/// Parse a user-facing page range like `"1,3,5"`, `"1-5"` or `"1,3-5"`.
///
/// Input is 1-indexed and inclusive; the result selects 0-indexed pages.
/// Ranges stay unexpanded until [`PageSelector::resolve`] clips them to the
/// document, so `"1-10000000000"` costs no more than `"1-3"`.
pub fn parse_page_range(input: &str) -> Result<PageSelector, PageRangeError> {
    let mut ranges = Vec::new();

    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if let Some((start_str, end_str)) = part.split_once('-') {
            let start = parse_page_number(start_str)?;
            let end = parse_page_number(end_str)?;
            if end < start {
                return Err(PageRangeError::Reversed(part.to_string()));
            }
            ranges.push(start - 1..=end - 1);
        } else {
            let page = parse_page_number(part)? - 1;
            ranges.push(page..=page);
        }
    }

    if ranges.is_empty() {
        return Err(PageRangeError::Empty);
    }

    Ok(PageSelector::Ranges(ranges))
}

fn parse_page_number(s: &str) -> Result<usize, PageRangeError> {
    let page: usize = s
        .trim()
        .parse()
        .map_err(|_| PageRangeError::InvalidNumber(s.trim().to_string()))?;
    if page == 0 {
        return Err(PageRangeError::ZeroPage);
    }
    Ok(page)
}
