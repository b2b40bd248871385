use std::collections::BTreeMap;

use regex::RegexBuilder;

/// Characters of context kept on each side of a match.
pub const CONTEXT_CHARS: usize = 50;

/// One occurrence of a search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    /// 1-indexed page number, for display.
    pub page: usize,
    /// 0-indexed character offset of the match within the page text.
    pub position: usize,
    /// Up to [`CONTEXT_CHARS`] characters either side of the match, clipped
    /// to the page text and trimmed.
    pub context: String,
    /// The matched substring exactly as it appears in the text.
    pub matched: String,
}

/// Find every literal occurrence of `query` in the given page texts.
///
/// `pages` maps 0-indexed page numbers to (already cleaned) text. Matches are
/// non-overlapping and reported left to right, page by page. Empty pages and
/// empty queries yield nothing.
pub fn find_matches(
    pages: &BTreeMap<usize, String>,
    query: &str,
    case_sensitive: bool,
) -> Result<Vec<SearchMatch>, regex::Error> {
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let pattern = RegexBuilder::new(&regex::escape(query))
        .case_insensitive(!case_sensitive)
        .build()?;

    let mut matches = Vec::new();
    for (&page_index, text) in pages {
        if text.is_empty() {
            continue;
        }

        // byte offset of every char, so offsets and windows count characters
        let char_starts: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        let char_count = char_starts.len();
        let to_char = |byte: usize| char_starts.partition_point(|&b| b < byte);
        let to_byte = |ch: usize| char_starts.get(ch).copied().unwrap_or(text.len());

        for m in pattern.find_iter(text) {
            let start = to_char(m.start());
            let end = to_char(m.end());
            let window_start = start.saturating_sub(CONTEXT_CHARS);
            let window_end = (end + CONTEXT_CHARS).min(char_count);

            matches.push(SearchMatch {
                page: page_index + 1,
                position: start,
                context: text[to_byte(window_start)..to_byte(window_end)]
                    .trim()
                    .to_string(),
                matched: m.as_str().to_string(),
            });
        }
    }

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(texts: &[&str]) -> BTreeMap<usize, String> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| (i, t.to_string()))
            .collect()
    }

    #[test]
    fn reports_one_indexed_pages_and_char_offsets() {
        let found = find_matches(&pages(&["no hit", "a needle here"]), "needle", true).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].page, 2);
        assert_eq!(found[0].position, 2);
        assert_eq!(found[0].matched, "needle");
        assert_eq!(found[0].context, "a needle here");
    }

    #[test]
    fn case_modes() {
        let p = pages(&["Sample sample SAMPLE"]);
        let sensitive = find_matches(&p, "sample", true).unwrap();
        let insensitive = find_matches(&p, "sample", false).unwrap();
        assert_eq!(sensitive.len(), 1);
        assert_eq!(insensitive.len(), 3);
        let cased: Vec<_> = insensitive.iter().map(|m| m.matched.as_str()).collect();
        assert_eq!(cased, vec!["Sample", "sample", "SAMPLE"]);
    }

    #[test]
    fn query_is_literal() {
        let p = pages(&["cost is $5.00 (approx)"]);
        assert_eq!(find_matches(&p, "$5.00", true).unwrap().len(), 1);
        assert_eq!(find_matches(&p, "(approx)", true).unwrap().len(), 1);
        assert!(find_matches(&p, "5.0.", true).unwrap().is_empty());
    }

    #[test]
    fn non_overlapping_scan() {
        let p = pages(&["aaaa"]);
        let found = find_matches(&p, "aa", true).unwrap();
        assert_eq!(
            found.iter().map(|m| m.position).collect::<Vec<_>>(),
            vec![0, 2]
        );
    }

    #[test]
    fn context_window_is_clipped() {
        let text = format!("{}target{}", "x".repeat(80), "y".repeat(80));
        let found = find_matches(&pages(&[&text]), "target", true).unwrap();
        assert_eq!(found[0].position, 80);
        assert_eq!(found[0].context.chars().count(), 50 + 6 + 50);
        assert!(found[0].context.starts_with('x'));
        assert!(found[0].context.ends_with('y'));
    }

    #[test]
    fn offsets_count_characters_not_bytes() {
        let found = find_matches(&pages(&["héllo wörld"]), "wörld", true).unwrap();
        assert_eq!(found[0].position, 6);
        assert_eq!(found[0].context, "héllo wörld");
    }

    #[test]
    fn empty_pages_and_queries() {
        let p = pages(&["", "text"]);
        assert!(find_matches(&p, "", false).unwrap().is_empty());
        assert_eq!(find_matches(&p, "text", false).unwrap()[0].page, 2);
    }
}
