use std::collections::BTreeMap;
use std::io::Write;

use owo_colors::OwoColorize;
use pdfparse_core::SearchMatch;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print metadata as aligned `key: value` lines.
pub fn print_metadata(
    w: &mut dyn Write,
    metadata: &BTreeMap<String, String>,
    color: ColorMode,
) -> std::io::Result<()> {
    if metadata.is_empty() {
        writeln!(w, "No metadata available")?;
        return Ok(());
    }

    let width = metadata.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    for (key, value) in metadata {
        let label = format!("{key:<width$}");
        if color.enabled() {
            writeln!(w, "{}: {}", label.bold(), value)?;
        } else {
            writeln!(w, "{label}: {value}")?;
        }
    }
    Ok(())
}

/// Print a match count followed by one entry per match.
pub fn print_search_results(
    w: &mut dyn Write,
    query: &str,
    matches: &[SearchMatch],
    color: ColorMode,
) -> std::io::Result<()> {
    let noun = if matches.len() == 1 { "match" } else { "matches" };
    let summary = format!("Found {} {} for '{}'", matches.len(), noun, query);
    if color.enabled() {
        writeln!(w, "{}", summary.bold())?;
    } else {
        writeln!(w, "{summary}")?;
    }

    for m in matches {
        writeln!(w)?;
        if color.enabled() {
            writeln!(
                w,
                "{} (position {})",
                format!("Page {}", m.page).cyan().bold(),
                m.position
            )?;
            writeln!(w, "  {}", highlight(&m.context, &m.matched))?;
        } else {
            writeln!(w, "Page {} (position {})", m.page, m.position)?;
            writeln!(w, "  {}", m.context)?;
        }
    }
    Ok(())
}

/// Wrap the first occurrence of `matched` in `context` in yellow.
fn highlight(context: &str, matched: &str) -> String {
    match context.find(matched) {
        Some(start) if !matched.is_empty() => {
            let end = start + matched.len();
            format!(
                "{}{}{}",
                &context[..start],
                matched.yellow().bold(),
                &context[end..]
            )
        }
        _ => context.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut dyn Write) -> std::io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn metadata_keys_are_aligned() {
        let metadata = BTreeMap::from([
            ("Title".to_string(), "Report".to_string()),
            ("pages".to_string(), "3".to_string()),
            ("Producer".to_string(), "lopdf".to_string()),
        ]);
        let out = render(|w| print_metadata(w, &metadata, ColorMode(false)));
        assert_eq!(out, "Producer: lopdf\nTitle   : Report\npages   : 3\n");
    }

    #[test]
    fn empty_metadata_says_so() {
        let out = render(|w| print_metadata(w, &BTreeMap::new(), ColorMode(false)));
        assert_eq!(out, "No metadata available\n");
    }

    #[test]
    fn search_results_plain() {
        let matches = vec![SearchMatch {
            page: 2,
            position: 7,
            context: "find the needle here".into(),
            matched: "needle".into(),
        }];
        let out = render(|w| print_search_results(w, "needle", &matches, ColorMode(false)));
        assert_eq!(
            out,
            "Found 1 match for 'needle'\n\nPage 2 (position 7)\n  find the needle here\n"
        );

        let none = render(|w| print_search_results(w, "x", &[], ColorMode(false)));
        assert_eq!(none, "Found 0 matches for 'x'\n");
    }

    #[test]
    fn highlight_keeps_surrounding_text() {
        let out = highlight("a needle b", "needle");
        assert!(out.starts_with("a "));
        assert!(out.ends_with(" b"));
        assert!(out.contains("needle"));
        assert_eq!(highlight("abc", "zzz"), "abc");
    }
}
