//! String-level HTML helpers shared by the rendering engines.

use pdfparse_core::Margins;

/// Whether `html` is a complete document rather than a body fragment.
pub(crate) fn is_full_document(html: &str) -> bool {
    let head = html.trim_start();
    starts_with_ignore_case(head, "<!doctype") || starts_with_ignore_case(head, "<html")
}

/// Wrap CSS text in a `<style>` element.
pub(crate) fn style_block(css: &str) -> String {
    format!("<style>\n{css}\n</style>")
}

/// Insert `fragment` at the start of the document head.
///
/// A document without `<head>` gets one right after its `<html>` tag; a bare
/// fragment has `fragment` prepended.
pub(crate) fn inject_into_head(html: &str, fragment: &str) -> String {
    if let Some(pos) = find_tag_end(html, "<head") {
        return format!("{}{}{}", &html[..pos], fragment, &html[pos..]);
    }
    if let Some(pos) = find_tag_end(html, "<html") {
        return format!(
            "{}<head>{}</head>{}",
            &html[..pos],
            fragment,
            &html[pos..]
        );
    }
    format!("{fragment}{html}")
}

/// Wrap a body fragment in a minimal document with a default body font and
/// an `@page` rule carrying the requested margins.
pub(crate) fn wrap_fragment(body: &str, margins: &Margins) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <style>
        body {{ font-family: Arial, sans-serif; margin: 40px; }}
        @page {{ margin: {margins}; }}
    </style>
</head>
<body>
{body}
</body>
</html>"#,
        margins = margins.css_shorthand(),
    )
}

/// Byte offset just past the `>` closing the first `tag` opening, matched
/// case-insensitively. `<header>` does not count as `<head`.
fn find_tag_end(html: &str, tag: &str) -> Option<usize> {
    let lowered = html.to_ascii_lowercase();
    let mut from = 0;
    while let Some(rel) = lowered[from..].find(tag) {
        let start = from + rel;
        let after = start + tag.len();
        let boundary = lowered[after..].chars().next();
        if matches!(boundary, Some(c) if c == '>' || c.is_ascii_whitespace()) {
            return lowered[after..].find('>').map(|gt| after + gt + 1);
        }
        from = after;
    }
    None
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.is_char_boundary(prefix.len())
        && s[..prefix.len()].eq_ignore_ascii_case(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_full_documents() {
        assert!(is_full_document("<!DOCTYPE html><html></html>"));
        assert!(is_full_document("  \n<!doctype html>"));
        assert!(is_full_document("<HTML><body>x</body></HTML>"));
        assert!(!is_full_document("<h1>Title</h1>"));
        assert!(!is_full_document("plain text"));
        assert!(!is_full_document(""));
    }

    #[test]
    fn injects_after_existing_head() {
        let html = "<html><head><title>T</title></head><body></body></html>";
        let out = inject_into_head(html, "<style>p{}</style>");
        assert_eq!(
            out,
            "<html><head><style>p{}</style><title>T</title></head><body></body></html>"
        );
    }

    #[test]
    fn head_with_attributes_and_header_element() {
        let html = "<html><body><header>h</header></body></html>";
        let out = inject_into_head(html, "<base href=\"file:///x/\">");
        assert_eq!(
            out,
            "<html><head><base href=\"file:///x/\"></head><body><header>h</header></body></html>"
        );

        let html = "<HTML lang=\"en\"><HEAD profile=\"x\"></HEAD></HTML>";
        let out = inject_into_head(html, "S");
        assert_eq!(out, "<HTML lang=\"en\"><HEAD profile=\"x\">S</HEAD></HTML>");
    }

    #[test]
    fn fragment_gets_prefix() {
        assert_eq!(inject_into_head("<p>x</p>", "S"), "S<p>x</p>");
    }

    #[test]
    fn wrap_uses_margin_shorthand() {
        let margins = Margins {
            top: "1in".into(),
            right: "2cm".into(),
            bottom: "0.5in".into(),
            left: "10mm".into(),
        };
        let doc = wrap_fragment("<p>Body</p>", &margins);
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("@page { margin: 1in 2cm 0.5in 10mm; }"));
        assert!(doc.contains("body { font-family: Arial, sans-serif; margin: 40px; }"));
        assert!(doc.contains("<body>\n<p>Body</p>\n</body>"));
        assert!(is_full_document(&doc));
    }

    #[test]
    fn style_block_wraps_css() {
        assert_eq!(style_block("p { color: red; }"), "<style>\np { color: red; }\n</style>");
    }
}
