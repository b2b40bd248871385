use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Sentence punctuation followed (after optional spaces) by a capital.
static SENTENCE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"([.!?])\s*([A-Z])").unwrap());

/// Lowercase letter immediately followed by an uppercase one.
static CASE_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z])([A-Z])").unwrap());

/// Normalize text produced by an extraction engine.
///
/// - every whitespace run (newlines and tabs included) becomes one space
/// - leading and trailing whitespace is dropped
/// - `"end.Next"` → `"end. Next"`
/// - `"wordsRun"` → `"words Run"` (repairs engines that drop word spacing)
///
/// Lossy by nature. Applying it twice gives the same result as once.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = WHITESPACE_RUN.replace_all(text, " ");
    let text = text.trim();
    let text = SENTENCE_BREAK.replace_all(text, "${1} ${2}");
    let text = CASE_BOUNDARY.replace_all(&text, "${1} ${2}");

    text.into_owned()
}
