//! Deterministic cleanup of model output.
//!
//! Hosted summarization models pad their text with artefacts no reader
//! wants: leading/trailing whitespace, mid-sentence line breaks inherited
//! from the source layout, and runs of repeated spaces. The rules here are
//! purely mechanical so they can never change the meaning of a summary.

use once_cell::sync::Lazy;
use regex::Regex;

/// Runs of spaces/tabs (and stray carriage returns) collapse to one space.
static HORIZONTAL_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\r]+").expect("valid regex"));

/// Three or more newlines collapse to a paragraph break.
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Spaces preceding a newline are dropped.
static TRAILING_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r" +\n").expect("valid regex"));

/// Normalise whitespace in model-produced summary text.
pub fn clean_summary(text: &str) -> String {
    let cleaned = HORIZONTAL_WS.replace_all(text, " ");
    let cleaned = TRAILING_WS.replace_all(&cleaned, "\n");
    let cleaned = BLANK_LINES.replace_all(&cleaned, "\n\n");
    cleaned.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_space_runs() {
        assert_eq!(clean_summary("a  b\t\tc"), "a b c");
    }

    #[test]
    fn trims_and_normalises_blank_lines() {
        assert_eq!(clean_summary("  one\n\n\n\ntwo  "), "one\n\ntwo");
    }

    #[test]
    fn drops_trailing_spaces_before_newlines() {
        assert_eq!(clean_summary("one   \ntwo"), "one\ntwo");
    }

    #[test]
    fn clean_text_is_untouched() {
        assert_eq!(clean_summary("Already clean."), "Already clean.");
    }
}
