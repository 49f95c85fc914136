use once_cell::sync::Lazy;
use regex::Regex;

/// An alphabetic word preceded by a space and followed by a period.
static TITLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" ([A-Za-z]+)\.").expect("Invalid regex: title"));

/// Extract the honorific from a passenger name.
///
/// Takes the first alphabetic word that follows a space and ends with a
/// period, e.g. `"Braund, Mr. Owen Harris"` gives `"Mr"`.
pub fn extract_title(name: &str) -> Option<&str> {
    TITLE_PATTERN
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
