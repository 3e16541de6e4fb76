//! Markdown image link rewriting
//!
//! Pure string transforms that prefix relative markdown image paths with the
//! API base URL. Kept separate from JSON traversal so the substitution can be
//! unit-tested against literal strings. Rewriting is best-effort and never
//! fails a call.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Lazily initialized regex for markdown image links with a relative path
static IMAGE_LINK_REGEX: OnceLock<Regex> = OnceLock::new();

/// Get or initialize the image link regex
fn get_image_link_regex() -> &'static Regex {
    IMAGE_LINK_REGEX.get_or_init(|| {
        // Matches ![alt](/path) - only root-relative paths, so links that are
        // already absolute stay untouched
        Regex::new(r"!\[([^\]]*)\]\((/[^)]*)\)").expect("Invalid regex pattern")
    })
}

/// Rewrites every relative markdown image link in `text` to an absolute URL.
pub fn absolutize_image_links(text: &str, base_url: &str) -> String {
    get_image_link_regex()
        .replace_all(text, |caps: &regex::Captures| {
            format!("![{}]({}{})", &caps[1], base_url, &caps[2])
        })
        .into_owned()
}

/// Rewrites image links in every string-valued top-level field of an entry.
///
/// Non-string fields are left untouched and the scan is non-recursive.
pub fn absolutize_entry_fields(entry: &mut Map<String, Value>, base_url: &str) {
    for field in entry.values_mut() {
        if let Value::String(text) = field {
            *text = absolutize_image_links(text, base_url);
        }
    }
}

/// Rewrites image links in a single value: an object has its top-level string
/// fields rewritten, a bare string is rewritten itself, anything else is left
/// untouched.
pub fn absolutize_fields(value: &mut Value, base_url: &str) {
    match value {
        Value::Object(entry) => absolutize_entry_fields(entry, base_url),
        Value::String(text) => *text = absolutize_image_links(text, base_url),
        _ => {}
    }
}
