use serde::{Deserialize, Serialize};

/// Origin metadata attached to an inserted link node, kept apart from the
/// href the host renders so the creation URL stays recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkMetadata {
    pub url: String,
}

/// Prefix schemeless input with `https://`. `None` means the input was empty
/// and the operation is cancelled.
pub fn normalize_url(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let lower = raw.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Some(raw.to_string())
    } else {
        Some(format!("https://{raw}"))
    }
}
