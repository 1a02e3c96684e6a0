//! Normalisation helpers applied wherever a name or value crosses the API boundary.

/// Absolute form of a DNS name (single trailing dot).
pub fn ensure_dot(text: &str) -> String {
    if text.ends_with('.') {
        text.to_string()
    } else {
        format!("{text}.")
    }
}

pub fn ensure_slash(text: &str) -> String {
    if text.ends_with('/') {
        text.to_string()
    } else {
        format!("{text}/")
    }
}

/// Wraps TXT content in double quotes. Each side is only added when missing,
/// so a value with a single stray quote is completed rather than re-quoted.
pub fn ensure_quotes(text: &str) -> String {
    let mut quoted = text.to_string();
    if !quoted.ends_with('"') {
        quoted.push('"');
    }
    if !quoted.starts_with('"') {
        quoted.insert(0, '"');
    }
    quoted
}

/// `_acme-challenge.<domain>.` as published for a DNS-01 challenge.
pub fn challenge_record_name(domain: &str) -> String {
    format!("_acme-challenge.{domain}.")
}
