/// Id used when a name slugifies to nothing.
pub const FALLBACK_SLUG: &str = "trellis-project";

/// Truncate a string by character count, not byte count.
///
/// Unlike a display ellipsis, the result is a strict prefix of `s`.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// Turn free text into a directory-safe id.
///
/// Lowercases, collapses runs of anything other than ASCII letters and digits
/// to one dash, and drops leading and trailing dashes.
pub fn slugify(value: &str) -> String {
    let mut slug = String::new();
    for c in value.trim().to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

/// Collapse newlines so a value fits on one `key: value` line.
pub fn single_line(value: &str) -> String {
    value
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
