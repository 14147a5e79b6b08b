use unicode_normalization::UnicodeNormalization;

/// Sentinel identifier for names that normalize to nothing.
pub const UNKNOWN_UID: &str = "unknown";

/// Normalize a boat name into a stable identifier.
///
/// Transliterates to plain ASCII lowercase, collapses runs of
/// non-alphanumeric characters into single underscores, and trims
/// leading/trailing underscores. Boats whose names contain spaces,
/// apostrophes, or accented characters keep the same uid across scrapes.
pub fn normalize(name: &str) -> String {
    let ascii = transliterate(name);
    let collapsed = collapse_separators(&ascii);
    if collapsed.is_empty() {
        UNKNOWN_UID.to_string()
    } else {
        collapsed
    }
}

fn transliterate(name: &str) -> String {
    name.nfkd()
        .filter(char::is_ascii)
        .collect::<String>()
        .to_lowercase()
}

fn collapse_separators(ascii: &str) -> String {
    let mut out = String::with_capacity(ascii.len());
    let mut pending_separator = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('_');
            }
            pending_separator = false;
            out.push(c);
        } else {
            pending_separator = true;
        }
    }

    out
}
