use unicode_normalization::UnicodeNormalization;

/// Derives a URL slug from a display name.
///
/// The transliteration is lossy: the text is lowercased, decomposed (NFD), the combining diacritical marks
/// (U+0300..U+036F) are dropped, every run of characters outside `[a-z0-9]` becomes a single `-`, and leading and
/// trailing hyphens are trimmed. `slugify(slugify(x)) == slugify(x)` for any input.
///
/// Uniqueness is not guaranteed here; two names can map to the same slug.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut pending_separator = false;
    for c in lowered.nfd().filter(|c| !is_diacritical_mark(*c)) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else {
            pending_separator = true;
        }
    }
    slug
}

fn is_diacritical_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}
