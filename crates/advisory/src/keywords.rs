//! Keyword matching over lowercased user text

/// True when `keyword` occurs in `haystack` starting at a word boundary.
///
/// Both arguments must already be lowercase. The keyword may run on into a
/// longer word ("pest" matches "pesticide"), but may not start mid-word
/// ("rice" does not match "price").
pub fn matches_keyword(haystack: &str, keyword: &str) -> bool {
    if keyword.is_empty() {
        return false;
    }

    haystack.match_indices(keyword).any(|(idx, _)| {
        haystack[..idx]
            .chars()
            .next_back()
            .map_or(true, |prev| !prev.is_alphanumeric())
    })
}

pub fn matches_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| matches_keyword(haystack, k))
}
