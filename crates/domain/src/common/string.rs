//! String normalization and matching utilities.

use std::cmp::Ordering;

/// Normalizes a trait or skill key: every run of whitespace becomes a single
/// `-`, then the result is lower-cased.
///
/// # Examples
///
/// ```
/// use levelwiz_domain::common::normalize_key;
///
/// assert_eq!(normalize_key("Half Elf"), "half-elf");
/// assert_eq!(normalize_key("Fighter"), "fighter");
/// assert_eq!(normalize_key("Lore  Sailing"), "lore-sailing");
/// ```
pub fn normalize_key(value: &str) -> String {
    let mut normalized = String::with_capacity(value.len());
    let mut in_whitespace = false;
    for c in value.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                normalized.push('-');
            }
            in_whitespace = true;
        } else {
            normalized.extend(c.to_lowercase());
            in_whitespace = false;
        }
    }
    normalized
}

/// Case-insensitive whole-word search.
///
/// A match must not be preceded or followed by a word character
/// (alphanumeric or `_`).
///
/// # Examples
///
/// ```
/// use levelwiz_domain::common::contains_word;
///
/// assert!(contains_word("Trained in Athletics", "athletics"));
/// assert!(!contains_word("Trained in Athleticsmanship", "athletics"));
/// ```
pub fn contains_word(haystack: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    let haystack = haystack.to_lowercase();
    let word = word.to_lowercase();
    haystack.match_indices(&word).any(|(start, matched)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + matched.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Upper-cases the first character and leaves the rest untouched.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Name ordering used for feats.
///
/// Letters compare case-insensitively first; when two names differ only in
/// case the lower-case spelling sorts first.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}
