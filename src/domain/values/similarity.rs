//! Title normalization and token-set similarity.
//!
//! Both the gate's title_match component and the resolver's fuzzy link use
//! the same measure: lowercase, strip punctuation, drop stopwords, then
//! compute token overlap `|A ∩ B| / min(|A|, |B|)`.

use std::collections::HashSet;

/// Filler words that carry no product identity.
const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for",
];

/// Normalize a product title for comparison: lowercase, punctuation and
/// extra whitespace collapsed, stopwords removed.
pub fn normalize_title(title: &str) -> String {
    let lowered = title.to_lowercase();
    let cleaned: String = lowered
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    cleaned
        .split_whitespace()
        .filter(|w| !STOPWORDS.contains(w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Token set of a normalized title.
pub fn title_tokens(title: &str) -> HashSet<String> {
    normalize_title(title)
        .split_whitespace()
        .map(|w| w.to_string())
        .collect()
}

/// Token overlap between two titles, 0.0 when either side has no usable
/// tokens. A subset title ("iPhone 15 Pro 256GB" vs the same plus a color
/// suffix) scores 1.0; the resolver's price check guards against
/// over-linking.
pub fn token_set_similarity(a: &str, b: &str) -> f64 {
    let ta = title_tokens(a);
    let tb = title_tokens(b);
    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }
    let shared = ta.intersection(&tb).count();
    shared as f64 / ta.len().min(tb.len()) as f64
}
