//! Comparison keys for brand and title text.
//!
//! All functions are total: any input, including the empty string, yields a
//! key. An empty key means "no information" and scores zero downstream.

/// Corporate suffixes trimmed from the end of a brand, as whole tokens.
const CORPORATE_SUFFIXES: &[&str] = &[
    "inc",
    "incorporated",
    "llc",
    "corp",
    "corporation",
    "co",
    "company",
    "ltd",
    "limited",
];

/// Articles, prepositions and listing filler that never identify a product.
const TITLE_STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "for", "with", "of", "in", "on", "to", "by", "at", "from",
    "new", "best", "premium", "quality", "genuine", "official", "sale",
];

/// Lowercase, drop punctuation, collapse whitespace.
///
/// Apostrophes are removed outright so `Children's` keys as `childrens`;
/// every other non-alphanumeric character becomes a token boundary.
pub fn normalize_text(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    let mut space_pending = false;

    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if space_pending && !normalized.is_empty() {
                normalized.push(' ');
            }
            space_pending = false;
            normalized.extend(ch.to_lowercase());
        } else if ch == '\'' || ch == '\u{2019}' {
            continue;
        } else {
            space_pending = true;
        }
    }

    normalized
}

/// Brand key: [`normalize_text`] minus trailing corporate suffixes.
///
/// A brand is never trimmed to nothing: `Co` alone stays `co`.
pub fn normalize_brand(text: &str) -> String {
    let base = normalize_text(text);
    let mut tokens: Vec<&str> = base.split(' ').filter(|t| !t.is_empty()).collect();
    while tokens.len() > 1 && tokens.last().is_some_and(|t| CORPORATE_SUFFIXES.contains(t)) {
        tokens.pop();
    }
    tokens.join(" ")
}

/// Title key: [`normalize_text`] minus stopwords.
pub fn normalize_title(text: &str) -> String {
    normalize_text(text)
        .split(' ')
        .filter(|t| !t.is_empty() && !TITLE_STOPWORDS.contains(t))
        .collect::<Vec<_>>()
        .join(" ")
}
