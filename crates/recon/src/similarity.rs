//! Match confidence between one catalog record and one web record.
//!
//! `score = brand_weight * brand_sim + title_weight * title_sim (+ snippet bonus)`,
//! clamped to `[0, 1]` only at the very end.

use serde::Serialize;

use crate::config::ScoringConfig;
use crate::model::{CatalogItem, MatchType, WebItem};
use crate::normalize::{normalize_brand, normalize_text, normalize_title};

/// Tokens of the web title taken as the brand when the listing has none.
const WEB_BRAND_TOKENS: usize = 3;

// ---------------------------------------------------------------------------
// Comparison keys
// ---------------------------------------------------------------------------

/// Normalized keys of a catalog record, computed once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogKey {
    pub brand: String,
    pub title: String,
}

impl CatalogKey {
    pub fn of(item: &CatalogItem) -> Self {
        Self {
            brand: normalize_brand(item.brand.as_deref().unwrap_or("")),
            title: normalize_title(&item.title),
        }
    }
}

/// Normalized keys of a web record, computed once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebKey {
    pub brand: String,
    pub title: String,
    pub snippet: String,
}

impl WebKey {
    /// Listings rarely carry a brand field, but most lead the title with it,
    /// so the first few title tokens stand in when `brand` is absent.
    pub fn of(item: &WebItem) -> Self {
        let title = normalize_title(&item.title);
        let brand = match item.brand.as_deref().map(normalize_brand) {
            Some(b) if !b.is_empty() => b,
            _ => title
                .split(' ')
                .filter(|t| !t.is_empty())
                .take(WEB_BRAND_TOKENS)
                .collect::<Vec<_>>()
                .join(" "),
        };
        Self {
            brand,
            title,
            snippet: normalize_text(item.snippet.as_deref().unwrap_or("")),
        }
    }

    fn is_blank(&self) -> bool {
        self.brand.is_empty() && self.title.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub brand_sim: f64,
    pub title_sim: f64,
    pub bonus: f64,
    /// Final confidence in `[0, 1]`.
    pub score: f64,
    pub match_type: MatchType,
}

impl ScoreBreakdown {
    const NONE: Self = Self {
        brand_sim: 0.0,
        title_sim: 0.0,
        bonus: 0.0,
        score: 0.0,
        match_type: MatchType::TitleOnly,
    };
}

/// Score two records with the default weights.
pub fn score(catalog: &CatalogItem, web: &WebItem) -> f64 {
    score_breakdown(catalog, web, &ScoringConfig::default()).score
}

pub fn score_breakdown(
    catalog: &CatalogItem,
    web: &WebItem,
    weights: &ScoringConfig,
) -> ScoreBreakdown {
    score_keys(&CatalogKey::of(catalog), &WebKey::of(web), weights)
}

pub fn score_keys(catalog: &CatalogKey, web: &WebKey, weights: &ScoringConfig) -> ScoreBreakdown {
    // A side with neither brand nor title carries no signal; the snippet
    // bonus alone must not lift it.
    if (catalog.brand.is_empty() && catalog.title.is_empty()) || web.is_blank() {
        return ScoreBreakdown::NONE;
    }

    let has_brands = !catalog.brand.is_empty() && !web.brand.is_empty();
    let brand_sim = if has_brands {
        sequence_ratio(&catalog.brand, &web.brand)
    } else {
        0.0
    };
    let title_sim = sequence_ratio(&catalog.title, &web.title);

    let bonus = if !catalog.brand.is_empty() && web.snippet.contains(catalog.brand.as_str()) {
        weights.snippet_bonus
    } else {
        0.0
    };

    let raw = weights.brand * brand_sim + weights.title * title_sim + bonus;

    ScoreBreakdown {
        brand_sim,
        title_sim,
        bonus,
        score: raw.clamp(0.0, 1.0),
        match_type: if has_brands {
            MatchType::BrandTitle
        } else {
            MatchType::TitleOnly
        },
    }
}

// ---------------------------------------------------------------------------
// Character similarity
// ---------------------------------------------------------------------------

/// Ratcliff/Obershelp similarity: `2 * M / (|a| + |b|)` where `M` counts
/// characters in the recursively found longest common blocks.
///
/// Returns 0.0 when either side is empty.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let matched = matching_chars(&a, &b);
    (2 * matched) as f64 / (a.len() + b.len()) as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut queue = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, k) = longest_block(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            queue.push((i + k, ahi, j + k, bhi));
        }
    }

    matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, len)`.
/// Ties resolve to the block starting earliest in `a`, then earliest in `b`.
fn longest_block(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let width = bhi - blo;
    let mut best = (alo, blo, 0);
    let mut prev = vec![0usize; width + 1];
    let mut cur = vec![0usize; width + 1];

    for i in alo..ahi {
        for j in blo..bhi {
            let col = j - blo + 1;
            cur[col] = if a[i] == b[j] { prev[col - 1] + 1 } else { 0 };
            let k = cur[col];
            if k > best.2 {
                best = (i + 1 - k, j + 1 - k, k);
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    best
}
