use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque pass-through fields (rating, category, image_url, ...).
/// Forwarded untouched; never interpreted by the engine.
pub type Fields = Map<String, Value>;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Catalog,
    Web,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Catalog => write!(f, "catalog"),
            Self::Web => write!(f, "web"),
        }
    }
}

/// A product record from the internal, pre-indexed catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(
        default,
        deserialize_with = "crate::price::deserialize_price",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<f64>,
    #[serde(flatten)]
    pub extra: Fields,
}

impl CatalogItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            brand: None,
            price: None,
            extra: Fields::new(),
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// A product record from a live web search. The URL is its identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebItem {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(
        default,
        deserialize_with = "crate::price::deserialize_price",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<f64>,
    /// Site label, e.g. `amazon.com`.
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    /// Rarely supplied by web search; see [`crate::similarity`] for the fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(flatten)]
    pub extra: Fields,
}

impl WebItem {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            price: None,
            source: String::new(),
            snippet: None,
            brand: None,
            extra: Fields::new(),
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Pair matching
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Both sides had a brand signal.
    BrandTitle,
    /// Brand missing on at least one side; title carried the match.
    TitleOnly,
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BrandTitle => write!(f, "brand_title"),
            Self::TitleOnly => write!(f, "title_only"),
        }
    }
}

/// An accepted catalog/web pairing. Never built below `min_score`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchCandidate {
    pub catalog_index: usize,
    pub web_index: usize,
    pub catalog: CatalogItem,
    pub web: WebItem,
    pub score: f64,
    pub match_type: MatchType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairMatchOutput {
    /// In acceptance order: descending score.
    pub matches: Vec<MatchCandidate>,
    pub unmatched_catalog: Vec<CatalogItem>,
    pub unmatched_web: Vec<WebItem>,
}

// ---------------------------------------------------------------------------
// Conflicts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    PriceDiscrepancy,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub catalog_value: f64,
    pub web_value: f64,
    /// `|catalog - web|`, rounded to cents.
    pub absolute_difference: f64,
    /// Fraction of the catalog value. Absent when the catalog value is zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_difference: Option<f64>,
    pub message: String,
}

/// Conflicts of one matched pair, keyed for citation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairConflicts {
    pub catalog_id: String,
    pub catalog_title: String,
    pub web_url: String,
    pub web_title: String,
    pub conflicts: Vec<Conflict>,
}

// ---------------------------------------------------------------------------
// Comparison table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Matched,
    CatalogOnly,
    WebOnly,
}

impl std::fmt::Display for RowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Matched => write!(f, "matched"),
            Self::CatalogOnly => write!(f, "catalog_only"),
            Self::WebOnly => write!(f, "web_only"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub kind: RowKind,
    pub title: String,
    pub brand: Option<String>,
    pub catalog_price: Option<f64>,
    pub web_price: Option<f64>,
    pub catalog_id: Option<String>,
    pub web_url: Option<String>,
    pub web_source: Option<String>,
    pub match_confidence: Option<f64>,
    pub has_conflict: bool,
    pub sources: BTreeSet<Source>,
    #[serde(skip_serializing_if = "Fields::is_empty")]
    pub catalog_fields: Fields,
    #[serde(skip_serializing_if = "Fields::is_empty")]
    pub web_fields: Fields,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

/// Why matching was skipped entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NoWebResults,
    NoCatalogResults,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoWebResults => write!(f, "no_web_results"),
            Self::NoCatalogResults => write!(f, "no_catalog_results"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconSummary {
    pub catalog_items: usize,
    pub web_items: usize,
    pub matched: usize,
    pub catalog_only: usize,
    pub web_only: usize,
    pub conflicts: usize,
    pub table_rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<SkipReason>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconciliation {
    pub summary: ReconSummary,
    pub table: Vec<ComparisonRow>,
    pub conflicts: Vec<PairConflicts>,
    pub matches: Vec<MatchCandidate>,
    pub unmatched_catalog: Vec<CatalogItem>,
    pub unmatched_web: Vec<WebItem>,
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
