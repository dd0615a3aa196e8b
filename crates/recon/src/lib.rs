//! `shopmatch-recon`: catalog vs live-web product reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded records, returns matched pairs,
//! price conflicts and one comparison table. No CLI or IO dependencies.

pub mod config;
pub mod conflict;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod load;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod price;
pub mod similarity;
pub mod table;

pub use config::{MatchConfig, MatchStrategy, PriceTolerance, ScoringConfig};
pub use engine::reconcile;
pub use error::ReconError;
pub use model::{
    CatalogItem, ComparisonRow, Conflict, MatchCandidate, MatchType, PairConflicts,
    Reconciliation, ReconSummary, RowKind, Source, WebItem,
};
