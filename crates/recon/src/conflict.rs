//! Numeric disagreements between the two sides of a matched pair.

use crate::config::PriceTolerance;
use crate::model::{round_to, CatalogItem, Conflict, ConflictKind, MatchCandidate, PairConflicts, WebItem};

/// All conflicts of one pair. Empty when the pair agrees or when a compared
/// value is missing on either side.
pub fn detect_conflicts(
    catalog: &CatalogItem,
    web: &WebItem,
    tolerance: &PriceTolerance,
) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    if let Some(c) = price_conflict(catalog.price, web.price, tolerance) {
        conflicts.push(c);
    }
    conflicts
}

/// `pct` is always taken against the catalog price; it is undefined (and
/// only the absolute rule applies) when the catalog price is zero.
fn price_conflict(
    catalog_price: Option<f64>,
    web_price: Option<f64>,
    tolerance: &PriceTolerance,
) -> Option<Conflict> {
    let (cp, wp) = (catalog_price?, web_price?);
    if cp < 0.0 || wp < 0.0 {
        return None;
    }

    let diff = (cp - wp).abs();
    let pct = (cp > 0.0).then(|| diff / cp);

    let over_relative = pct.is_some_and(|p| p > tolerance.relative_threshold);
    let over_absolute = diff > tolerance.absolute_threshold;
    if !over_relative && !over_absolute {
        return None;
    }

    let message = match pct {
        Some(p) => format!(
            "Catalog shows ${cp:.2}, web shows ${wp:.2} ({:.1}% difference)",
            p * 100.0
        ),
        None => format!("Catalog shows ${cp:.2}, web shows ${wp:.2} (${diff:.2} difference)"),
    };

    Some(Conflict {
        kind: ConflictKind::PriceDiscrepancy,
        catalog_value: cp,
        web_value: wp,
        absolute_difference: round_to(diff, 2),
        relative_difference: pct,
        message,
    })
}

/// Per-pair conflict lists, parallel to `matches`.
pub fn detect_all(matches: &[MatchCandidate], tolerance: &PriceTolerance) -> Vec<Vec<Conflict>> {
    matches
        .iter()
        .map(|m| detect_conflicts(&m.catalog, &m.web, tolerance))
        .collect()
}

/// Citation-ready report: one entry per pair that has conflicts, in match order.
pub fn conflict_report(matches: &[MatchCandidate], conflicts: &[Vec<Conflict>]) -> Vec<PairConflicts> {
    matches
        .iter()
        .zip(conflicts)
        .filter(|(_, c)| !c.is_empty())
        .map(|(m, c)| PairConflicts {
            catalog_id: m.catalog.id.clone(),
            catalog_title: m.catalog.title.clone(),
            web_url: m.web.url.clone(),
            web_title: m.web.title.clone(),
            conflicts: c.clone(),
        })
        .collect()
}
