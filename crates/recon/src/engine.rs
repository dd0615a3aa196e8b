use std::collections::HashSet;

use crate::config::MatchConfig;
use crate::conflict::{conflict_report, detect_all};
use crate::error::ReconError;
use crate::evidence::compute_summary;
use crate::matcher::match_items;
use crate::model::{CatalogItem, Reconciliation, Source, WebItem};
use crate::table::build_table;

/// Run one reconciliation: match, flag conflicts, build the table.
///
/// Fails only on an invalid config or on records that break the input
/// contract. Empty inputs on either side are a valid run that yields
/// only singleton rows and a summary `reason`.
pub fn reconcile(
    config: &MatchConfig,
    catalog: &[CatalogItem],
    web: &[WebItem],
) -> Result<Reconciliation, ReconError> {
    config.validate()?;
    validate_catalog(catalog)?;
    validate_web(web)?;

    let matched = match_items(catalog, web, config);
    let conflicts_by_pair = detect_all(&matched.matches, &config.price);
    let conflicts = conflict_report(&matched.matches, &conflicts_by_pair);
    let table = build_table(
        &matched.matches,
        &matched.unmatched_catalog,
        &matched.unmatched_web,
        &conflicts_by_pair,
    );
    let summary = compute_summary(catalog.len(), web.len(), &matched, &conflicts, &table);

    log::info!(
        "reconciled {} catalog x {} web: {} matched, {} catalog-only, {} web-only, {} conflicts",
        summary.catalog_items,
        summary.web_items,
        summary.matched,
        summary.catalog_only,
        summary.web_only,
        summary.conflicts,
    );

    Ok(Reconciliation {
        summary,
        table,
        conflicts,
        matches: matched.matches,
        unmatched_catalog: matched.unmatched_catalog,
        unmatched_web: matched.unmatched_web,
    })
}

/// Catalog ids must be non-blank and unique; prices non-negative and finite.
pub fn validate_catalog(items: &[CatalogItem]) -> Result<(), ReconError> {
    let mut seen = HashSet::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        if item.id.trim().is_empty() {
            return Err(ReconError::invalid(
                Source::Catalog,
                format!("#{i}"),
                "id",
                "must not be empty",
            ));
        }
        if !seen.insert(item.id.as_str()) {
            return Err(ReconError::invalid(
                Source::Catalog,
                &item.id,
                "id",
                "duplicate id",
            ));
        }
        check_price(Source::Catalog, &item.id, item.price)?;
    }
    Ok(())
}

/// Web urls must be non-blank and unique; prices non-negative and finite.
pub fn validate_web(items: &[WebItem]) -> Result<(), ReconError> {
    let mut seen = HashSet::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        if item.url.trim().is_empty() {
            return Err(ReconError::invalid(
                Source::Web,
                format!("#{i}"),
                "url",
                "must not be empty",
            ));
        }
        if !seen.insert(item.url.as_str()) {
            return Err(ReconError::invalid(Source::Web, &item.url, "url", "duplicate url"));
        }
        check_price(Source::Web, &item.url, item.price)?;
    }
    Ok(())
}

fn check_price(side: Source, record: &str, price: Option<f64>) -> Result<(), ReconError> {
    match price {
        Some(p) if !p.is_finite() => Err(ReconError::invalid(side, record, "price", "must be finite")),
        Some(p) if p < 0.0 => Err(ReconError::invalid(
            side,
            record,
            "price",
            format!("must be non-negative, got {p}"),
        )),
        _ => Ok(()),
    }
}
