use crate::model::{
    round_to, ComparisonRow, PairConflicts, PairMatchOutput, ReconSummary, RowKind, SkipReason,
};

/// Compute summary statistics for one run.
pub fn compute_summary(
    catalog_items: usize,
    web_items: usize,
    matched: &PairMatchOutput,
    conflicts: &[PairConflicts],
    table: &[ComparisonRow],
) -> ReconSummary {
    let mut matched_rows = 0;
    let mut catalog_only = 0;
    let mut web_only = 0;

    for row in table {
        match row.kind {
            RowKind::Matched => matched_rows += 1,
            RowKind::CatalogOnly => catalog_only += 1,
            RowKind::WebOnly => web_only += 1,
        }
    }

    let mean_confidence = if matched.matches.is_empty() {
        None
    } else {
        let total: f64 = matched.matches.iter().map(|m| m.score).sum();
        Some(round_to(total / matched.matches.len() as f64, 3))
    };

    let reason = if web_items == 0 {
        Some(SkipReason::NoWebResults)
    } else if catalog_items == 0 {
        Some(SkipReason::NoCatalogResults)
    } else {
        None
    };

    ReconSummary {
        catalog_items,
        web_items,
        matched: matched_rows,
        catalog_only,
        web_only,
        conflicts: conflicts.iter().map(|p| p.conflicts.len()).sum(),
        table_rows: table.len(),
        mean_confidence,
        reason,
    }
}
