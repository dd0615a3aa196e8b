use std::collections::BTreeSet;

use crate::model::{
    CatalogItem, ComparisonRow, Conflict, Fields, MatchCandidate, RowKind, Source, WebItem,
};

/// Merge matched pairs and both leftover lists into one display table.
///
/// Order: matched rows (acceptance order, i.e. descending confidence), then
/// catalog-only rows, then web-only rows, each in input order. No row is
/// dropped. `conflicts_by_pair` is parallel to `matches`.
pub fn build_table(
    matches: &[MatchCandidate],
    unmatched_catalog: &[CatalogItem],
    unmatched_web: &[WebItem],
    conflicts_by_pair: &[Vec<Conflict>],
) -> Vec<ComparisonRow> {
    let mut rows =
        Vec::with_capacity(matches.len() + unmatched_catalog.len() + unmatched_web.len());

    for (i, m) in matches.iter().enumerate() {
        let has_conflict = conflicts_by_pair.get(i).is_some_and(|c| !c.is_empty());
        rows.push(matched_row(m, has_conflict));
    }
    rows.extend(unmatched_catalog.iter().map(catalog_only_row));
    rows.extend(unmatched_web.iter().map(web_only_row));

    rows
}

fn matched_row(m: &MatchCandidate, has_conflict: bool) -> ComparisonRow {
    ComparisonRow {
        kind: RowKind::Matched,
        title: m.catalog.title.clone(),
        brand: m.catalog.brand.clone(),
        catalog_price: m.catalog.price,
        web_price: m.web.price,
        catalog_id: Some(m.catalog.id.clone()),
        web_url: Some(m.web.url.clone()),
        web_source: non_empty(&m.web.source),
        match_confidence: Some(m.score),
        has_conflict,
        sources: BTreeSet::from([Source::Catalog, Source::Web]),
        catalog_fields: m.catalog.extra.clone(),
        web_fields: m.web.extra.clone(),
    }
}

fn catalog_only_row(c: &CatalogItem) -> ComparisonRow {
    ComparisonRow {
        kind: RowKind::CatalogOnly,
        title: c.title.clone(),
        brand: c.brand.clone(),
        catalog_price: c.price,
        web_price: None,
        catalog_id: Some(c.id.clone()),
        web_url: None,
        web_source: None,
        match_confidence: None,
        has_conflict: false,
        sources: BTreeSet::from([Source::Catalog]),
        catalog_fields: c.extra.clone(),
        web_fields: Fields::new(),
    }
}

fn web_only_row(w: &WebItem) -> ComparisonRow {
    ComparisonRow {
        kind: RowKind::WebOnly,
        title: w.title.clone(),
        brand: w.brand.clone(),
        catalog_price: None,
        web_price: w.price,
        catalog_id: None,
        web_url: Some(w.url.clone()),
        web_source: non_empty(&w.source),
        match_confidence: None,
        has_conflict: false,
        sources: BTreeSet::from([Source::Web]),
        catalog_fields: Fields::new(),
        web_fields: w.extra.clone(),
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConflictKind, MatchType};

    fn candidate(ci: usize, wi: usize, score: f64) -> MatchCandidate {
        MatchCandidate {
            catalog_index: ci,
            web_index: wi,
            catalog: CatalogItem::new(format!("doc_{ci}"), format!("Catalog {ci}"))
                .with_brand("Plan Toys")
                .with_price(15.0)
                .with_field("rating", 4.5),
            web: WebItem::new(format!("https://shop.example/{wi}"), format!("Web {wi}"))
                .with_price(12.5)
                .with_source("shop.example")
                .with_field("thumbnail", "https://img.example/1.jpg"),
            score,
            match_type: MatchType::BrandTitle,
        }
    }

    fn price_conflict() -> Conflict {
        Conflict {
            kind: ConflictKind::PriceDiscrepancy,
            catalog_value: 15.0,
            web_value: 12.5,
            absolute_difference: 2.5,
            relative_difference: Some(2.5 / 15.0),
            message: "Catalog shows $15.00, web shows $12.50 (16.7% difference)".into(),
        }
    }

    #[test]
    fn orders_matched_then_catalog_then_web() {
        let matches = vec![candidate(1, 0, 0.92), candidate(0, 2, 0.71)];
        let unmatched_catalog = vec![CatalogItem::new("doc_7", "Lonely Catalog")];
        let unmatched_web = vec![
            WebItem::new("https://a.example/x", "Web X"),
            WebItem::new("https://a.example/y", "Web Y"),
        ];
        let table = build_table(&matches, &unmatched_catalog, &unmatched_web, &[vec![], vec![]]);

        let kinds: Vec<RowKind> = table.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RowKind::Matched,
                RowKind::Matched,
                RowKind::CatalogOnly,
                RowKind::WebOnly,
                RowKind::WebOnly
            ]
        );
        assert_eq!(table[0].match_confidence, Some(0.92));
        assert_eq!(table[1].match_confidence, Some(0.71));
        assert_eq!(table[3].web_url.as_deref(), Some("https://a.example/x"));
        assert_eq!(table[4].web_url.as_deref(), Some("https://a.example/y"));
    }

    #[test]
    fn matched_row_carries_both_sides() {
        let table = build_table(&[candidate(0, 0, 0.8)], &[], &[], &[vec![price_conflict()]]);
        let row = &table[0];
        assert_eq!(row.title, "Catalog 0");
        assert_eq!(row.brand.as_deref(), Some("Plan Toys"));
        assert_eq!(row.catalog_price, Some(15.0));
        assert_eq!(row.web_price, Some(12.5));
        assert_eq!(row.catalog_id.as_deref(), Some("doc_0"));
        assert_eq!(row.web_source.as_deref(), Some("shop.example"));
        assert!(row.has_conflict);
        assert_eq!(row.sources, BTreeSet::from([Source::Catalog, Source::Web]));
        assert_eq!(row.catalog_fields["rating"], 4.5);
        assert_eq!(row.web_fields["thumbnail"], "https://img.example/1.jpg");
    }

    #[test]
    fn singleton_rows_leave_other_side_absent() {
        let c = CatalogItem::new("doc_9", "Catalog Only").with_price(3.0);
        let w = WebItem::new("https://w.example/1", "Web Only").with_price(4.0);
        let table = build_table(&[], &[c], &[w], &[]);

        let cat = &table[0];
        assert_eq!(cat.sources, BTreeSet::from([Source::Catalog]));
        assert_eq!(cat.web_price, None);
        assert_eq!(cat.web_url, None);
        assert_eq!(cat.match_confidence, None);
        assert!(!cat.has_conflict);

        let web = &table[1];
        assert_eq!(web.sources, BTreeSet::from([Source::Web]));
        assert_eq!(web.catalog_price, None);
        assert_eq!(web.catalog_id, None);
        assert_eq!(web.web_price, Some(4.0));
        assert_eq!(web.web_source, None, "empty site label is reported as absent");
        assert!(!web.has_conflict);
    }

    #[test]
    fn row_count_is_conserved() {
        let matches = vec![candidate(0, 0, 0.9)];
        let uc = vec![CatalogItem::new("a", "A"), CatalogItem::new("b", "B")];
        let uw = vec![WebItem::new("u", "U")];
        let table = build_table(&matches, &uc, &uw, &[vec![]]);
        assert_eq!(table.len(), matches.len() + uc.len() + uw.len());
        assert!(!table[0].has_conflict);
    }
}
