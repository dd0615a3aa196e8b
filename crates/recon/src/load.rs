//! String loaders for upstream search results. No file I/O here: callers
//! read the document and pass its contents.

use serde_json::Value;

use crate::error::ReconError;
use crate::model::{CatalogItem, Fields, Source, WebItem};
use crate::price::parse_price;

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// A JSON array of catalog records, or a search response `{"results": [...]}`.
/// The identifier is read from `id`, falling back to `doc_id`.
pub fn catalog_from_json(input: &str) -> Result<Vec<CatalogItem>, ReconError> {
    json_records(Source::Catalog, input)?
        .into_iter()
        .enumerate()
        .map(|(i, mut record)| {
            if let Value::Object(ref mut obj) = record {
                if !obj.contains_key("id") {
                    if let Some(doc_id) = obj.remove("doc_id") {
                        obj.insert("id".into(), doc_id);
                    }
                }
                if let Some(Value::Number(n)) = obj.get("id") {
                    let id = n.to_string();
                    obj.insert("id".into(), Value::String(id));
                }
            }
            serde_json::from_value(record).map_err(|e| ReconError::InputParse {
                side: Source::Catalog,
                reason: format!("record {i}: {e}"),
            })
        })
        .collect()
}

/// A JSON array of web results, or a search response `{"results": [...]}`.
pub fn web_from_json(input: &str) -> Result<Vec<WebItem>, ReconError> {
    json_records(Source::Web, input)?
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            serde_json::from_value(record).map_err(|e| ReconError::InputParse {
                side: Source::Web,
                reason: format!("record {i}: {e}"),
            })
        })
        .collect()
}

fn json_records(side: Source, input: &str) -> Result<Vec<Value>, ReconError> {
    let doc: Value = serde_json::from_str(input).map_err(|e| ReconError::InputParse {
        side,
        reason: e.to_string(),
    })?;

    match doc {
        Value::Array(items) => Ok(items),
        Value::Object(mut obj) => match obj.remove("results") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(ReconError::InputParse {
                side,
                reason: "expected an array or an object with a \"results\" array".into(),
            }),
        },
        _ => Err(ReconError::InputParse {
            side,
            reason: "expected an array or an object with a \"results\" array".into(),
        }),
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

struct CsvTable {
    headers: Vec<String>,
    records: Vec<csv::StringRecord>,
}

impl CsvTable {
    fn read(side: Source, input: &str) -> Result<Self, ReconError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(input.as_bytes());

        let parse_err = |e: csv::Error| ReconError::InputParse {
            side,
            reason: e.to_string(),
        };

        let headers: Vec<String> = reader
            .headers()
            .map_err(parse_err)?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let records = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(parse_err)?;

        Ok(Self { headers, records })
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    fn require(&self, side: Source, names: &[&str]) -> Result<usize, ReconError> {
        names
            .iter()
            .find_map(|n| self.position(n))
            .ok_or_else(|| ReconError::MissingColumn {
                side,
                column: names[0].into(),
            })
    }

    /// Every column not in `known`, forwarded as a string.
    fn extra(&self, record: &csv::StringRecord, known: &[Option<usize>]) -> Fields {
        let mut fields = Fields::new();
        for (i, h) in self.headers.iter().enumerate() {
            if known.contains(&Some(i)) {
                continue;
            }
            if let Some(val) = record.get(i) {
                fields.insert(h.clone(), Value::String(val.to_string()));
            }
        }
        fields
    }
}

fn cell(record: &csv::StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn price_cell(record: &csv::StringRecord, idx: Option<usize>) -> Option<f64> {
    let raw = cell(record, idx)?;
    let parsed = parse_price(&raw);
    if parsed.is_none() {
        log::debug!("ignoring unparseable price {raw:?}");
    }
    parsed
}

/// Catalog CSV: `id` (or `doc_id`) and `title` required; `brand`, `price`
/// optional; any other column is passed through.
pub fn catalog_from_csv(input: &str) -> Result<Vec<CatalogItem>, ReconError> {
    let side = Source::Catalog;
    let table = CsvTable::read(side, input)?;

    let id_idx = table.require(side, &["id", "doc_id"])?;
    let title_idx = table.require(side, &["title"])?;
    let brand_idx = table.position("brand");
    let price_idx = table.position("price");
    let known = [Some(id_idx), Some(title_idx), brand_idx, price_idx];

    Ok(table
        .records
        .iter()
        .map(|record| CatalogItem {
            id: record.get(id_idx).unwrap_or("").trim().to_string(),
            title: record.get(title_idx).unwrap_or("").to_string(),
            brand: cell(record, brand_idx),
            price: price_cell(record, price_idx),
            extra: table.extra(record, &known),
        })
        .collect())
}

/// Web CSV: `url` and `title` required; `price`, `source`, `snippet`,
/// `brand` optional; any other column is passed through.
pub fn web_from_csv(input: &str) -> Result<Vec<WebItem>, ReconError> {
    let side = Source::Web;
    let table = CsvTable::read(side, input)?;

    let url_idx = table.require(side, &["url"])?;
    let title_idx = table.require(side, &["title"])?;
    let price_idx = table.position("price");
    let source_idx = table.position("source");
    let snippet_idx = table.position("snippet");
    let brand_idx = table.position("brand");
    let known = [
        Some(url_idx),
        Some(title_idx),
        price_idx,
        source_idx,
        snippet_idx,
        brand_idx,
    ];

    Ok(table
        .records
        .iter()
        .map(|record| WebItem {
            url: record.get(url_idx).unwrap_or("").trim().to_string(),
            title: record.get(title_idx).unwrap_or("").to_string(),
            price: price_cell(record, price_idx),
            source: cell(record, source_idx).unwrap_or_default(),
            snippet: cell(record, snippet_idx),
            brand: cell(record, brand_idx),
            extra: table.extra(record, &known),
        })
        .collect())
}
