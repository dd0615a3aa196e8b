use pathfinding::kuhn_munkres::kuhn_munkres;
use pathfinding::matrix::Matrix;

use crate::config::{MatchConfig, MatchStrategy, ScoringConfig};
use crate::model::{CatalogItem, MatchCandidate, PairMatchOutput, WebItem};
use crate::similarity::{score_keys, CatalogKey, ScoreBreakdown, WebKey};

// ---------------------------------------------------------------------------
// Score matrix
// ---------------------------------------------------------------------------

/// Row-major `|catalog| x |web|` grid of confidences.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<f64>,
}

impl ScoreMatrix {
    /// Every row must hold exactly `cols` scores.
    pub(crate) fn from_rows(rows: Vec<Vec<f64>>, cols: usize) -> Self {
        let n = rows.len();
        let mut cells = Vec::with_capacity(n * cols);
        for row in rows {
            assert_eq!(row.len(), cols, "ragged score matrix");
            cells.extend(row);
        }
        Self { rows: n, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cells[row * self.cols + col]
    }
}

/// Every catalog x web breakdown. Keys are normalized once per item.
pub fn score_all(
    catalog: &[CatalogItem],
    web: &[WebItem],
    weights: &ScoringConfig,
) -> Vec<Vec<ScoreBreakdown>> {
    let catalog_keys: Vec<CatalogKey> = catalog.iter().map(CatalogKey::of).collect();
    let web_keys: Vec<WebKey> = web.iter().map(WebKey::of).collect();

    catalog_keys
        .iter()
        .map(|ck| web_keys.iter().map(|wk| score_keys(ck, wk, weights)).collect())
        .collect()
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Pair catalog and web records one-to-one. Pairs below `config.min_score`
/// are never accepted; everything left over is reported as unmatched in
/// input order.
pub fn match_items(
    catalog: &[CatalogItem],
    web: &[WebItem],
    config: &MatchConfig,
) -> PairMatchOutput {
    if catalog.is_empty() || web.is_empty() {
        return PairMatchOutput {
            matches: Vec::new(),
            unmatched_catalog: catalog.to_vec(),
            unmatched_web: web.to_vec(),
        };
    }

    let breakdowns = score_all(catalog, web, &config.weights);
    let matrix = ScoreMatrix::from_rows(
        breakdowns
            .iter()
            .map(|row| row.iter().map(|b| b.score).collect())
            .collect(),
        web.len(),
    );

    let pairs = match config.strategy {
        MatchStrategy::Greedy => assign_greedy(&matrix, config.min_score),
        MatchStrategy::Optimal => assign_optimal(&matrix, config.min_score),
    };

    let mut catalog_used = vec![false; catalog.len()];
    let mut web_used = vec![false; web.len()];
    let mut matches = Vec::with_capacity(pairs.len());

    for (ci, wi) in pairs {
        catalog_used[ci] = true;
        web_used[wi] = true;
        let breakdown = &breakdowns[ci][wi];
        matches.push(MatchCandidate {
            catalog_index: ci,
            web_index: wi,
            catalog: catalog[ci].clone(),
            web: web[wi].clone(),
            score: breakdown.score,
            match_type: breakdown.match_type,
        });
    }

    let unmatched_catalog: Vec<CatalogItem> = catalog
        .iter()
        .enumerate()
        .filter(|(i, _)| !catalog_used[*i])
        .map(|(_, c)| c.clone())
        .collect();

    let unmatched_web: Vec<WebItem> = web
        .iter()
        .enumerate()
        .filter(|(i, _)| !web_used[*i])
        .map(|(_, w)| w.clone())
        .collect();

    log::debug!(
        "{} strategy: {} matched of {}x{} (min_score {})",
        config.strategy,
        matches.len(),
        catalog.len(),
        web.len(),
        config.min_score,
    );

    PairMatchOutput {
        matches,
        unmatched_catalog,
        unmatched_web,
    }
}

/// Eligible `(row, col, score)` triples, best first. Ties break on
/// `(row, col)` ascending so identical input always walks the same order.
fn ranked_triples(matrix: &ScoreMatrix, min_score: f64) -> Vec<(usize, usize, f64)> {
    let mut triples = Vec::new();
    for r in 0..matrix.rows() {
        for c in 0..matrix.cols() {
            let s = matrix.get(r, c);
            if s >= min_score {
                triples.push((r, c, s));
            }
        }
    }
    triples.sort_by(|a, b| {
        b.2.total_cmp(&a.2)
            .then(a.0.cmp(&b.0))
            .then(a.1.cmp(&b.1))
    });
    triples
}

/// Walk eligible pairs best-first, accepting a pair only when neither side
/// has been consumed. Returns accepted `(row, col)` in acceptance order.
pub fn assign_greedy(matrix: &ScoreMatrix, min_score: f64) -> Vec<(usize, usize)> {
    let mut row_used = vec![false; matrix.rows()];
    let mut col_used = vec![false; matrix.cols()];
    let mut accepted = Vec::new();

    for (r, c, _) in ranked_triples(matrix, min_score) {
        if row_used[r] || col_used[c] {
            continue;
        }
        row_used[r] = true;
        col_used[c] = true;
        accepted.push((r, c));
    }

    accepted
}

/// Solver weights are integers; scores are scaled to nano-units.
const WEIGHT_SCALE: f64 = 1e9;

/// Maximum-total-score one-to-one assignment over eligible pairs. Equal
/// totals prefer the assignment with more pairs.
/// Returned in the same best-first order as [`assign_greedy`].
pub fn assign_optimal(matrix: &ScoreMatrix, min_score: f64) -> Vec<(usize, usize)> {
    let (rows, cols) = (matrix.rows(), matrix.cols());
    if rows == 0 || cols == 0 {
        return Vec::new();
    }

    // kuhn_munkres needs rows <= columns; solve on the transpose otherwise.
    let transposed = rows > cols;
    let (n, m) = if transposed { (cols, rows) } else { (rows, cols) };

    // Scores are spread by `n + 1` so the one-unit pair bonus can only
    // decide between equal totals. Ineligible pairs weigh nothing.
    let spread = n as i64 + 1;
    let weight = |r: usize, c: usize| -> i64 {
        let s = matrix.get(r, c);
        if s >= min_score {
            (s * WEIGHT_SCALE).round() as i64 * spread + 1
        } else {
            0
        }
    };

    let mut weights = Matrix::new(n, m, 0i64);
    for i in 0..n {
        for j in 0..m {
            weights[(i, j)] = if transposed { weight(j, i) } else { weight(i, j) };
        }
    }
    let (_, assignment) = kuhn_munkres(&weights);

    let mut accepted: Vec<(usize, usize, f64)> = assignment
        .into_iter()
        .enumerate()
        .map(|(i, j)| if transposed { (j, i) } else { (i, j) })
        .map(|(r, c)| (r, c, matrix.get(r, c)))
        .filter(|(_, _, s)| *s >= min_score)
        .collect();
    accepted.sort_by(|a, b| {
        b.2.total_cmp(&a.2)
            .then(a.0.cmp(&b.0))
            .then(a.1.cmp(&b.1))
    });
    accepted.into_iter().map(|(r, c, _)| (r, c)).collect()
}
