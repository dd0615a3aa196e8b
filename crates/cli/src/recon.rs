//! `shopmatch run` and `shopmatch validate`: catalog vs web reconciliation.

use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use serde::Serialize;
use shopmatch_recon::load::{catalog_from_csv, catalog_from_json, web_from_csv, web_from_json};
use shopmatch_recon::{reconcile, CatalogItem, MatchConfig, MatchStrategy, Reconciliation, WebItem};

use crate::exit_codes::{
    recon_exit_code, EXIT_CONFLICTS, EXIT_EMPTY, EXIT_ERROR, EXIT_INPUT, EXIT_INVALID_CONFIG,
};
use crate::CliError;

#[derive(Args)]
pub struct RunArgs {
    /// Catalog results (.json or .csv)
    #[arg(long)]
    pub catalog: PathBuf,

    /// Web results (.json or .csv)
    #[arg(long)]
    pub web: PathBuf,

    /// Match config (TOML). Defaults apply when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the match acceptance floor
    #[arg(long)]
    pub min_score: Option<f64>,

    /// Override the assignment strategy
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Output JSON to stdout (summary line still goes to stderr)
    #[arg(long)]
    pub json: bool,

    /// Write JSON output to file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Exit non-zero when any matched pair has a price conflict
    #[arg(long)]
    pub fail_on_conflict: bool,

    /// Exit non-zero when the comparison table is empty
    #[arg(long)]
    pub fail_on_empty: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    /// Best pair first, each side used once
    Greedy,
    /// Maximum total confidence
    Optimal,
}

impl From<StrategyArg> for MatchStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Greedy => MatchStrategy::Greedy,
            StrategyArg::Optimal => MatchStrategy::Optimal,
        }
    }
}

#[derive(Serialize)]
struct ReportMeta {
    engine_version: &'static str,
    strategy: MatchStrategy,
    min_score: f64,
    run_at: String,
}

#[derive(Serialize)]
struct Report<'a> {
    meta: ReportMeta,
    #[serde(flatten)]
    result: &'a Reconciliation,
}

fn recon_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

fn engine_err(err: shopmatch_recon::ReconError) -> CliError {
    recon_err(recon_exit_code(&err), err.to_string())
}

/// Config file (or defaults) with command-line overrides applied.
fn resolve_config(
    path: Option<&Path>,
    min_score: Option<f64>,
    strategy: Option<StrategyArg>,
) -> Result<MatchConfig, CliError> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| {
                recon_err(EXIT_INPUT, format!("cannot read config {}: {e}", path.display()))
            })?;
            MatchConfig::from_toml(&text).map_err(engine_err)?
        }
        None => MatchConfig::default(),
    };

    if let Some(s) = strategy {
        config.strategy = s.into();
    }
    if let Some(m) = min_score {
        config.min_score = m;
    }
    config
        .validate()
        .map_err(|e| recon_err(EXIT_INVALID_CONFIG, e.to_string()))?;
    Ok(config)
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

fn read_input(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path)
        .map_err(|e| recon_err(EXIT_INPUT, format!("cannot read {}: {e}", path.display())))
}

fn load_catalog(path: &Path) -> Result<Vec<CatalogItem>, CliError> {
    let text = read_input(path)?;
    let items = if is_csv(path) {
        catalog_from_csv(&text)
    } else {
        catalog_from_json(&text)
    };
    items.map_err(|e| engine_err(e).with_hint(format!("while loading {}", path.display())))
}

fn load_web(path: &Path) -> Result<Vec<WebItem>, CliError> {
    let text = read_input(path)?;
    let items = if is_csv(path) { web_from_csv(&text) } else { web_from_json(&text) };
    items.map_err(|e| engine_err(e).with_hint(format!("while loading {}", path.display())))
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let config = resolve_config(args.config.as_deref(), args.min_score, args.strategy)?;
    let catalog = load_catalog(&args.catalog)?;
    let web = load_web(&args.web)?;

    log::debug!(
        "loaded {} catalog and {} web records ({} strategy)",
        catalog.len(),
        web.len(),
        config.strategy,
    );

    let result = reconcile(&config, &catalog, &web).map_err(engine_err)?;

    let report = Report {
        meta: ReportMeta {
            engine_version: env!("CARGO_PKG_VERSION"),
            strategy: config.strategy,
            min_score: config.min_score,
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        result: &result,
    };

    if args.json || args.output.is_some() {
        let json_str = serde_json::to_string_pretty(&report)
            .map_err(|e| recon_err(EXIT_ERROR, format!("JSON serialization error: {e}")))?;

        if let Some(ref path) = args.output {
            std::fs::write(path, &json_str)
                .map_err(|e| recon_err(EXIT_INPUT, format!("cannot write output: {e}")))?;
            eprintln!("wrote {}", path.display());
        }

        if args.json {
            println!("{json_str}");
        }
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "reconciled {} catalog × {} web: {} matched, {} catalog-only, {} web-only, {}",
        s.catalog_items,
        s.web_items,
        s.matched,
        s.catalog_only,
        s.web_only,
        plural(s.conflicts, "conflict"),
    );
    if let Some(reason) = s.reason {
        eprintln!("matching skipped: {reason}");
    }
    if !args.json {
        for pair in &result.conflicts {
            for c in &pair.conflicts {
                eprintln!("  {} <-> {}: {}", pair.catalog_id, pair.web_url, c.message);
            }
        }
    }

    if args.fail_on_empty && s.table_rows == 0 {
        return Err(recon_err(EXIT_EMPTY, "no rows in comparison table"));
    }
    if args.fail_on_conflict && s.conflicts > 0 {
        return Err(recon_err(
            EXIT_CONFLICTS,
            format!("{} found", plural(s.conflicts, "price conflict")),
        ));
    }

    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = resolve_config(Some(&config_path), None, None)?;
    eprintln!(
        "valid: strategy={} min_score={} weights(brand={}, title={}, snippet_bonus={}) price(relative={}, absolute={})",
        config.strategy,
        config.min_score,
        config.weights.brand,
        config.weights.title,
        config.weights.snippet_bonus,
        config.price.relative_threshold,
        config.price.absolute_threshold,
    );
    Ok(())
}
