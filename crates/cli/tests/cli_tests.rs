// Integration tests for the shopmatch binary: --json stdout contract and
// exit codes.
//
// Run with: cargo test -p shopmatch-cli --test cli_tests -- --nocapture

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const CATALOG_JSON: &str = r#"[
  {"doc_id": "doc_00123", "title": "Melissa & Doug Wooden Jigsaw Puzzle",
   "brand": "Melissa & Doug", "price": 12.99, "main_category": "Toys & Games"},
  {"doc_id": "doc_00456", "title": "Green Toys Dump Truck",
   "brand": "Green Toys", "price": 10.00},
  {"doc_id": "doc_00789", "title": "Hape Wooden Xylophone", "brand": "Hape", "price": 24.99}
]"#;

const WEB_JSON: &str = r#"{"results": [
  {"title": "Melissa and Doug Wooden Jigsaw Puzzle, 24pc",
   "url": "https://www.amazon.com/melissa-doug-wooden-puzzle",
   "price": "$15.99", "source": "amazon.com", "rating": 4.7},
  {"title": "Green Toys Dump Truck",
   "url": "https://www.target.com/p/green-toys-dump-truck",
   "snippet": "Green Toys recycled plastic dump truck.",
   "price": 10.10, "source": "target.com"},
  {"title": "LEGO Classic Creative Bricks Box",
   "url": "https://www.walmart.com/ip/lego-classic-bricks",
   "price": "$34.99", "source": "walmart.com"}
]}"#;

const WEB_CSV: &str = "\
url,title,price,source,snippet
https://www.amazon.com/melissa-doug-wooden-puzzle,\"Melissa and Doug Wooden Jigsaw Puzzle, 24pc\",$15.99,amazon.com,
https://www.target.com/p/green-toys-dump-truck,Green Toys Dump Truck,$10.10,target.com,Green Toys recycled plastic dump truck.
https://www.walmart.com/ip/lego-classic-bricks,LEGO Classic Creative Bricks Box,$34.99,walmart.com,
";

fn shopmatch() -> Command {
    Command::new(env!("CARGO_BIN_EXE_shopmatch"))
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn run(args: &[&str]) -> Output {
    shopmatch().args(args).output().expect("shopmatch")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Assert stdout is a single, parseable JSON value with no extra lines.
fn assert_single_json(stdout: &str) -> serde_json::Value {
    let trimmed = stdout.trim();
    assert!(!trimmed.is_empty(), "stdout should not be empty");

    serde_json::from_str(trimmed).unwrap_or_else(|e| {
        panic!("stdout must be valid JSON.\nParse error: {}\nstdout:\n{}", e, trimmed)
    })
}

/// Fixture directory with the standard catalog + web pair.
fn fixtures() -> (tempfile::TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write(dir.path(), "catalog.json", CATALOG_JSON);
    let web = write(dir.path(), "web.json", WEB_JSON);
    (dir, catalog, web)
}

// ===========================================================================
// shopmatch run --json
// ===========================================================================

#[test]
fn run_json_produces_single_report() {
    let (_dir, catalog, web) = fixtures();
    let output = run(&[
        "run",
        "--catalog", catalog.to_str().unwrap(),
        "--web", web.to_str().unwrap(),
        "--json",
    ]);

    assert!(output.status.success(), "exit code: {:?}\nstderr: {}", output.status, stderr(&output));

    let val = assert_single_json(&String::from_utf8_lossy(&output.stdout));
    let obj = val.as_object().expect("should be JSON object");
    for key in ["meta", "summary", "table", "conflicts", "matches", "unmatched_catalog", "unmatched_web"] {
        assert!(obj.contains_key(key), "must have '{key}' key");
    }

    assert_eq!(val["meta"]["strategy"], "greedy");
    assert_eq!(val["meta"]["engine_version"], env!("CARGO_PKG_VERSION"));
    assert!(val["meta"]["run_at"].is_string());

    assert_eq!(val["summary"]["matched"], 2);
    assert_eq!(val["summary"]["catalog_only"], 1);
    assert_eq!(val["summary"]["web_only"], 1);
    assert_eq!(val["summary"]["conflicts"], 1);
    assert_eq!(val["table"].as_array().unwrap().len(), 4);
    assert_eq!(
        val["conflicts"][0]["conflicts"][0]["message"],
        "Catalog shows $12.99, web shows $15.99 (23.1% difference)"
    );
}

#[test]
fn human_summary_goes_to_stderr() {
    let (_dir, catalog, web) = fixtures();
    let output = run(&["run", "--catalog", catalog.to_str().unwrap(), "--web", web.to_str().unwrap()]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty(), "stdout must stay empty without --json");
    let err = stderr(&output);
    assert!(
        err.contains("reconciled 3 catalog × 3 web: 2 matched, 1 catalog-only, 1 web-only, 1 conflict"),
        "stderr: {err}"
    );
    assert!(err.contains("doc_00123"), "conflict line should cite the pair: {err}");
}

#[test]
fn json_mode_keeps_summary_on_stderr_only() {
    let (_dir, catalog, web) = fixtures();
    let output = run(&[
        "run",
        "--catalog", catalog.to_str().unwrap(),
        "--web", web.to_str().unwrap(),
        "--json",
    ]);

    assert!(output.status.success());
    let out = String::from_utf8_lossy(&output.stdout);
    assert!(!out.contains("reconciled 3 catalog"), "summary leaked into stdout");
    let err = stderr(&output);
    assert!(err.contains("reconciled 3 catalog × 3 web"), "stderr: {err}");
    assert!(!err.contains("<->"), "conflict lines are suppressed with --json: {err}");
}

#[test]
fn csv_input_by_extension() {
    let (dir, catalog, _) = fixtures();
    let web = write(dir.path(), "web.csv", WEB_CSV);
    let output = run(&[
        "run",
        "--catalog", catalog.to_str().unwrap(),
        "--web", web.to_str().unwrap(),
        "--json",
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let val = assert_single_json(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(val["summary"]["matched"], 2);
}

#[test]
fn output_file_written() {
    let (dir, catalog, web) = fixtures();
    let out = dir.path().join("report.json");
    let output = run(&[
        "run",
        "--catalog", catalog.to_str().unwrap(),
        "--web", web.to_str().unwrap(),
        "--output", out.to_str().unwrap(),
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(output.stdout.is_empty());
    let report: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(report["summary"]["table_rows"], 4);
}

#[test]
fn config_and_overrides() {
    let (dir, catalog, web) = fixtures();
    let config = write(dir.path(), "match.toml", "[price]\nrelative_threshold = 0.5\n");
    let output = run(&[
        "run",
        "--catalog", catalog.to_str().unwrap(),
        "--web", web.to_str().unwrap(),
        "--config", config.to_str().unwrap(),
        "--strategy", "optimal",
        "--json",
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let val = assert_single_json(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(val["meta"]["strategy"], "optimal");
    assert_eq!(val["summary"]["conflicts"], 0);
}

// ===========================================================================
// Exit codes
// ===========================================================================

#[test]
fn exit_6_on_conflict_when_requested() {
    let (_dir, catalog, web) = fixtures();
    let output = run(&[
        "run",
        "--catalog", catalog.to_str().unwrap(),
        "--web", web.to_str().unwrap(),
        "--fail-on-conflict",
    ]);
    assert_eq!(output.status.code(), Some(6), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("1 price conflict found"));
}

#[test]
fn exit_7_on_empty_when_requested() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write(dir.path(), "catalog.json", "[]");
    let web = write(dir.path(), "web.json", r#"{"results": []}"#);

    let ok = run(&["run", "--catalog", catalog.to_str().unwrap(), "--web", web.to_str().unwrap()]);
    assert!(ok.status.success());

    let output = run(&[
        "run",
        "--catalog", catalog.to_str().unwrap(),
        "--web", web.to_str().unwrap(),
        "--fail-on-empty",
    ]);
    assert_eq!(output.status.code(), Some(7));
}

#[test]
fn exit_3_on_missing_file() {
    let (_dir, catalog, _) = fixtures();
    let output = run(&["run", "--catalog", catalog.to_str().unwrap(), "--web", "/nonexistent/web.json"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("cannot read"));
}

#[test]
fn exit_3_on_missing_csv_column() {
    let (dir, catalog, _) = fixtures();
    let web = write(dir.path(), "web.csv", "title,price\nBlocks,3.00\n");
    let output = run(&["run", "--catalog", catalog.to_str().unwrap(), "--web", web.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("missing column 'url'"));
}

#[test]
fn exit_4_on_invalid_config() {
    let (dir, catalog, web) = fixtures();
    let config = write(dir.path(), "match.toml", "min_score = 1.5\n");
    let output = run(&[
        "run",
        "--catalog", catalog.to_str().unwrap(),
        "--web", web.to_str().unwrap(),
        "--config", config.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn exit_5_on_duplicate_catalog_id() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write(
        dir.path(),
        "catalog.json",
        r#"[{"id": "a", "title": "Blocks"}, {"id": "a", "title": "Rings"}]"#,
    );
    let web = write(dir.path(), "web.json", "[]");
    let output = run(&["run", "--catalog", catalog.to_str().unwrap(), "--web", web.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("duplicate id"));
}

#[test]
fn exit_2_on_unknown_strategy() {
    let (_dir, catalog, web) = fixtures();
    let output = run(&[
        "run",
        "--catalog", catalog.to_str().unwrap(),
        "--web", web.to_str().unwrap(),
        "--strategy", "fastest",
    ]);
    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.contains("possible values: greedy, optimal"), "{err}");
}

#[test]
fn exit_5_on_duplicate_web_url() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write(dir.path(), "catalog.json", CATALOG_JSON);
    let web = write(
        dir.path(),
        "web.json",
        r#"[{"url": "https://x.example/p", "title": "Green Toys Dump Truck"},
            {"url": "https://x.example/p", "title": "Green Toys Dump Truck Large"}]"#,
    );
    let output = run(&["run", "--catalog", catalog.to_str().unwrap(), "--web", web.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("duplicate url"), "stderr: {}", stderr(&output));
}

// ===========================================================================
// shopmatch validate
// ===========================================================================

#[test]
fn validate_prints_effective_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(dir.path(), "match.toml", "min_score = 0.6\nstrategy = \"optimal\"\n");
    let output = run(&["validate", config.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let err = stderr(&output);
    assert!(err.contains("strategy=optimal"), "{err}");
    assert!(err.contains("min_score=0.6"), "{err}");
}

#[test]
fn validate_rejects_unknown_keys() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(dir.path(), "match.toml", "min_scor = 0.6\n");
    let output = run(&["validate", config.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(4));
}
