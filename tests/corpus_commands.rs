// SPDX-License-Identifier: MIT OR Apache-2.0

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const JAPJI: &str = "ਸ੍ਰੀ ਗੁਰੂ ਗ੍ਰੰਥ ਸਾਹਿਬ ਜੀ
ੴ ਸਤਿ ਨਾਮੁ ਕਰਤਾ ਪੁਰਖੁ ਨਿਰਭਉ ਨਿਰਵੈਰੁ (1-1)
ਅਕਾਲ ਮੂਰਤਿ ਅਜੂਨੀ ਸੈਭੰ ਗੁਰ ਪ੍ਰਸਾਦਿ ॥ (1-2)

॥ ਜਪੁ ॥ (1-3)
ਆਦਿ ਸਚੁ ਜੁਗਾਦਿ ਸਚੁ ॥ (1-4)
ਹੈ ਭੀ ਸਚੁ ਨਾਨਕ ਹੋਸੀ ਭੀ ਸਚੁ ॥੧॥ (1-5)
ਸੋਚੈ ਸੋਚਿ ਨ ਹੋਵਈ ਜੇ ਸੋਚੀ ਲਖ ਵਾਰ ॥ (1-6)
";

const NOISY: &str = "ਗੁਰ ਪੱੱਾਦ ਜਾਪ ਆਦ ਸਾਚ ਜਗਾਦ ਸਾਚ ਹਿ ਸਾਚ ਨਾਨਕ ਹੋ ਸੀਬੀ ਸਾਚ ਸਚ਼ਿ ਸ਼ਿ ਸ਼ਿ ਸ਼ਿ ਸ਼ਿ";

fn versefind(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("versefind"));
    cmd.current_dir(dir).env("HOME", dir).env_remove("RUST_LOG");
    cmd
}

fn json_output(cmd: &mut Command) -> Value {
    let assert = cmd.assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    serde_json::from_str(&stdout).expect("json")
}

fn loaded_corpus() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("japji.txt"), JAPJI).expect("write corpus");
    versefind(dir.path())
        .args(["load", "japji.txt", "--skip-first", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Loaded 6 line(s)"));
    dir
}

#[test]
fn load_reports_counts_and_stats_agree() {
    let dir = loaded_corpus();

    let stats = json_output(versefind(dir.path()).args(["--format", "json", "stats"]));
    assert_eq!(stats["total_lines"], 6);
    assert_eq!(stats["total_pages"], 1);
    assert!(dir.path().join("versefind.db").exists());
}

#[test]
fn load_with_clear_replaces_corpus() {
    let dir = loaded_corpus();
    let result = json_output(versefind(dir.path()).args([
        "--format",
        "json",
        "load",
        "japji.txt",
        "--skip-first",
        "1",
        "--clear",
    ]));
    assert_eq!(result["cleared"], 6);
    assert_eq!(result["inserted"], 6);
    assert_eq!(result["total_lines"], 6);
}

#[test]
fn fuzzy_search_finds_noisy_recitation() {
    let dir = loaded_corpus();
    let result = json_output(versefind(dir.path()).args([
        "--format",
        "json",
        "search",
        NOISY,
        "--min-similarity",
        "0.3",
    ]));

    let candidates = result["candidates"].as_array().expect("candidates array");
    let hit = candidates
        .iter()
        .find(|c| c["line"]["text"] == "ਆਦਿ ਸਚੁ ਜੁਗਾਦਿ ਸਚੁ ॥")
        .expect("reference line in results");
    assert!(hit["score"].as_f64().expect("score") >= 0.3);
    assert_ne!(hit["strategy"], "exact");
    assert_eq!(hit["line"]["page"], 1);
    assert_eq!(hit["line"]["line"], 4);
    assert!(result["cleaned"].as_str().expect("cleaned").ends_with("ਸ਼ਿ"));
}

#[test]
fn exact_search_returns_single_verbatim_hit() {
    let dir = loaded_corpus();
    let result = json_output(versefind(dir.path()).args([
        "--format",
        "json",
        "--compact",
        "search",
        "--exact",
        "ਆਦਿ ਸਚੁ ਜੁਗਾਦਿ ਸਚੁ ॥",
    ]));
    assert_eq!(result["total"], 1);
    let candidates = result["candidates"].as_array().expect("candidates array");
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0]["score"], 1.0);
    assert_eq!(candidates[0]["strategy"], "exact");
}

#[test]
fn exact_search_matches_line_with_halant() {
    let dir = loaded_corpus();
    let verse = "ਅਕਾਲ ਮੂਰਤਿ ਅਜੂਨੀ ਸੈਭੰ ਗੁਰ ਪ੍ਰਸਾਦਿ ॥";
    let result = json_output(versefind(dir.path()).args([
        "--format",
        "json",
        "search",
        "--exact",
        verse,
    ]));
    assert_eq!(result["total"], 1);
    let candidates = result["candidates"].as_array().expect("candidates array");
    assert_eq!(candidates[0]["line"]["text"], verse);
    assert_eq!(candidates[0]["line"]["line"], 2);
    assert_eq!(candidates[0]["strategy"], "exact");
}

#[test]
fn limit_truncates_but_total_counts_all() {
    let dir = loaded_corpus();
    let result = json_output(versefind(dir.path()).args([
        "--format",
        "json",
        "search",
        "-m",
        "1",
        "--min-similarity",
        "0",
        "ਸਚੁ",
    ]));
    assert_eq!(result["candidates"].as_array().expect("array").len(), 1);
    assert_eq!(result["total"], 6);
}

#[test]
fn empty_corpus_search_prints_load_hint() {
    let dir = TempDir::new().expect("tempdir");
    versefind(dir.path())
        .args(["search", "ਆਦਿ ਸਚੁ"])
        .assert()
        .success()
        .stderr(predicate::str::contains("versefind load"));
}

#[test]
fn out_of_range_threshold_is_an_error() {
    let dir = loaded_corpus();
    versefind(dir.path())
        .args(["search", "--min-similarity", "1.5", "ਸਚੁ"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("min_similarity"));
}

#[test]
fn zero_limit_is_an_error() {
    let dir = loaded_corpus();
    versefind(dir.path())
        .args(["search", "-m", "0", "ਸਚੁ"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("limit = 0 is out of range"));
}

#[test]
fn config_file_supplies_database_and_format() {
    let dir = loaded_corpus();
    fs::rename(dir.path().join("versefind.db"), dir.path().join("corpus.db")).expect("rename db");
    fs::write(
        dir.path().join(".versefindrc.toml"),
        "default_format = \"json\"\ndatabase = \"corpus.db\"\n",
    )
    .expect("write config");

    let stats = json_output(&mut versefind(dir.path()).arg("stats"));
    assert_eq!(stats["total_lines"], 6);
    assert_eq!(stats["database"], "corpus.db");
}

#[test]
fn missing_input_file_reports_path() {
    let dir = TempDir::new().expect("tempdir");
    versefind(dir.path())
        .args(["load", "missing.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.txt"));
}
