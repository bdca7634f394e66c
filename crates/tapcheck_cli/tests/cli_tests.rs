use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to get the absolute path to test fixtures
fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Helper to create a Command for the tapcheck binary
#[allow(deprecated)]
fn tapcheck() -> Command {
    Command::cargo_bin("tapcheck").expect("Failed to find tapcheck binary")
}

/// Writes a run configuration into `dir` whose outputs stay inside `dir`.
fn write_config(dir: &TempDir, sources: &[(&str, &str, PathBuf)]) -> PathBuf {
    let mut yaml = format!(
        "label: firebase_db\noutput_dir: {}\nsummary_dir: {}\nsources:\n",
        dir.path().join("validation_results").display(),
        dir.path().join("summaries").display()
    );
    for (name, environment, path) in sources {
        yaml.push_str(&format!(
            "  - name: {}\n    environment: {}\n    location:\n      type: file\n      path: {}\n",
            name,
            environment,
            path.display()
        ));
    }

    let config = dir.path().join("tapcheck.yml");
    fs::write(&config, yaml).unwrap();
    config
}

fn summary_csv(dir: &TempDir, source: &str) -> PathBuf {
    dir.path()
        .join("summaries")
        .join(format!("2024-05-01_firebase_db_validation_{}.csv", source))
}

// ============================================================================
// validate command tests
// ============================================================================

#[test]
fn test_validate_end_to_end() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &[("water_test", "test", fixture_path("water_test.json"))]);

    tapcheck()
        .arg("validate")
        .arg("--config")
        .arg(&config)
        .arg("--date")
        .arg("2024-05-01")
        .assert()
        .success()
        .stdout(predicate::str::contains("water_test"))
        .stdout(predicate::str::contains("Failures in water_test (batch)"));

    let summary = fs::read_to_string(summary_csv(&dir, "water_test")).unwrap();
    assert_eq!(
        summary,
        "Database,Errors,Warnings,Unexpected Types\nwater_test,1,0,0\n"
    );

    let failures =
        fs::read_to_string(dir.path().join("validation_results/water_test_errors.csv")).unwrap();
    assert_eq!(
        failures,
        "index,column,check,expected_type,actual_type,failure_case\n\
         4,lat,coerce_dtype('float'),float,string,north\n"
    );

    let text =
        fs::read_to_string(dir.path().join("validation_results/water_test_2024-05-01.txt"))
            .unwrap();
    assert!(text.contains("Rows retrieved: 5"));
    assert!(text.contains("Environment: test"));
    assert!(text.contains("Rows after key filter: 3"));
    assert!(text.contains("Most common city: Philadelphia (2)"));
    assert!(text.contains("Most common zip code: 19104 (2)"));
}

#[test]
fn test_validate_fail_on_errors() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &[("water_test", "test", fixture_path("water_test.json"))]);

    tapcheck()
        .arg("validate")
        .arg("--config")
        .arg(&config)
        .arg("--fail-on-errors")
        .assert()
        .failure();
}

#[test]
fn test_validate_rerun_is_identical() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &[("water_test", "test", fixture_path("water_test.json"))]);
    let run = || {
        tapcheck()
            .args(["validate", "--date", "2024-05-01", "--mode", "both", "--config"])
            .arg(&config)
            .assert()
            .success();
    };

    run();
    let first = fs::read(summary_csv(&dir, "water_test")).unwrap();
    let first_failures =
        fs::read(dir.path().join("validation_results/water_test_errors.csv")).unwrap();

    run();
    assert_eq!(fs::read(summary_csv(&dir, "water_test")).unwrap(), first);
    assert_eq!(
        fs::read(dir.path().join("validation_results/water_test_errors.csv")).unwrap(),
        first_failures
    );
}

#[test]
fn test_validate_permissive_clean_source() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        &[("water_beta", "beta", fixture_path("water_clean.json"))],
    );

    // "images" is not a schema column; permissive mode only warns about it.
    tapcheck()
        .args(["validate", "--permissive", "--date", "2024-05-01", "--config"])
        .arg(&config)
        .arg("--fail-on-errors")
        .assert()
        .success()
        .stdout(predicate::str::contains("No errors found"));

    let summary = fs::read_to_string(summary_csv(&dir, "water_beta")).unwrap();
    assert!(summary.ends_with("water_beta,0,1,0\n"));
    assert!(
        !dir.path()
            .join("validation_results/water_beta_errors.csv")
            .exists()
    );
}

#[test]
fn test_validate_unavailable_source_does_not_stop_run() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        &[
            ("water_prod", "prod", dir.path().join("missing.json")),
            ("water_test", "test", fixture_path("water_test.json")),
        ],
    );

    tapcheck()
        .args(["validate", "--date", "2024-05-01", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("water_prod unavailable"));

    let prod = fs::read_to_string(summary_csv(&dir, "water_prod")).unwrap();
    assert!(prod.ends_with("water_prod,0,0,0\n"));
    assert!(summary_csv(&dir, "water_test").exists());

    let text =
        fs::read_to_string(dir.path().join("validation_results/water_prod_2024-05-01.txt"))
            .unwrap();
    assert!(text.contains("Source unavailable"));
}

#[test]
fn test_validate_write_failure_does_not_stop_run() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        &[
            ("water_prod", "prod", fixture_path("water_test.json")),
            ("water_test", "test", fixture_path("water_test.json")),
        ],
    );

    // A directory where the prod text report should go makes that write fail.
    fs::create_dir_all(dir.path().join("validation_results/water_prod_2024-05-01.txt")).unwrap();

    tapcheck()
        .args(["validate", "--date", "2024-05-01", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stdout(predicate::str::contains("water_test"))
        .stderr(predicate::str::contains("Failed to write reports for water_prod"));

    assert!(summary_csv(&dir, "water_test").exists());
    assert!(
        dir.path()
            .join("validation_results/water_test_2024-05-01.txt")
            .exists()
    );
}

#[test]
fn test_validate_selected_source_only() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        &[
            ("water_prod", "prod", fixture_path("water_test.json")),
            ("water_test", "test", fixture_path("water_test.json")),
        ],
    );

    tapcheck()
        .args(["validate", "--date", "2024-05-01", "--source", "water_test", "--config"])
        .arg(&config)
        .assert()
        .success();

    assert!(summary_csv(&dir, "water_test").exists());
    assert!(!summary_csv(&dir, "water_prod").exists());
}

#[test]
fn test_validate_unknown_source() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &[("water_test", "test", fixture_path("water_test.json"))]);

    tapcheck()
        .args(["validate", "--source", "water_dev", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_validate_json_output() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &[("water_test", "test", fixture_path("water_test.json"))]);

    let output = tapcheck()
        .args(["validate", "--format", "json", "--date", "2024-05-01", "--config"])
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["passed"], false);
    assert_eq!(json["summary"][0]["Database"], "water_test");
    assert_eq!(json["summary"][0]["Errors"], 1);
    assert_eq!(json["reports"][0]["rows_after_key_filter"], 3);
    assert_eq!(json["reports"][0]["environment"], "test");
}

#[test]
fn test_validate_default_config_processes_every_source() {
    let dir = TempDir::new().unwrap();

    // None of the default snapshots exist here, so every source is unavailable.
    tapcheck()
        .current_dir(dir.path())
        .args(["validate", "--date", "2024-05-01"])
        .assert()
        .success();

    for source in ["water_prod", "water_beta", "water_test"] {
        assert!(
            dir.path()
                .join(format!("2024-05-01_firebase_db_validation_{}.csv", source))
                .exists(),
            "missing summary for {}",
            source
        );
    }
}

#[test]
fn test_validate_invalid_config() {
    tapcheck()
        .arg("validate")
        .arg("--config")
        .arg(fixture_path("no_sources.yml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_validate_invalid_mode() {
    tapcheck()
        .args(["validate", "--mode", "lazy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown mode"));
}

// ============================================================================
// schema command tests
// ============================================================================

#[test]
fn test_schema_builtin() {
    tapcheck()
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("water_tap"))
        .stdout(predicate::str::contains("strict"))
        .stdout(predicate::str::contains("permanently_closed"))
        .stdout(predicate::str::contains("Fields:  22"));
}

#[test]
fn test_schema_json() {
    let output = tapcheck()
        .args(["schema", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["name"], "water_tap");
    assert_eq!(json["fields"].as_array().unwrap().len(), 22);
}

#[test]
fn test_schema_from_file() {
    tapcheck()
        .arg("schema")
        .arg("--schema")
        .arg(fixture_path("small_schema.yml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("small_tap"))
        .stdout(predicate::str::contains("permissive"));
}

#[test]
fn test_schema_duplicate_fields() {
    tapcheck()
        .arg("schema")
        .arg("--schema")
        .arg(fixture_path("duplicate_schema.yml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_schema_missing_file() {
    tapcheck()
        .args(["schema", "--schema", "nonexistent.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

// ============================================================================
// init command tests
// ============================================================================

#[test]
fn test_init_stdout() {
    tapcheck()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("firebase_db"))
        .stdout(predicate::str::contains("water_prod"));
}

#[test]
fn test_init_toml_file_round_trips_into_validate() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("tapcheck.toml");

    tapcheck()
        .arg("init")
        .arg("--output")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration written to"));

    let content = fs::read_to_string(&config).unwrap();
    assert!(content.contains("label = \"firebase_db\""));

    tapcheck()
        .current_dir(dir.path())
        .args(["validate", "--date", "2024-05-01", "--config"])
        .arg(&config)
        .assert()
        .success();
}

#[test]
fn test_init_unsupported_extension() {
    let dir = TempDir::new().unwrap();

    tapcheck()
        .arg("init")
        .arg("--output")
        .arg(dir.path().join("tapcheck.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

// ============================================================================
// general tests
// ============================================================================

#[test]
fn test_help() {
    tapcheck()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("schema"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn test_version() {
    tapcheck()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tapcheck"));
}
