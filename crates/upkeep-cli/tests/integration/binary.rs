//! Runs the `upkeep` binary end to end.

use crate::common::{TestHarness, stderr, stdout};

#[test]
fn test_import_then_json_kpi() {
    let harness = TestHarness::new();
    let data = harness.data_dir();

    let out = harness.upkeep(&["import", data.to_str().unwrap()]);
    assert!(out.status.success(), "import failed: {}", stderr(&out));
    assert!(stdout(&out).starts_with("TABLE"));
    assert!(harness.db_path().exists());

    let out = harness.upkeep(&["kpi", "--format", "json"]);
    assert!(out.status.success(), "kpi failed: {}", stderr(&out));
    let report: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(report["fleet"]["policy"], "pooled");
    assert_eq!(report["assets"]["1"]["failures"], 3);
}

#[test]
fn test_failure_add_persists_between_runs() {
    let harness = TestHarness::new();
    let data = harness.data_dir();
    assert!(harness.upkeep(&["import", data.to_str().unwrap()]).status.success());

    let out = harness.upkeep(&[
        "failure",
        "add",
        "--asset",
        "3",
        "--at",
        "2024-03-01 06:00",
        "--downtime",
        "1.5",
        "--cause",
        "motor",
    ]);
    assert!(out.status.success(), "failure add failed: {}", stderr(&out));
    assert_eq!(stdout(&out), "Recorded failure 6 on asset 3\n");

    let out = harness.upkeep(&["failure", "list", "--asset", "3"]);
    assert!(out.status.success());
    let listing = stdout(&out);
    assert!(listing.contains("motor"));
    assert_eq!(listing.lines().count(), 2);
}

#[test]
fn test_unknown_asset_exits_with_error() {
    let harness = TestHarness::new();
    let data = harness.data_dir();
    assert!(harness.upkeep(&["import", data.to_str().unwrap()]).status.success());

    let out = harness.upkeep(&["kpi", "--asset", "99"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("asset not found: 99"));
    assert!(stdout(&out).is_empty());
}

#[test]
fn test_invalid_arguments_are_rejected() {
    let harness = TestHarness::new();

    let out = harness.upkeep(&["kpi", "--policy", "median"]);
    assert!(!out.status.success());

    let out = harness.upkeep(&[
        "failure", "add", "--asset", "1", "--at", "2024-01-01", "--downtime", "-2",
    ]);
    assert!(!out.status.success());
    assert!(!harness.db_path().exists());
}

#[test]
fn test_config_init_and_get() {
    let harness = TestHarness::new();
    let config = harness.config_path();
    let config = config.to_str().unwrap();

    let out = harness.upkeep(&["config", "init", "--file", config]);
    assert!(out.status.success(), "init failed: {}", stderr(&out));
    assert!(harness.config_path().exists());

    let out = harness.upkeep(&["config", "set", "kpi.fleet_policy", "mean-of-assets"]);
    assert!(out.status.success(), "set failed: {}", stderr(&out));

    let out = harness.upkeep(&["config", "get", "kpi.fleet_policy"]);
    assert_eq!(stdout(&out).trim(), "mean-of-assets");

    // The environment wins over the file.
    let out = harness.upkeep(&["config", "get", "store.path"]);
    assert_eq!(stdout(&out).trim(), harness.db_path().to_str().unwrap());

    let out = harness.upkeep(&["config", "init", "--file", config]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("already exists"));
}

#[test]
fn test_config_policy_applies_to_kpi() {
    let harness = TestHarness::new();
    let data = harness.data_dir();
    std::fs::write(
        harness.config_path(),
        "[kpi]\nfleet_policy = \"mean-of-assets\"\n",
    )
    .unwrap();
    assert!(harness.upkeep(&["import", data.to_str().unwrap()]).status.success());

    let out = harness.upkeep(&["--format", "json", "kpi"]);
    let report: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(report["fleet"]["policy"], "mean-of-assets");

    let out = harness.upkeep(&["--format", "json", "kpi", "--policy", "pooled"]);
    let report: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(report["fleet"]["policy"], "pooled");
}
