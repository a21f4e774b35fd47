//! Import, report and edit through the command layer against SQLite.

use upkeep_cli::cli::{AssetAction, FailureAction, KpiArgs, NewFailure, StatsArgs, WorkOrderAction};
use upkeep_cli::{Command, OutputFormat};
use upkeep_core::util::time::parse_timestamp;
use upkeep_core::{FailureStatus, WorkOrderId, WorkOrderStatus};
use upkeep_kpi::FleetPolicy;
use upkeep_store::RecordStore;

use crate::common::TestHarness;

fn approx(value: &serde_json::Value, expected: f64) -> bool {
    value.as_f64().is_some_and(|v| (v - expected).abs() < 1e-9)
}

async fn imported(harness: &TestHarness) -> upkeep_store::SqliteStore {
    let store = harness.store().await;
    harness
        .run(
            &store,
            Command::Import {
                dir: harness.data_dir(),
            },
            OutputFormat::Table,
        )
        .await
        .unwrap();
    store
}

async fn kpi_json(
    harness: &TestHarness,
    store: &dyn RecordStore,
    args: KpiArgs,
) -> serde_json::Value {
    let out = harness
        .run(store, Command::Kpi(args), OutputFormat::Json)
        .await
        .unwrap();
    serde_json::from_str(&out).unwrap()
}

#[tokio::test]
async fn test_import_then_kpi_report() {
    let harness = TestHarness::new();
    let store = imported(&harness).await;

    let report = kpi_json(&harness, &store, KpiArgs::default()).await;

    let pump = &report["assets"]["1"];
    assert_eq!(pump["failures"], 3);
    assert!(approx(&pump["mtbf_hours"], 10.0));
    assert!(approx(&pump["mttr_hours"], 3.0));
    assert!(approx(&pump["availability"], 10.0 / 13.0));

    let compressor = &report["assets"]["2"];
    assert!(approx(&compressor["mtbf_hours"], 48.0));
    assert!(approx(&compressor["mttr_hours"], 1.0));

    assert_eq!(report["insufficient"]["3"]["kind"], "insufficient_data");

    let fleet = &report["fleet"];
    assert_eq!(fleet["policy"], "pooled");
    assert!(approx(&fleet["mtbf_hours"], 68.0 / 3.0));
    assert!(approx(&fleet["mttr_hours"], 11.0 / 5.0));
}

#[tokio::test]
async fn test_mean_of_assets_policy() {
    let harness = TestHarness::new();
    let store = imported(&harness).await;

    let args = KpiArgs {
        policy: Some(FleetPolicy::MeanOfAssets),
        ..KpiArgs::default()
    };
    let fleet = kpi_json(&harness, &store, args).await["fleet"].clone();
    assert_eq!(fleet["policy"], "mean-of-assets");
    assert_eq!(fleet["assets"], 2);
    assert!(approx(&fleet["mtbf_hours"], 29.0));
    assert!(approx(&fleet["mttr_hours"], 2.0));
}

#[tokio::test]
async fn test_resolved_only_drops_open_failures() {
    let harness = TestHarness::new();
    let store = imported(&harness).await;

    let args = KpiArgs {
        resolved_only: true,
        ..KpiArgs::default()
    };
    let report = kpi_json(&harness, &store, args).await;
    assert_eq!(report["assets"]["1"]["failures"], 3);
    assert!(report["assets"]["2"].is_null());
    assert_eq!(report["insufficient"]["2"]["found"], 0);
}

#[tokio::test]
async fn test_asset_detail_includes_maintenance() {
    let harness = TestHarness::new();
    let store = imported(&harness).await;

    let args = KpiArgs {
        asset: Some(1),
        ..KpiArgs::default()
    };
    let detail = kpi_json(&harness, &store, args).await;
    assert_eq!(detail["asset"]["name"], "Bomba centrífuga P-101");
    assert_eq!(detail["kpis"]["work_orders"], 1);
    assert!(approx(&detail["kpis"]["preventive_compliance"], 100.0));
    assert!(approx(&detail["kpis"]["maintenance_cost"], 200.0));
}

#[tokio::test]
async fn test_new_failure_changes_kpis() {
    let harness = TestHarness::new();
    let store = imported(&harness).await;

    let new = NewFailure {
        id: None,
        asset: 3,
        at: parse_timestamp("2024-03-01T00:00:00").unwrap(),
        downtime: 6.0,
        status: FailureStatus::Reported,
        cause: None,
        cost: None,
        description: None,
    };
    let add = Command::Failure {
        action: FailureAction::Add(new.clone()),
    };
    let out = harness.run(&store, add, OutputFormat::Table).await.unwrap();
    assert_eq!(out, "Recorded failure 6 on asset 3\n");

    let second = NewFailure {
        at: parse_timestamp("2024-03-02T00:00:00").unwrap(),
        ..new
    };
    let add = Command::Failure {
        action: FailureAction::Add(second),
    };
    harness.run(&store, add, OutputFormat::Table).await.unwrap();

    let report = kpi_json(&harness, &store, KpiArgs::default()).await;
    let conveyor = &report["assets"]["3"];
    assert!(approx(&conveyor["mtbf_hours"], 24.0));
    assert!(approx(&conveyor["availability"], 0.8));
}

#[tokio::test]
async fn test_close_work_order_in_progress() {
    let harness = TestHarness::new();
    let store = imported(&harness).await;

    let at = Some(parse_timestamp("2024-02-03T13:30:00").unwrap());
    let out = harness
        .run(
            &store,
            Command::WorkOrder {
                action: WorkOrderAction::Close { id: 11, at },
            },
            OutputFormat::Table,
        )
        .await
        .unwrap();
    assert_eq!(out, "Closed work order 11 (4.5 h)\n");

    let order = store
        .get_work_order(WorkOrderId::new(11))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, WorkOrderStatus::Closed);
}

#[tokio::test]
async fn test_stats_and_overview() {
    let harness = TestHarness::new();
    let store = imported(&harness).await;

    let out = harness
        .run(&store, Command::Stats(StatsArgs::default()), OutputFormat::Json)
        .await
        .unwrap();
    let stats: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(stats["total_failures"], 5);
    assert!(approx(&stats["total_repair_cost"], 430.5));
    assert_eq!(stats["top_root_causes"][0]["cause"], "rodamiento");

    let out = harness
        .run(&store, Command::Overview, OutputFormat::Table)
        .await
        .unwrap();
    assert!(out.starts_with("Assets       3\nFailures     5\nWork orders  3\n"));
}

#[tokio::test]
async fn test_export_reimport_is_stable() {
    let harness = TestHarness::new();
    let store = imported(&harness).await;
    let first = harness.path().join("first");
    harness
        .run(
            &store,
            Command::Export { dir: first.clone() },
            OutputFormat::Table,
        )
        .await
        .unwrap();

    let fresh = upkeep_store::MemoryStore::new();
    harness
        .run(
            &fresh,
            Command::Import { dir: first.clone() },
            OutputFormat::Table,
        )
        .await
        .unwrap();
    let second = harness.path().join("second");
    harness
        .run(
            &fresh,
            Command::Export { dir: second.clone() },
            OutputFormat::Table,
        )
        .await
        .unwrap();

    for file in ["activos.csv", "fallas.csv", "ordenes_trabajo.csv"] {
        let a = std::fs::read_to_string(first.join(file)).unwrap();
        let b = std::fs::read_to_string(second.join(file)).unwrap();
        assert_eq!(a, b, "{file} changed across export and re-import");
    }

    let listed = harness
        .run(
            &fresh,
            Command::Asset {
                action: AssetAction::List,
            },
            OutputFormat::Json,
        )
        .await
        .unwrap();
    let assets: serde_json::Value = serde_json::from_str(&listed).unwrap();
    assert_eq!(assets.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_stats_last_day_includes_sub_second_failure() {
    let harness = TestHarness::new();
    let store = imported(&harness).await;

    let late = NewFailure {
        id: None,
        asset: 3,
        at: parse_timestamp("2024-03-31T23:59:59.500").unwrap(),
        downtime: 0.5,
        status: FailureStatus::Reported,
        cause: None,
        cost: None,
        description: None,
    };
    let add = Command::Failure {
        action: FailureAction::Add(late),
    };
    harness.run(&store, add, OutputFormat::Table).await.unwrap();

    let day = chrono::NaiveDate::from_ymd_opt(2024, 3, 31);
    let args = StatsArgs {
        from: day,
        to: day,
        asset: None,
    };
    let out = harness
        .run(&store, Command::Stats(args.clone()), OutputFormat::Json)
        .await
        .unwrap();
    let stats: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(stats["total_failures"], 1);

    let out = harness
        .run(&store, Command::Stats(args), OutputFormat::Table)
        .await
        .unwrap();
    assert!(out.contains("Period             2024-03-31 .. 2024-03-31"));
}
