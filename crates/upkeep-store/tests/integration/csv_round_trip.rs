//! CSV ingestion and export against files on disk.

use chrono::NaiveDate;
use upkeep_core::util::time::parse_timestamp;
use upkeep_core::{
    Asset, AssetId, Criticality, Failure, FailureId, FailureStatus, WorkOrder, WorkOrderId,
    WorkOrderKind, WorkOrderStatus,
};
use upkeep_store::tabular::read_failures;
use upkeep_store::{Dataset, load_dir, write_dir};

use crate::common::{SAMPLE_FAILURES, TestHarness};

#[test]
fn test_load_sample_tables() {
    let harness = TestHarness::with_sample_tables();
    let data = load_dir(harness.path()).unwrap();

    assert_eq!(data.assets.len(), 3);
    assert_eq!(data.failures.len(), 4);
    assert_eq!(data.work_orders.len(), 3);

    assert_eq!(data.assets[0].owner.as_deref(), Some("J. Pérez"));
    assert_eq!(data.failures[2].status, FailureStatus::Closed);
    assert_eq!(
        data.failures[2].description.as_deref(),
        Some("Fuga, lado succión")
    );
    assert_eq!(data.failures[3].asset_id, AssetId::new(2));
    assert_eq!(data.work_orders[1].status, WorkOrderStatus::InProgress);
}

#[test]
fn test_round_trip_preserves_rows_and_values() {
    let harness = TestHarness::with_sample_tables();
    let original = load_dir(harness.path()).unwrap();

    write_dir(harness.subdir("export"), &original).unwrap();
    let reloaded = load_dir(harness.subdir("export")).unwrap();
    assert_eq!(reloaded, original);

    // Exporting the reloaded data again is byte-for-byte stable.
    write_dir(harness.subdir("export2"), &reloaded).unwrap();
    for file in ["activos.csv", "fallas.csv", "ordenes_trabajo.csv"] {
        assert_eq!(
            harness.read(format!("export/{file}")),
            harness.read(format!("export2/{file}"))
        );
    }
}

#[test]
fn test_round_trip_of_minimal_failure_columns() {
    let harness = TestHarness::new();
    harness.write(
        "activos.csv",
        "activo_id,nombre,criticidad,fecha_alta\n1,Pump,alta,2020-01-01\n",
    );
    harness.write(
        "fallas.csv",
        "activo_id,fecha,tiempo_fuera_servicio_h\n1,2024-01-01,0.1\n1,2024-01-02,1e-3\n1,2024-01-03,7\n",
    );
    let original = load_dir(harness.path()).unwrap();
    write_dir(harness.subdir("out"), &original).unwrap();

    let exported = harness.read("out/fallas.csv");
    assert_eq!(exported.lines().count(), 1 + 3);
    let reread = read_failures("fallas.csv", exported.as_bytes()).unwrap();
    assert_eq!(reread, original.failures);
    assert_eq!(reread[1].downtime_hours, 0.001);
    assert_eq!(reread[2].id, FailureId::new(3));
}

#[test]
fn test_round_trip_keeps_padded_free_text() {
    let harness = TestHarness::new();
    let asset = Asset::new(
        AssetId::new(1),
        "  Pump P-1 ",
        Criticality::High,
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
    )
    .with_location(" Line 2")
    .with_owner("J. Pérez  ");
    let failure = Failure::new(
        FailureId::new(1),
        AssetId::new(1),
        parse_timestamp("2024-01-01T06:00:00").unwrap(),
        2.0,
    )
    .with_root_cause(" seal ")
    .with_description("  leak ");
    let order = WorkOrder::new(WorkOrderId::new(1), AssetId::new(1), WorkOrderKind::Corrective)
        .with_description(" replace seal\t");
    let original = Dataset {
        assets: vec![asset],
        failures: vec![failure],
        work_orders: vec![order],
    };

    write_dir(harness.subdir("out"), &original).unwrap();
    let reloaded = load_dir(harness.subdir("out")).unwrap();
    assert_eq!(reloaded, original);
    assert_eq!(reloaded.failures[0].description.as_deref(), Some("  leak "));
}

#[test]
fn test_dangling_reference_fails_load() {
    let harness = TestHarness::new();
    harness.write(
        "activos.csv",
        "activo_id,nombre,criticidad,fecha_alta\n1,Pump,alta,2020-01-01\n",
    );
    harness.write("fallas.csv", SAMPLE_FAILURES);
    let err = load_dir(harness.path()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Referential integrity error: failure 4 references unknown asset 2"
    );
}

#[test]
fn test_bad_row_names_file_and_line() {
    let harness = TestHarness::with_sample_tables();
    harness.write(
        "ordenes_trabajo.csv",
        "ot_id,activo_id,tipo,fecha_inicio,fecha_fin,duracion_h,estado\n\
         1,1,preventivo,,,,pendiente\n\
         2,1,inspeccion,,,,pendiente\n",
    );
    let err = load_dir(harness.path()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.starts_with("ordenes_trabajo.csv:3:"), "{msg}");
}
