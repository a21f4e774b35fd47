//! Common test utilities and fixtures for upkeep-cli integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Output;

use tempfile::TempDir;
use upkeep_cli::{Command, OutputFormat, commands};
use upkeep_kpi::KpiOptions;
use upkeep_store::{RecordStore, SqliteStore, StoreConfig};

pub const SAMPLE_ASSETS: &str = "\
activo_id,nombre,criticidad,fecha_alta,ubicacion,responsable
1,Bomba centrífuga P-101,alta,2021-03-15,Planta A,J. Pérez
2,Compresor C-201,media,2020-07-01,Planta B,
3,Cinta transportadora T-301,baja,2022-01-10,,
";

pub const SAMPLE_FAILURES: &str = "\
falla_id,activo_id,fecha,tiempo_fuera_servicio_h,estado,causa_raiz,costo_reparacion,descripcion
1,1,2024-01-01T00:00:00,3,resuelta,rodamiento,120.5,Vibración excesiva
2,1,2024-01-01T10:00:00,2,resuelta,rodamiento,,
3,1,2024-01-01T20:00:00,4,cerrada,sello,310,\"Fuga, lado succión\"
4,2,2024-02-03 08:30,1.25,reportada,,,
5,2,2024-02-05 08:30,0.75,reportada,,,
";

pub const SAMPLE_WORK_ORDERS: &str = "\
ot_id,activo_id,tipo,fecha_inicio,fecha_fin,duracion_h,estado,fecha_programada,costo_real,descripcion
10,1,preventivo,2024-01-05T08:00:00,2024-01-05T11:00:00,3,completada,2024-01-05,200,Cambio de rodamientos
11,2,correctivo,2024-02-03T09:00:00,,,en_proceso,,,
12,3,preventivo,,,,pendiente,2024-03-01,,
";

/// A scratch directory holding the sample tables and a database path.
pub struct TestHarness {
    pub dir: TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        let harness = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        let data = harness.data_dir();
        std::fs::create_dir_all(&data).unwrap();
        std::fs::write(data.join("activos.csv"), SAMPLE_ASSETS).unwrap();
        std::fs::write(data.join("fallas.csv"), SAMPLE_FAILURES).unwrap();
        std::fs::write(data.join("ordenes_trabajo.csv"), SAMPLE_WORK_ORDERS).unwrap();
        harness
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Directory holding the sample CSV tables.
    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn db_path(&self) -> PathBuf {
        self.dir.path().join("upkeep.db")
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    pub async fn store(&self) -> SqliteStore {
        SqliteStore::open(&StoreConfig::sqlite(self.db_path().to_string_lossy()))
            .await
            .unwrap()
    }

    /// Run a store-backed command with default KPI options.
    pub async fn run(
        &self,
        store: &dyn RecordStore,
        command: Command,
        format: OutputFormat,
    ) -> upkeep_cli::Result<String> {
        commands::run(command, store, &KpiOptions::default(), format).await
    }

    /// Run the `upkeep` binary with this harness's config and database.
    pub fn upkeep(&self, args: &[&str]) -> Output {
        std::process::Command::new(env!("CARGO_BIN_EXE_upkeep"))
            .args(args)
            .env("UPKEEP_CONFIG", self.config_path())
            .env("UPKEEP_STORE_BACKEND", "sqlite")
            .env("UPKEEP_STORE_PATH", self.db_path())
            .env_remove("RUST_LOG")
            .output()
            .unwrap()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
