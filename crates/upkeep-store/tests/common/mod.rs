//! Common test utilities and fixtures for upkeep-store integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use upkeep_store::{MemoryStore, RecordStore, SqliteStore, StoreConfig};

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
";

pub const SAMPLE_WORK_ORDERS: &str = "\
ot_id,activo_id,tipo,fecha_inicio,fecha_fin,duracion_h,estado,fecha_programada,costo_real,descripcion
10,1,preventivo,2024-01-05T08:00:00,2024-01-05T11:00:00,3,completada,2024-01-05,200,Cambio de rodamientos
11,2,correctivo,2024-02-03T09:00:00,,,en_proceso,,,
12,3,preventivo,,,,pendiente,2024-03-01,,
";

/// A scratch directory with helpers for writing CSV tables and opening stores.
pub struct TestHarness {
    pub dir: TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// A harness whose directory already holds the three sample tables.
    pub fn with_sample_tables() -> Self {
        let harness = Self::new();
        harness.write("activos.csv", SAMPLE_ASSETS);
        harness.write("fallas.csv", SAMPLE_FAILURES);
        harness.write("ordenes_trabajo.csv", SAMPLE_WORK_ORDERS);
        harness
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn subdir(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write(&self, name: &str, content: &str) {
        std::fs::write(self.dir.path().join(name), content).unwrap();
    }

    pub fn read(&self, relative: impl AsRef<Path>) -> String {
        std::fs::read_to_string(self.dir.path().join(relative)).unwrap()
    }

    pub async fn sqlite_store(&self) -> SqliteStore {
        let path = self.dir.path().join("upkeep.db");
        SqliteStore::open(&StoreConfig::sqlite(path.to_string_lossy()))
            .await
            .unwrap()
    }

    /// One store of each backend, for running the same scenario twice.
    pub async fn backends(&self) -> Vec<Box<dyn RecordStore>> {
        vec![
            Box::new(MemoryStore::new()),
            Box::new(self.sqlite_store().await),
        ]
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
