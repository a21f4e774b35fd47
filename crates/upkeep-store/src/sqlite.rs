//! SQLite record store.
//!
//! Tables mirror the CSV layout: `activos`, `fallas`, `ordenes_trabajo`.
//! Timestamps are stored as canonical `YYYY-MM-DDTHH:MM:SS` text, which sorts
//! chronologically. Enum columns hold the canonical lowercase labels.

use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use upkeep_core::util::time::{format_date, format_timestamp, parse_date, parse_timestamp_field};
use upkeep_core::{
    Asset, AssetId, EntityKind, Error as CoreError, Failure, FailureId, WorkOrder, WorkOrderId,
};

use crate::backend::RecordStore;
use crate::error::{Error, Result};
use crate::types::{FailureFilter, StoreConfig};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS activos (
        activo_id   INTEGER PRIMARY KEY,
        nombre      TEXT NOT NULL,
        criticidad  TEXT NOT NULL,
        fecha_alta  TEXT NOT NULL,
        ubicacion   TEXT,
        responsable TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS fallas (
        falla_id                INTEGER PRIMARY KEY,
        activo_id               INTEGER NOT NULL REFERENCES activos (activo_id),
        fecha                   TEXT NOT NULL,
        tiempo_fuera_servicio_h REAL NOT NULL CHECK (tiempo_fuera_servicio_h >= 0),
        estado                  TEXT NOT NULL,
        causa_raiz              TEXT,
        costo_reparacion        REAL,
        descripcion             TEXT
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_fallas_activo_fecha ON fallas (activo_id, fecha)",
    r#"
    CREATE TABLE IF NOT EXISTS ordenes_trabajo (
        ot_id            INTEGER PRIMARY KEY,
        activo_id        INTEGER NOT NULL REFERENCES activos (activo_id),
        tipo             TEXT NOT NULL,
        estado           TEXT NOT NULL,
        fecha_programada TEXT,
        fecha_inicio     TEXT,
        fecha_fin        TEXT,
        duracion_h       REAL,
        costo_real       REAL,
        descripcion      TEXT
    )
    "#,
];

const ASSET_EXISTS: &str = "SELECT activo_id FROM activos WHERE activo_id = ?";
const FAILURE_EXISTS: &str = "SELECT falla_id FROM fallas WHERE falla_id = ?";
const WORK_ORDER_EXISTS: &str = "SELECT ot_id FROM ordenes_trabajo WHERE ot_id = ?";

const FAILURE_COLUMNS: &str = "falla_id, activo_id, fecha, tiempo_fuera_servicio_h, estado, \
                               causa_raiz, costo_reparacion, descripcion";

const WORK_ORDER_COLUMNS: &str = "ot_id, activo_id, tipo, estado, fecha_programada, fecha_inicio, \
                                  fecha_fin, duracion_h, costo_real, descripcion";

/// Record store backed by a SQLite database file.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `config.path` and ensures
    /// the schema exists.
    pub async fn open(config: &StoreConfig) -> Result<Self> {
        let path = Path::new(&config.path);
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CoreError::io_with_path(e, parent))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.create_schema().await?;
        tracing::info!(path = %path.display(), "Opened SQLite record store");
        Ok(store)
    }

    async fn create_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Whether `sql` (a `SELECT` on one bound id) returns a row.
    async fn exists<'e, E>(executor: E, sql: &'static str, id: i64) -> Result<bool>
    where
        E: sqlx::SqliteExecutor<'e>,
    {
        let found: Option<i64> = sqlx::query_scalar(sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(found.is_some())
    }
}

// ============================================================================
// Row mapping
// ============================================================================

fn to_sql_id(kind: EntityKind, id: u64) -> Result<i64> {
    i64::try_from(id).map_err(|_| {
        CoreError::validation_field(kind.as_str(), format!("identifier {id} is out of range"))
            .into()
    })
}

fn from_sql_id(column: &str, id: i64) -> Result<u64> {
    u64::try_from(id).map_err(|_| {
        CoreError::validation_field(column, format!("negative identifier {id}")).into()
    })
}

/// Maps constraint violations raised by an insert to the matching core error.
fn map_write_error(err: sqlx::Error, kind: EntityKind, id: u64, asset_id: u64) -> Error {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return CoreError::duplicate(kind, id).into();
        }
        if db.is_foreign_key_violation() {
            return CoreError::dangling(kind, id, asset_id).into();
        }
    }
    err.into()
}

#[derive(sqlx::FromRow)]
struct AssetRow {
    activo_id: i64,
    nombre: String,
    criticidad: String,
    fecha_alta: String,
    ubicacion: Option<String>,
    responsable: Option<String>,
}

impl TryFrom<AssetRow> for Asset {
    type Error = Error;

    fn try_from(row: AssetRow) -> Result<Self> {
        Ok(Asset {
            id: AssetId::new(from_sql_id("activo_id", row.activo_id)?),
            name: row.nombre,
            criticality: row.criticidad.parse()?,
            acquired_on: parse_date("fecha_alta", &row.fecha_alta)?,
            location: row.ubicacion,
            owner: row.responsable,
        })
    }
}

#[derive(sqlx::FromRow)]
struct FailureRow {
    falla_id: i64,
    activo_id: i64,
    fecha: String,
    tiempo_fuera_servicio_h: f64,
    estado: String,
    causa_raiz: Option<String>,
    costo_reparacion: Option<f64>,
    descripcion: Option<String>,
}

impl TryFrom<FailureRow> for Failure {
    type Error = Error;

    fn try_from(row: FailureRow) -> Result<Self> {
        Ok(Failure {
            id: FailureId::new(from_sql_id("falla_id", row.falla_id)?),
            asset_id: AssetId::new(from_sql_id("activo_id", row.activo_id)?),
            occurred_at: parse_timestamp_field("fecha", &row.fecha)?,
            downtime_hours: row.tiempo_fuera_servicio_h,
            status: row.estado.parse()?,
            root_cause: row.causa_raiz,
            repair_cost: row.costo_reparacion,
            description: row.descripcion,
        })
    }
}

#[derive(sqlx::FromRow)]
struct WorkOrderRow {
    ot_id: i64,
    activo_id: i64,
    tipo: String,
    estado: String,
    fecha_programada: Option<String>,
    fecha_inicio: Option<String>,
    fecha_fin: Option<String>,
    duracion_h: Option<f64>,
    costo_real: Option<f64>,
    descripcion: Option<String>,
}

fn optional_timestamp(field: &str, value: Option<String>) -> Result<Option<chrono::NaiveDateTime>> {
    value
        .map(|v| parse_timestamp_field(field, &v))
        .transpose()
        .map_err(Error::from)
}

impl TryFrom<WorkOrderRow> for WorkOrder {
    type Error = Error;

    fn try_from(row: WorkOrderRow) -> Result<Self> {
        Ok(WorkOrder {
            id: WorkOrderId::new(from_sql_id("ot_id", row.ot_id)?),
            asset_id: AssetId::new(from_sql_id("activo_id", row.activo_id)?),
            kind: row.tipo.parse()?,
            status: row.estado.parse()?,
            scheduled_for: optional_timestamp("fecha_programada", row.fecha_programada)?,
            started_at: optional_timestamp("fecha_inicio", row.fecha_inicio)?,
            ended_at: optional_timestamp("fecha_fin", row.fecha_fin)?,
            duration_hours: row.duracion_h,
            cost: row.costo_real,
            description: row.descripcion,
        })
    }
}

// ============================================================================
// RecordStore implementation
// ============================================================================

#[async_trait]
impl RecordStore for SqliteStore {
    async fn insert_asset(&self, asset: &Asset) -> Result<()> {
        asset.validate()?;
        let id = to_sql_id(EntityKind::Asset, asset.id.get())?;

        let mut tx = self.pool.begin().await?;
        if Self::exists(&mut *tx, ASSET_EXISTS, id).await? {
            return Err(CoreError::duplicate(EntityKind::Asset, asset.id.get()).into());
        }
        sqlx::query(
            r#"
            INSERT INTO activos (activo_id, nombre, criticidad, fecha_alta, ubicacion, responsable)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(&asset.name)
        .bind(asset.criticality.as_str())
        .bind(format_date(&asset.acquired_on))
        .bind(&asset.location)
        .bind(&asset.owner)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, EntityKind::Asset, asset.id.get(), asset.id.get()))?;
        tx.commit().await?;
        Ok(())
    }

    async fn update_asset(&self, asset: &Asset) -> Result<()> {
        asset.validate()?;
        let result = sqlx::query(
            r#"
            UPDATE activos
            SET nombre = ?, criticidad = ?, fecha_alta = ?, ubicacion = ?, responsable = ?
            WHERE activo_id = ?
            "#,
        )
        .bind(&asset.name)
        .bind(asset.criticality.as_str())
        .bind(format_date(&asset.acquired_on))
        .bind(&asset.location)
        .bind(&asset.owner)
        .bind(to_sql_id(EntityKind::Asset, asset.id.get())?)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(CoreError::not_found(EntityKind::Asset, asset.id.get()).into());
        }
        Ok(())
    }

    async fn get_asset(&self, id: AssetId) -> Result<Option<Asset>> {
        let row: Option<AssetRow> = sqlx::query_as(
            r#"
            SELECT activo_id, nombre, criticidad, fecha_alta, ubicacion, responsable
            FROM activos
            WHERE activo_id = ?
            "#,
        )
        .bind(to_sql_id(EntityKind::Asset, id.get())?)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Asset::try_from).transpose()
    }

    async fn list_assets(&self) -> Result<Vec<Asset>> {
        let rows: Vec<AssetRow> = sqlx::query_as(
            r#"
            SELECT activo_id, nombre, criticidad, fecha_alta, ubicacion, responsable
            FROM activos
            ORDER BY activo_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Asset::try_from).collect()
    }

    async fn insert_failure(&self, failure: &Failure) -> Result<()> {
        failure.validate()?;
        let id = to_sql_id(EntityKind::Failure, failure.id.get())?;
        let asset_id = to_sql_id(EntityKind::Asset, failure.asset_id.get())?;

        let mut tx = self.pool.begin().await?;
        if !Self::exists(&mut *tx, ASSET_EXISTS, asset_id).await? {
            return Err(
                CoreError::dangling(EntityKind::Failure, failure.id.get(), failure.asset_id.get())
                    .into(),
            );
        }
        if Self::exists(&mut *tx, FAILURE_EXISTS, id).await? {
            return Err(CoreError::duplicate(EntityKind::Failure, failure.id.get()).into());
        }
        sqlx::query(&format!(
            "INSERT INTO fallas ({FAILURE_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(id)
        .bind(asset_id)
        .bind(format_timestamp(&failure.occurred_at))
        .bind(failure.downtime_hours)
        .bind(failure.status.as_str())
        .bind(&failure.root_cause)
        .bind(failure.repair_cost)
        .bind(&failure.description)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            map_write_error(e, EntityKind::Failure, failure.id.get(), failure.asset_id.get())
        })?;
        tx.commit().await?;

        tracing::debug!(failure_id = %failure.id, asset_id = %failure.asset_id, "Inserted failure");
        Ok(())
    }

    async fn correct_failure(&self, failure: &Failure) -> Result<()> {
        failure.validate()?;
        let result = sqlx::query(
            r#"
            UPDATE fallas
            SET activo_id = ?, fecha = ?, tiempo_fuera_servicio_h = ?, estado = ?,
                causa_raiz = ?, costo_reparacion = ?, descripcion = ?
            WHERE falla_id = ?
            "#,
        )
        .bind(to_sql_id(EntityKind::Asset, failure.asset_id.get())?)
        .bind(format_timestamp(&failure.occurred_at))
        .bind(failure.downtime_hours)
        .bind(failure.status.as_str())
        .bind(&failure.root_cause)
        .bind(failure.repair_cost)
        .bind(&failure.description)
        .bind(to_sql_id(EntityKind::Failure, failure.id.get())?)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(e, EntityKind::Failure, failure.id.get(), failure.asset_id.get())
        })?;
        if result.rows_affected() == 0 {
            return Err(CoreError::not_found(EntityKind::Failure, failure.id.get()).into());
        }
        Ok(())
    }

    async fn delete_failure(&self, id: FailureId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM fallas WHERE falla_id = ?")
            .bind(to_sql_id(EntityKind::Failure, id.get())?)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_failure(&self, id: FailureId) -> Result<Option<Failure>> {
        let row: Option<FailureRow> = sqlx::query_as(&format!(
            "SELECT {FAILURE_COLUMNS} FROM fallas WHERE falla_id = ?"
        ))
        .bind(to_sql_id(EntityKind::Failure, id.get())?)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Failure::try_from).transpose()
    }

    async fn list_failures(&self, filter: &FailureFilter) -> Result<Vec<Failure>> {
        let asset_id = filter
            .asset_id
            .map(|id| to_sql_id(EntityKind::Asset, id.get()))
            .transpose()?;
        let rows: Vec<FailureRow> = sqlx::query_as(&format!(
            r#"
            SELECT {FAILURE_COLUMNS}
            FROM fallas
            WHERE (?1 IS NULL OR activo_id = ?1)
              AND (?2 IS NULL OR estado = ?2)
              AND (?3 IS NULL OR fecha >= ?3)
              AND (?4 IS NULL OR fecha <= ?4)
            ORDER BY fecha, falla_id
            "#
        ))
        .bind(asset_id)
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.from.as_ref().map(format_timestamp))
        .bind(filter.to.as_ref().map(format_timestamp))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Failure::try_from).collect()
    }

    async fn insert_work_order(&self, order: &WorkOrder) -> Result<()> {
        order.validate()?;
        let id = to_sql_id(EntityKind::WorkOrder, order.id.get())?;
        let asset_id = to_sql_id(EntityKind::Asset, order.asset_id.get())?;

        let mut tx = self.pool.begin().await?;
        if !Self::exists(&mut *tx, ASSET_EXISTS, asset_id).await? {
            return Err(CoreError::dangling(
                EntityKind::WorkOrder,
                order.id.get(),
                order.asset_id.get(),
            )
            .into());
        }
        if Self::exists(&mut *tx, WORK_ORDER_EXISTS, id).await? {
            return Err(CoreError::duplicate(EntityKind::WorkOrder, order.id.get()).into());
        }
        sqlx::query(&format!(
            "INSERT INTO ordenes_trabajo ({WORK_ORDER_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(id)
        .bind(asset_id)
        .bind(order.kind.as_str())
        .bind(order.status.as_str())
        .bind(order.scheduled_for.as_ref().map(format_timestamp))
        .bind(order.started_at.as_ref().map(format_timestamp))
        .bind(order.ended_at.as_ref().map(format_timestamp))
        .bind(order.duration_hours)
        .bind(order.cost)
        .bind(&order.description)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            map_write_error(e, EntityKind::WorkOrder, order.id.get(), order.asset_id.get())
        })?;
        tx.commit().await?;
        Ok(())
    }

    async fn update_work_order(&self, order: &WorkOrder) -> Result<()> {
        order.validate()?;
        let result = sqlx::query(
            r#"
            UPDATE ordenes_trabajo
            SET activo_id = ?, tipo = ?, estado = ?, fecha_programada = ?, fecha_inicio = ?,
                fecha_fin = ?, duracion_h = ?, costo_real = ?, descripcion = ?
            WHERE ot_id = ?
            "#,
        )
        .bind(to_sql_id(EntityKind::Asset, order.asset_id.get())?)
        .bind(order.kind.as_str())
        .bind(order.status.as_str())
        .bind(order.scheduled_for.as_ref().map(format_timestamp))
        .bind(order.started_at.as_ref().map(format_timestamp))
        .bind(order.ended_at.as_ref().map(format_timestamp))
        .bind(order.duration_hours)
        .bind(order.cost)
        .bind(&order.description)
        .bind(to_sql_id(EntityKind::WorkOrder, order.id.get())?)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(e, EntityKind::WorkOrder, order.id.get(), order.asset_id.get())
        })?;
        if result.rows_affected() == 0 {
            return Err(CoreError::not_found(EntityKind::WorkOrder, order.id.get()).into());
        }
        Ok(())
    }

    async fn get_work_order(&self, id: WorkOrderId) -> Result<Option<WorkOrder>> {
        let row: Option<WorkOrderRow> = sqlx::query_as(&format!(
            "SELECT {WORK_ORDER_COLUMNS} FROM ordenes_trabajo WHERE ot_id = ?"
        ))
        .bind(to_sql_id(EntityKind::WorkOrder, id.get())?)
        .fetch_optional(&self.pool)
        .await?;
        row.map(WorkOrder::try_from).transpose()
    }

    async fn list_work_orders(&self, asset_id: Option<AssetId>) -> Result<Vec<WorkOrder>> {
        let asset_id = asset_id
            .map(|id| to_sql_id(EntityKind::Asset, id.get()))
            .transpose()?;
        let rows: Vec<WorkOrderRow> = sqlx::query_as(&format!(
            r#"
            SELECT {WORK_ORDER_COLUMNS}
            FROM ordenes_trabajo
            WHERE (?1 IS NULL OR activo_id = ?1)
            ORDER BY ot_id
            "#
        ))
        .bind(asset_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(WorkOrder::try_from).collect()
    }

    fn name(&self) -> &str {
        "sqlite"
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        tracing::debug!("Closed SQLite record store");
        Ok(())
    }
}
