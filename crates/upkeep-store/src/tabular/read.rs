//! Reading the CSV tables into validated records.
//!
//! Every field is read as text first and converted with the core parsers, so
//! a bad value is reported with its file, line and column instead of as a
//! generic deserialisation failure. Only headers are trimmed by the reader:
//! the parsers trim identifiers, numbers and dates themselves, and free text
//! is kept exactly as written.

use std::io::Read;
use std::str::FromStr;

use csv::StringRecord;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use upkeep_core::util::numbers::{parse_hours, parse_optional_amount};
use upkeep_core::util::time::{parse_date, parse_optional_timestamp, parse_timestamp_field};
use upkeep_core::{
    Asset, AssetId, Error as CoreError, Failure, FailureId, FailureStatus, Result as CoreResult,
    WorkOrder, WorkOrderId,
};

use crate::error::{Error, Result};

const ASSET_COLUMNS: &[&[&str]] = &[&["activo_id"], &["nombre"], &["criticidad"], &["fecha_alta"]];

const FAILURE_COLUMNS: &[&[&str]] = &[
    &["activo_id"],
    &["fecha", "fecha_reporte"],
    &["tiempo_fuera_servicio_h"],
];

const WORK_ORDER_COLUMNS: &[&[&str]] = &[
    &["ot_id"],
    &["activo_id"],
    &["tipo"],
    &["fecha_inicio"],
    &["fecha_fin"],
    &["duracion_h"],
    &["estado"],
];

/// One data row with its position in the file.
struct Located<T> {
    /// Physical line (header is line 1)
    line: u64,
    /// 1-based data row number
    number: u64,
    row: T,
}

fn csv_error(file: &str, err: csv::Error) -> CoreError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    CoreError::validation(err.to_string()).at_line(file, line)
}

fn check_columns(file: &str, headers: &StringRecord, required: &[&[&str]]) -> CoreResult<()> {
    for names in required {
        if !names.iter().any(|name| headers.iter().any(|h| h == *name)) {
            return Err(
                CoreError::validation_field(names[0], "required column is missing").at_line(file, 1),
            );
        }
    }
    Ok(())
}

fn read_table<T, R>(file: &str, reader: R, required: &[&[&str]]) -> Result<Vec<Located<T>>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers = rdr.headers().map_err(|e| csv_error(file, e))?.clone();
    check_columns(file, &headers, required)?;

    let mut rows = Vec::new();
    for (index, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| csv_error(file, e))?;
        let number = index as u64 + 1;
        let line = record.position().map(|p| p.line()).unwrap_or(number + 1);
        let row = record
            .deserialize(Some(&headers))
            .map_err(|e| CoreError::validation(e.to_string()).at_line(file, line))?;
        rows.push(Located { line, number, row });
    }
    Ok(rows)
}

fn parse_id<T: FromStr>(field: &str, input: &str) -> CoreResult<T> {
    input.trim().parse().map_err(|_| {
        CoreError::validation_field(field, format!("'{}' is not a valid identifier", input.trim()))
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ============================================================================
// Row types
// ============================================================================

#[derive(Debug, Deserialize)]
struct AssetRow {
    activo_id: String,
    nombre: String,
    criticidad: String,
    fecha_alta: String,
    #[serde(default)]
    ubicacion: Option<String>,
    #[serde(default)]
    responsable: Option<String>,
}

impl AssetRow {
    fn into_asset(self) -> CoreResult<Asset> {
        let asset = Asset {
            id: parse_id::<AssetId>("activo_id", &self.activo_id)?,
            name: self.nombre,
            criticality: self.criticidad.parse()?,
            acquired_on: parse_date("fecha_alta", &self.fecha_alta)?,
            location: non_empty(self.ubicacion),
            owner: non_empty(self.responsable),
        };
        asset.validate()?;
        Ok(asset)
    }
}

#[derive(Debug, Deserialize)]
struct FailureRow {
    #[serde(default)]
    falla_id: Option<String>,
    activo_id: String,
    #[serde(alias = "fecha_reporte")]
    fecha: String,
    tiempo_fuera_servicio_h: String,
    #[serde(default)]
    estado: Option<String>,
    #[serde(default)]
    causa_raiz: Option<String>,
    #[serde(default)]
    costo_reparacion: Option<String>,
    #[serde(default)]
    descripcion: Option<String>,
}

impl FailureRow {
    fn into_failure(self, number: u64) -> CoreResult<Failure> {
        let id = match non_empty(self.falla_id) {
            Some(id) => parse_id::<FailureId>("falla_id", &id)?,
            None => FailureId::new(number),
        };
        let status = match non_empty(self.estado) {
            Some(s) => s.parse()?,
            None => FailureStatus::default(),
        };
        let failure = Failure {
            id,
            asset_id: parse_id::<AssetId>("activo_id", &self.activo_id)?,
            occurred_at: parse_timestamp_field("fecha", &self.fecha)?,
            downtime_hours: parse_hours("tiempo_fuera_servicio_h", &self.tiempo_fuera_servicio_h)?,
            status,
            root_cause: non_empty(self.causa_raiz),
            repair_cost: parse_optional_amount(
                "costo_reparacion",
                self.costo_reparacion.as_deref().unwrap_or(""),
            )?,
            description: non_empty(self.descripcion),
        };
        failure.validate()?;
        Ok(failure)
    }
}

#[derive(Debug, Deserialize)]
struct WorkOrderRow {
    ot_id: String,
    activo_id: String,
    tipo: String,
    #[serde(default)]
    fecha_inicio: Option<String>,
    #[serde(default)]
    fecha_fin: Option<String>,
    #[serde(default)]
    duracion_h: Option<String>,
    estado: String,
    #[serde(default)]
    fecha_programada: Option<String>,
    #[serde(default)]
    costo_real: Option<String>,
    #[serde(default)]
    descripcion: Option<String>,
}

impl WorkOrderRow {
    fn into_work_order(self) -> CoreResult<WorkOrder> {
        let text = |v: &Option<String>| v.as_deref().unwrap_or("").to_string();
        let order = WorkOrder {
            id: parse_id::<WorkOrderId>("ot_id", &self.ot_id)?,
            asset_id: parse_id::<AssetId>("activo_id", &self.activo_id)?,
            kind: self.tipo.parse()?,
            status: self.estado.parse()?,
            scheduled_for: parse_optional_timestamp(
                "fecha_programada",
                &text(&self.fecha_programada),
            )?,
            started_at: parse_optional_timestamp("fecha_inicio", &text(&self.fecha_inicio))?,
            ended_at: parse_optional_timestamp("fecha_fin", &text(&self.fecha_fin))?,
            duration_hours: parse_optional_amount("duracion_h", &text(&self.duracion_h))?,
            cost: parse_optional_amount("costo_real", &text(&self.costo_real))?,
            description: non_empty(self.descripcion),
        };
        order.validate()?;
        Ok(order)
    }
}

// ============================================================================
// Public readers
// ============================================================================

/// Reads an assets table (`activo_id, nombre, criticidad, fecha_alta[, ubicacion, responsable]`).
///
/// `file` names the source in error messages.
pub fn read_assets<R: Read>(file: &str, reader: R) -> Result<Vec<Asset>> {
    read_table::<AssetRow, R>(file, reader, ASSET_COLUMNS)?
        .into_iter()
        .map(|r| r.row.into_asset().map_err(|e| Error::from(e.at_line(file, r.line))))
        .collect()
}

/// Reads a failures table.
///
/// Rows without `falla_id` get their 1-based row number as identifier.
/// `fecha_reporte` is accepted in place of `fecha`.
pub fn read_failures<R: Read>(file: &str, reader: R) -> Result<Vec<Failure>> {
    read_table::<FailureRow, R>(file, reader, FAILURE_COLUMNS)?
        .into_iter()
        .map(|r| {
            r.row
                .into_failure(r.number)
                .map_err(|e| Error::from(e.at_line(file, r.line)))
        })
        .collect()
}

/// Reads a work-orders table.
pub fn read_work_orders<R: Read>(file: &str, reader: R) -> Result<Vec<WorkOrder>> {
    read_table::<WorkOrderRow, R>(file, reader, WORK_ORDER_COLUMNS)?
        .into_iter()
        .map(|r| r.row.into_work_order().map_err(|e| Error::from(e.at_line(file, r.line))))
        .collect()
}
