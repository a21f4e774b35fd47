//! Writing records back out in the same CSV layout they are read from.

use std::io::Write;

use upkeep_core::util::numbers::{format_amount, format_optional_amount};
use upkeep_core::util::time::{format_date, format_optional_timestamp, format_timestamp};
use upkeep_core::{Asset, Failure, WorkOrder};

use crate::error::Result;

/// Header written by [`write_assets`].
pub const ASSET_HEADER: [&str; 6] = [
    "activo_id",
    "nombre",
    "criticidad",
    "fecha_alta",
    "ubicacion",
    "responsable",
];

/// Header written by [`write_failures`].
pub const FAILURE_HEADER: [&str; 8] = [
    "falla_id",
    "activo_id",
    "fecha",
    "tiempo_fuera_servicio_h",
    "estado",
    "causa_raiz",
    "costo_reparacion",
    "descripcion",
];

/// Header written by [`write_work_orders`].
pub const WORK_ORDER_HEADER: [&str; 10] = [
    "ot_id",
    "activo_id",
    "tipo",
    "fecha_inicio",
    "fecha_fin",
    "duracion_h",
    "estado",
    "fecha_programada",
    "costo_real",
    "descripcion",
];

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

/// Writes assets with the full column set.
pub fn write_assets<W: Write>(writer: W, assets: &[Asset]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(ASSET_HEADER)?;
    for asset in assets {
        wtr.write_record([
            asset.id.to_string().as_str(),
            asset.name.as_str(),
            asset.criticality.as_str(),
            format_date(&asset.acquired_on).as_str(),
            text(&asset.location),
            text(&asset.owner),
        ])?;
    }
    wtr.flush().map_err(upkeep_core::Error::from)?;
    Ok(())
}

/// Writes failures with the full column set. Timestamps are canonical and
/// numbers use their shortest round-trip form.
pub fn write_failures<W: Write>(writer: W, failures: &[Failure]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(FAILURE_HEADER)?;
    for failure in failures {
        wtr.write_record([
            failure.id.to_string().as_str(),
            failure.asset_id.to_string().as_str(),
            format_timestamp(&failure.occurred_at).as_str(),
            format_amount(failure.downtime_hours).as_str(),
            failure.status.as_str(),
            text(&failure.root_cause),
            format_optional_amount(failure.repair_cost).as_str(),
            text(&failure.description),
        ])?;
    }
    wtr.flush().map_err(upkeep_core::Error::from)?;
    Ok(())
}

/// Writes work orders with the full column set.
pub fn write_work_orders<W: Write>(writer: W, orders: &[WorkOrder]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(WORK_ORDER_HEADER)?;
    for order in orders {
        wtr.write_record([
            order.id.to_string().as_str(),
            order.asset_id.to_string().as_str(),
            order.kind.as_str(),
            format_optional_timestamp(order.started_at.as_ref()).as_str(),
            format_optional_timestamp(order.ended_at.as_ref()).as_str(),
            format_optional_amount(order.duration_hours).as_str(),
            order.status.as_str(),
            format_optional_timestamp(order.scheduled_for.as_ref()).as_str(),
            format_optional_amount(order.cost).as_str(),
            text(&order.description),
        ])?;
    }
    wtr.flush().map_err(upkeep_core::Error::from)?;
    Ok(())
}
