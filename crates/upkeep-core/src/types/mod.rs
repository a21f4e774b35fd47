//! Domain records for maintenance management.

mod asset;
mod failure;
mod ids;
mod proptests;
mod work_order;

pub use asset::{Asset, Criticality};
pub use failure::{Failure, FailureStatus};
pub use ids::{AssetId, EntityKind, FailureId, WorkOrderId};
pub use work_order::{WorkOrder, WorkOrderKind, WorkOrderStatus};

/// Normalise a free-text label for lenient enum parsing: lowercase, accents
/// stripped, separators collapsed to `_`.
pub(crate) fn normalize_label(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' => 'u',
            'ñ' => 'n',
            '-' | ' ' => '_',
            other => other,
        })
        .collect()
}
