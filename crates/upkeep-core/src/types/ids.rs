//! Identifier types for maintenance records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three kinds of record held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// An [`Asset`](crate::Asset).
    Asset,
    /// A [`Failure`](crate::Failure).
    Failure,
    /// A [`WorkOrder`](crate::WorkOrder).
    WorkOrder,
}

impl EntityKind {
    /// Returns the kind as a lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Asset => "asset",
            EntityKind::Failure => "failure",
            EntityKind::WorkOrder => "work order",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Creates an identifier from its numeric value.
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Returns the numeric value.
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }
    };
}

record_id!(
    /// Identifier of an asset (`activo_id`).
    AssetId
);

record_id!(
    /// Identifier of a failure report (`falla_id`).
    FailureId
);

record_id!(
    /// Identifier of a work order (`ot_id`).
    WorkOrderId
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_id_parse_trims() {
        let id: AssetId = " 42 ".parse().unwrap();
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_id_rejects_negative() {
        assert!("-1".parse::<FailureId>().is_err());
        assert!("abc".parse::<WorkOrderId>().is_err());
    }

    #[test]
    fn test_id_serializes_transparently() {
        let json = serde_json::to_string(&AssetId::new(7)).unwrap();
        assert_eq!(json, "7");
        let back: AssetId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AssetId::new(7));
    }

    #[test]
    fn test_ids_order_numerically() {
        let mut ids = vec![AssetId::new(10), AssetId::new(2), AssetId::new(33)];
        ids.sort();
        assert_eq!(ids, vec![AssetId::new(2), AssetId::new(10), AssetId::new(33)]);
    }

    #[test]
    fn test_entity_kind_display() {
        assert_eq!(EntityKind::Asset.to_string(), "asset");
        assert_eq!(EntityKind::WorkOrder.to_string(), "work order");
    }
}
