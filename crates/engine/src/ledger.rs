//! Read-only snapshot of everything a property-year allocation needs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CostEntry, MeterSeries, Unit};

/// Inputs of one property, loaded in a single read transaction.
///
/// `persons` holds the recorded occupancy of the statement year only; units
/// without a record fall back to the property's default.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyLedger {
    pub property_id: Uuid,
    pub units: Vec<Unit>,
    pub entries: Vec<CostEntry>,
    pub persons: BTreeMap<Uuid, u32>,
    pub meters: Vec<MeterSeries>,
}

impl PropertyLedger {
    pub fn new(property_id: Uuid) -> Self {
        Self {
            property_id,
            ..Default::default()
        }
    }
}
