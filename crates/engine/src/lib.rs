//! Operating cost allocation engine.
//!
//! Apportions the shared operating costs of a property across its rental
//! units for a calendar year and settles each lease against the advances
//! paid by its tenant.
//!
//! The allocation core ([`allocation`], [`build_statement`], [`settle`]) is
//! pure and synchronous: it takes a [`PropertyLedger`], a
//! [`CategoryCatalog`] and [`PropertySettings`] as plain values. [`Engine`]
//! loads those values from the database inside one read transaction.

pub use allocation::{AllocationContext, Shares, allocate};
pub use categories::{AllocationMethod, CategoryCatalog, CostCategory};
pub use commands::NewCostEntry;
pub use cost_entries::CostEntry;
pub use error::EngineError;
pub use leases::Lease;
pub use ledger::PropertyLedger;
pub use metering::{MeterKind, MeterReading, MeterSeries, consumption_by_unit, consumption_for_year};
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder};
pub use payments::Payment;
pub use properties::Unit;
pub use property_settings::{
    DEFAULT_HEAT_RATIO_CONSUMPTION, DEFAULT_PERSONS, PropertySettings, WaterFallback,
};
pub use settlement::{
    ADVANCE_CATEGORIES, BlockTotals, CategoryTotals, CostBlock, Settlement, advances, settle,
};
pub use statement::{DetailRow, PreviewRow, Statement, build_statement};

pub mod allocation;
mod categories;
mod commands;
mod cost_entries;
mod error;
mod leases;
mod ledger;
mod meter_readings;
mod metering;
mod meters;
mod money;
mod ops;
mod payments;
mod properties;
mod property_settings;
mod settlement;
mod statement;
mod unit_persons;
mod units;

pub type ResultEngine<T> = Result<T, EngineError>;
