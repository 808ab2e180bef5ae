//! Allocation strategies.
//!
//! [`allocate`] is the single dispatch point from an [`AllocationMethod`] to
//! one pure function per method. Every function returns a share per unit
//! and, for any amount and any non-empty unit list, the shares sum to the
//! amount. Degenerate bases cascade towards the equal split:
//!
//! | method          | fallback order                                           |
//! |-----------------|----------------------------------------------------------|
//! | area            | area → units                                             |
//! | units           | (none)                                                   |
//! | persons         | persons → equal split (`persons_default` per unit) → units |
//! | water           | metered water → configured fallback (persons or units)   |
//! | heat split      | consumption term: heat → area share; area term: area → 1/n |
//!
//! When every unit counts 0 people the persons split becomes an equal split.
//! It never divides by a substitute total, so the shares still add up to
//! the amount instead of exceeding it.
//!
//! Shares are unrounded `f64`; rounding belongs to presentation.

use std::{cell::OnceCell, collections::BTreeMap};

use uuid::Uuid;

use crate::{
    AllocationMethod, MeterKind, MeterSeries, PropertySettings, Unit, WaterFallback,
    metering::consumption_by_unit,
};

/// Share of an amount per unit.
pub type Shares = BTreeMap<Uuid, f64>;

/// Supporting data for the allocation of one property-year.
///
/// Consumption is resolved lazily from the meter series the first time a
/// method needs it and reused for every later entry.
#[derive(Debug)]
pub struct AllocationContext<'a> {
    year: i32,
    settings: &'a PropertySettings,
    persons: &'a BTreeMap<Uuid, u32>,
    meters: &'a [MeterSeries],
    water: OnceCell<BTreeMap<Uuid, f64>>,
    heat: OnceCell<BTreeMap<Uuid, f64>>,
}

impl<'a> AllocationContext<'a> {
    pub fn new(
        year: i32,
        settings: &'a PropertySettings,
        persons: &'a BTreeMap<Uuid, u32>,
        meters: &'a [MeterSeries],
    ) -> Self {
        Self {
            year,
            settings,
            persons,
            meters,
            water: OnceCell::new(),
            heat: OnceCell::new(),
        }
    }

    pub fn settings(&self) -> &PropertySettings {
        self.settings
    }

    /// Recorded occupancy, or the property's default when none is recorded.
    pub fn persons_of(&self, unit_id: &Uuid) -> u32 {
        self.persons
            .get(unit_id)
            .copied()
            .unwrap_or(self.settings.persons_default)
    }

    pub fn consumption(&self, kind: MeterKind) -> &BTreeMap<Uuid, f64> {
        let cell = match kind {
            MeterKind::Water => &self.water,
            MeterKind::Heat => &self.heat,
        };
        cell.get_or_init(|| consumption_by_unit(self.meters, self.year, kind))
    }
}

/// Spreads `amount` across `units` according to `method`.
pub fn allocate(
    method: AllocationMethod,
    amount: f64,
    units: &[Unit],
    context: &AllocationContext<'_>,
) -> Shares {
    match method {
        AllocationMethod::Area => by_area(amount, units),
        AllocationMethod::Units => by_units(amount, units),
        AllocationMethod::Persons => by_persons(amount, units, context),
        AllocationMethod::WaterM3 => by_water(amount, units, context),
        AllocationMethod::HeatSplit => by_heat_split(amount, units, context),
    }
}

/// Equal split. Empty when there are no units.
pub fn by_units(amount: f64, units: &[Unit]) -> Shares {
    if units.is_empty() {
        return Shares::new();
    }
    let per_unit = amount / units.len() as f64;
    units.iter().map(|unit| (unit.id, per_unit)).collect()
}

/// Proportional to living area; equal split when the total area is 0.
pub fn by_area(amount: f64, units: &[Unit]) -> Shares {
    weighted(amount, units, |unit| unit.area_sqm).unwrap_or_else(|| {
        tracing::debug!("total area is 0, allocating by units");
        by_units(amount, units)
    })
}

/// Proportional to occupants.
///
/// Units without a recorded count use `persons_default`. When every unit
/// counts 0 people, each unit is weighted with `persons_default` instead
/// (an equal split); when that default is 0 too, the split is by units.
pub fn by_persons(amount: f64, units: &[Unit], context: &AllocationContext<'_>) -> Shares {
    if let Some(shares) = weighted(amount, units, |unit| {
        f64::from(context.persons_of(&unit.id))
    }) {
        return shares;
    }

    let persons_default = f64::from(context.settings.persons_default);
    tracing::debug!("total persons is 0, weighting every unit with the default occupancy");
    weighted(amount, units, |_| persons_default).unwrap_or_else(|| by_units(amount, units))
}

/// Proportional to metered water; configured fallback without usable data.
pub fn by_water(amount: f64, units: &[Unit], context: &AllocationContext<'_>) -> Shares {
    let water = context.consumption(MeterKind::Water);
    if let Some(shares) = weighted(amount, units, |unit| {
        water.get(&unit.id).copied().unwrap_or(0.0)
    }) {
        return shares;
    }

    let fallback = context.settings.water_allocation_fallback;
    tracing::debug!(
        "no water consumption recorded, allocating by {}",
        fallback.as_str()
    );
    match fallback {
        WaterFallback::Persons => by_persons(amount, units, context),
        WaterFallback::Units => by_units(amount, units),
    }
}

/// Heating split between a consumption term and an area term.
///
/// `share(u) = amount × (r × consumption_share(u) + (1 − r) × area_share(u))`
/// with `r = heat_ratio_consumption / 100`. Each term resolves its own
/// degenerate basis: the area share becomes `1/n` without any area, the
/// consumption share becomes the area share without any heat consumption.
pub fn by_heat_split(amount: f64, units: &[Unit], context: &AllocationContext<'_>) -> Shares {
    if units.is_empty() {
        return Shares::new();
    }

    let (consumption_weight, base_weight) = context.settings.heat_weights();
    let area_shares = fractions(units, |unit| unit.area_sqm).unwrap_or_else(|| {
        tracing::debug!("total area is 0, heating base share falls back to 1/n");
        equal_fractions(units)
    });

    let heat = context.consumption(MeterKind::Heat);
    let consumption_shares = fractions(units, |unit| heat.get(&unit.id).copied().unwrap_or(0.0))
        .unwrap_or_else(|| {
            tracing::debug!("no heat consumption recorded, consumption share follows area");
            area_shares.clone()
        });

    units
        .iter()
        .map(|unit| {
            let area = area_shares.get(&unit.id).copied().unwrap_or(0.0);
            let consumption = consumption_shares.get(&unit.id).copied().unwrap_or(0.0);
            (
                unit.id,
                amount * (consumption_weight * consumption + base_weight * area),
            )
        })
        .collect()
}

/// `amount × fraction(u)` for every unit, `None` on a degenerate basis.
fn weighted(amount: f64, units: &[Unit], weight: impl Fn(&Unit) -> f64) -> Option<Shares> {
    let fractions = fractions(units, weight)?;
    Some(
        fractions
            .into_iter()
            .map(|(unit_id, fraction)| (unit_id, amount * fraction))
            .collect(),
    )
}

/// `weight(u) / Σweight`, `None` when the total is not positive.
fn fractions(units: &[Unit], weight: impl Fn(&Unit) -> f64) -> Option<BTreeMap<Uuid, f64>> {
    let total: f64 = units.iter().map(&weight).sum();
    if units.is_empty() || total <= 0.0 || !total.is_finite() {
        return None;
    }
    Some(
        units
            .iter()
            .map(|unit| (unit.id, weight(unit) / total))
            .collect(),
    )
}

fn equal_fractions(units: &[Unit]) -> BTreeMap<Uuid, f64> {
    let fraction = 1.0 / units.len() as f64;
    units.iter().map(|unit| (unit.id, fraction)).collect()
}
