//! Yearly statement builder.
//!
//! Walks every cost entry booked in the statement year, resolves its shares
//! and accumulates them per unit. The result keeps one [`DetailRow`] per
//! (entry, unit) pair so that settlements can later split net and VAT per
//! row.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    CategoryCatalog, MoneyCents, PropertyLedger, PropertySettings, Unit,
    allocation::{AllocationContext, allocate},
};

/// The part of one cost entry carried by one unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetailRow {
    pub entry_id: Uuid,
    pub unit_id: Uuid,
    pub category_code: String,
    /// Gross share in major units, unrounded.
    pub gross: f64,
    pub vat_rate: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PreviewRow {
    pub unit_id: Uuid,
    pub label: String,
    pub area_sqm: f64,
    pub total: MoneyCents,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub property_id: Uuid,
    pub year: i32,
    /// Every unit of the property, including the ones that carry nothing.
    pub per_unit_totals: BTreeMap<Uuid, f64>,
    pub detail_rows: Vec<DetailRow>,
    pub units: Vec<Unit>,
}

impl Statement {
    pub fn rows_for_unit<'a>(&'a self, unit_id: &'a Uuid) -> impl Iterator<Item = &'a DetailRow> {
        self.detail_rows
            .iter()
            .filter(move |row| &row.unit_id == unit_id)
    }

    pub fn total_for_unit(&self, unit_id: &Uuid) -> f64 {
        self.per_unit_totals.get(unit_id).copied().unwrap_or(0.0)
    }

    /// Sum over all units.
    pub fn total(&self) -> f64 {
        self.per_unit_totals.values().sum()
    }

    /// Property-wide overview, one row per unit in unit order, totals
    /// rounded to cents.
    pub fn preview(&self) -> Vec<PreviewRow> {
        self.units
            .iter()
            .map(|unit| PreviewRow {
                unit_id: unit.id,
                label: unit.label.clone(),
                area_sqm: unit.area_sqm,
                total: MoneyCents::from_major(self.total_for_unit(&unit.id)),
            })
            .collect()
    }
}

/// Builds the statement of `year` from a ledger snapshot.
///
/// Entries are attributed by their booking date alone. A pinned entry is
/// carried in full by its unit whatever its category's method is; every
/// other entry is allocated with the category's method (UNITS when the
/// code is unknown).
pub fn build_statement(
    ledger: &PropertyLedger,
    catalog: &CategoryCatalog,
    settings: &PropertySettings,
    year: i32,
) -> Statement {
    let context = AllocationContext::new(year, settings, &ledger.persons, &ledger.meters);

    let mut entries: Vec<_> = ledger
        .entries
        .iter()
        .filter(|entry| entry.property_id == ledger.property_id && entry.is_in_year(year))
        .collect();
    entries.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));

    let mut per_unit_totals: BTreeMap<Uuid, f64> =
        ledger.units.iter().map(|unit| (unit.id, 0.0)).collect();
    let mut detail_rows = Vec::new();

    for entry in entries {
        let amount = entry.amount_gross.to_major();
        let shares = match entry.unit_id {
            Some(unit_id) => BTreeMap::from([(unit_id, amount)]),
            None => allocate(
                catalog.method_for(&entry.category_code),
                amount,
                &ledger.units,
                &context,
            ),
        };

        for (unit_id, gross) in shares {
            *per_unit_totals.entry(unit_id).or_insert(0.0) += gross;
            detail_rows.push(DetailRow {
                entry_id: entry.id,
                unit_id,
                category_code: entry.category_code.clone(),
                gross,
                vat_rate: entry.vat_rate,
            });
        }
    }

    tracing::debug!(
        property_id = %ledger.property_id,
        year,
        rows = detail_rows.len(),
        "statement built"
    );

    Statement {
        property_id: ledger.property_id,
        year,
        per_unit_totals,
        detail_rows,
        units: ledger.units.clone(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::CostEntry;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ledger() -> PropertyLedger {
        let mut ledger = PropertyLedger::new(Uuid::new_v4());
        ledger.units = vec![
            Unit::new(ledger.property_id, "EG", 60.0),
            Unit::new(ledger.property_id, "OG", 40.0),
        ];
        ledger
    }

    fn entry(ledger: &PropertyLedger, when: NaiveDate, code: &str, cents: i64) -> CostEntry {
        CostEntry::new(ledger.property_id, when, code, MoneyCents::new(cents), 19.0).unwrap()
    }

    #[test]
    fn allocates_by_category_method() {
        let mut ledger = ledger();
        let (eg, og) = (ledger.units[0].id, ledger.units[1].id);
        ledger.entries = vec![
            entry(&ledger, date(2024, 3, 1), "GRUNDSTEUER", 100_000),
            entry(&ledger, date(2024, 4, 1), "HAUSSTROM", 20_000),
        ];

        let statement = build_statement(
            &ledger,
            &CategoryCatalog::seed(),
            &PropertySettings::default(),
            2024,
        );

        assert!((statement.total_for_unit(&eg) - 700.0).abs() < 1e-9);
        assert!((statement.total_for_unit(&og) - 500.0).abs() < 1e-9);
        assert_eq!(statement.detail_rows.len(), 4);
        assert!(statement.detail_rows.iter().all(|row| row.vat_rate == 19.0));
        assert!((statement.total() - 1200.0).abs() < 1e-9);
    }

    #[test]
    fn pinned_entry_ignores_category_method() {
        let mut ledger = ledger();
        let (eg, og) = (ledger.units[0].id, ledger.units[1].id);
        let mut pinned = entry(&ledger, date(2024, 6, 1), "GRUNDSTEUER", 5_000);
        pinned.unit_id = Some(og);
        ledger.entries = vec![pinned];

        let statement = build_statement(
            &ledger,
            &CategoryCatalog::seed(),
            &PropertySettings::default(),
            2024,
        );

        assert_eq!(statement.total_for_unit(&og), 50.0);
        assert_eq!(statement.total_for_unit(&eg), 0.0);
        assert_eq!(statement.detail_rows.len(), 1);
    }

    #[test]
    fn unknown_category_is_split_by_units() {
        let mut ledger = ledger();
        ledger.entries = vec![entry(&ledger, date(2024, 1, 15), "AUFZUG", 10_000)];

        let statement = build_statement(
            &ledger,
            &CategoryCatalog::seed(),
            &PropertySettings::default(),
            2024,
        );

        for total in statement.per_unit_totals.values() {
            assert_eq!(*total, 50.0);
        }
    }

    #[test]
    fn entries_outside_the_year_are_skipped_even_when_the_period_overlaps() {
        let mut ledger = ledger();
        let mut late_invoice = entry(&ledger, date(2025, 2, 1), "HAUSSTROM", 10_000);
        late_invoice.period_start = Some(date(2024, 1, 1));
        late_invoice.period_end = Some(date(2024, 12, 31));
        ledger.entries = vec![late_invoice];

        let statement = build_statement(
            &ledger,
            &CategoryCatalog::seed(),
            &PropertySettings::default(),
            2024,
        );

        assert!(statement.detail_rows.is_empty());
        assert_eq!(statement.per_unit_totals.len(), 2);
        assert_eq!(statement.total(), 0.0);
    }

    #[test]
    fn building_twice_gives_identical_statements() {
        let mut ledger = ledger();
        ledger.entries = vec![
            entry(&ledger, date(2024, 5, 1), "MUELL", 33_333),
            entry(&ledger, date(2024, 5, 1), "HEIZ_BRENN", 123_457),
            entry(&ledger, date(2024, 2, 1), "WASSER", 9_999),
        ];
        let catalog = CategoryCatalog::seed();
        let settings = PropertySettings::default();

        let first = build_statement(&ledger, &catalog, &settings, 2024);
        let second = build_statement(&ledger, &catalog, &settings, 2024);
        assert_eq!(first, second);
    }

    #[test]
    fn preview_rounds_at_presentation_only() {
        let mut ledger = ledger();
        ledger.units.push(Unit::new(ledger.property_id, "DG", 0.0));
        ledger.entries = vec![
            entry(&ledger, date(2024, 1, 1), "REINIGUNG", 100),
            entry(&ledger, date(2024, 2, 1), "REINIGUNG", 100),
        ];

        let statement = build_statement(
            &ledger,
            &CategoryCatalog::seed(),
            &PropertySettings::default(),
            2024,
        );
        let preview = statement.preview();

        // Two thirds of a euro, accumulated unrounded, is 0.67 and not 0.66.
        assert_eq!(preview.len(), 3);
        assert_eq!(preview[0].label, "EG");
        assert_eq!(preview[2].label, "DG");
        assert!(preview.iter().all(|row| row.total == MoneyCents::new(67)));
    }
}
