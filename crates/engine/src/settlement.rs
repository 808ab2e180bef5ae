//! Tenant settlement calculator.
//!
//! Narrows a [`Statement`] to the unit of one lease, decomposes every gross
//! share into net and VAT, buckets it as heating or other costs and
//! reconciles the result against the advance payments of the year.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CategoryCatalog, EngineError, Lease, MoneyCents, Payment, ResultEngine, Statement};

/// Payment categories counted as operating cost advances.
pub const ADVANCE_CATEGORIES: [&str; 2] = ["NK", "Heizung"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostBlock {
    Heating,
    Other,
}

/// Net, VAT and gross sums in major units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockTotals {
    pub net: f64,
    pub vat: f64,
    pub gross: f64,
}

impl BlockTotals {
    /// Splits a gross amount at `vat_rate` percent.
    ///
    /// `net = gross / (1 + rate/100)` for a positive rate, `net = gross`
    /// otherwise. `vat` is what remains of the gross amount.
    pub fn split(gross: f64, vat_rate: f64) -> Self {
        let net = if vat_rate > 0.0 {
            gross / (1.0 + vat_rate / 100.0)
        } else {
            gross
        };
        Self {
            net,
            vat: gross - net,
            gross,
        }
    }
}

impl std::ops::AddAssign for BlockTotals {
    fn add_assign(&mut self, rhs: Self) {
        self.net += rhs.net;
        self.vat += rhs.vat;
        self.gross += rhs.gross;
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotals {
    pub category_code: String,
    pub block: CostBlock,
    pub totals: BlockTotals,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub lease_id: Uuid,
    pub unit_id: Uuid,
    pub year: i32,
    pub heating: BlockTotals,
    pub other: BlockTotals,
    /// Per category breakdown, ordered by code.
    pub categories: Vec<CategoryTotals>,
    pub total_allocated: f64,
    pub advances: f64,
    /// Positive when the tenant owes money, negative when a refund is due.
    pub balance: f64,
}

impl Settlement {
    pub fn balance_cents(&self) -> MoneyCents {
        MoneyCents::from_major(self.balance)
    }
}

/// Sum of the advances paid on `lease_id` during `year`.
pub fn advances(payments: &[Payment], lease_id: Uuid, year: i32) -> f64 {
    payments
        .iter()
        .filter(|payment| {
            payment.lease_id == lease_id
                && payment.pay_date.year() == year
                && ADVANCE_CATEGORIES.contains(&payment.category.as_str())
        })
        .map(|payment| payment.amount.to_major())
        .sum()
}

/// Settles `lease` for `year`.
///
/// Fails with [`EngineError::NotApplicable`] when the lease is not active in
/// that year, which callers must not confuse with a zero balance.
pub fn settle(
    lease: &Lease,
    year: i32,
    statement: &Statement,
    catalog: &CategoryCatalog,
    payments: &[Payment],
) -> ResultEngine<Settlement> {
    if !lease.is_active_in(year) {
        return Err(EngineError::NotApplicable(format!(
            "lease {} is not active in {year}",
            lease.id
        )));
    }

    let mut heating = BlockTotals::default();
    let mut other = BlockTotals::default();
    let mut by_category: BTreeMap<&str, (CostBlock, BlockTotals)> = BTreeMap::new();

    for row in statement.rows_for_unit(&lease.unit_id) {
        let split = BlockTotals::split(row.gross, row.vat_rate);
        let block = if catalog.is_heating(&row.category_code) {
            heating += split;
            CostBlock::Heating
        } else {
            other += split;
            CostBlock::Other
        };
        by_category
            .entry(row.category_code.as_str())
            .or_insert((block, BlockTotals::default()))
            .1 += split;
    }

    let total_allocated = heating.gross + other.gross;
    let advances = advances(payments, lease.id, year);
    let balance = total_allocated - advances;

    tracing::debug!(
        lease_id = %lease.id,
        year,
        total_allocated,
        advances,
        balance,
        "lease settled"
    );

    Ok(Settlement {
        lease_id: lease.id,
        unit_id: lease.unit_id,
        year,
        heating,
        other,
        categories: by_category
            .into_iter()
            .map(|(code, (block, totals))| CategoryTotals {
                category_code: code.to_string(),
                block,
                totals,
            })
            .collect(),
        total_allocated,
        advances,
        balance,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::DetailRow;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn lease(unit_id: Uuid, end: Option<NaiveDate>) -> Lease {
        Lease {
            id: Uuid::new_v4(),
            unit_id,
            tenant_name: Some("Erika Mustermann".to_string()),
            start_date: date(2021, 4, 1),
            end_date: end,
        }
    }

    fn payment(lease: &Lease, when: NaiveDate, cents: i64, category: &str) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            lease_id: lease.id,
            pay_date: when,
            amount: MoneyCents::new(cents),
            category: category.to_string(),
            note: None,
        }
    }

    fn statement(unit_id: Uuid, rows: &[(&str, f64, f64)]) -> Statement {
        let detail_rows: Vec<DetailRow> = rows
            .iter()
            .map(|(code, gross, vat_rate)| DetailRow {
                entry_id: Uuid::new_v4(),
                unit_id,
                category_code: code.to_string(),
                gross: *gross,
                vat_rate: *vat_rate,
            })
            .collect();
        let total = detail_rows.iter().map(|row| row.gross).sum();
        Statement {
            property_id: Uuid::new_v4(),
            year: 2024,
            per_unit_totals: BTreeMap::from([(unit_id, total)]),
            detail_rows,
            units: Vec::new(),
        }
    }

    #[test]
    fn vat_split() {
        let split = BlockTotals::split(121.0, 21.0);
        assert!((split.net - 100.0).abs() < 1e-9);
        assert!((split.vat - 21.0).abs() < 1e-9);
        assert!((split.net + split.vat - split.gross).abs() < 1e-12);

        let untaxed = BlockTotals::split(55.5, 0.0);
        assert_eq!(untaxed.net, 55.5);
        assert_eq!(untaxed.vat, 0.0);
    }

    #[test]
    fn buckets_heating_and_other() {
        let unit_id = Uuid::new_v4();
        let statement = statement(
            unit_id,
            &[
                ("HEIZ_BRENN", 238.0, 19.0),
                ("SCHORN", 119.0, 19.0),
                ("GRUNDSTEUER", 100.0, 0.0),
                ("AUFZUG", 50.0, 0.0),
            ],
        );
        let lease = lease(unit_id, None);

        let settlement =
            settle(&lease, 2024, &statement, &CategoryCatalog::seed(), &[]).unwrap();

        assert!((settlement.heating.gross - 357.0).abs() < 1e-9);
        assert!((settlement.heating.net - 300.0).abs() < 1e-9);
        assert!((settlement.other.gross - 150.0).abs() < 1e-9);
        assert_eq!(settlement.other.vat, 0.0);
        assert!((settlement.total_allocated - 507.0).abs() < 1e-9);

        let codes: Vec<_> = settlement
            .categories
            .iter()
            .map(|category| (category.category_code.as_str(), category.block))
            .collect();
        assert_eq!(
            codes,
            vec![
                ("AUFZUG", CostBlock::Other),
                ("GRUNDSTEUER", CostBlock::Other),
                ("HEIZ_BRENN", CostBlock::Heating),
                ("SCHORN", CostBlock::Heating),
            ]
        );
    }

    #[test]
    fn ignores_rows_of_other_units() {
        let unit_id = Uuid::new_v4();
        let mut statement = statement(unit_id, &[("HAUSSTROM", 40.0, 19.0)]);
        statement.detail_rows.push(DetailRow {
            entry_id: Uuid::new_v4(),
            unit_id: Uuid::new_v4(),
            category_code: "HAUSSTROM".to_string(),
            gross: 40.0,
            vat_rate: 19.0,
        });

        let settlement = settle(
            &lease(unit_id, None),
            2024,
            &statement,
            &CategoryCatalog::seed(),
            &[],
        )
        .unwrap();
        assert_eq!(settlement.total_allocated, 40.0);
    }

    #[test]
    fn balance_against_advances() {
        let unit_id = Uuid::new_v4();
        let statement = statement(
            unit_id,
            &[("HEIZ_BRENN", 420.0, 19.0), ("MUELL", 200.0, 7.0)],
        );
        let lease = lease(unit_id, None);
        let mut payments = vec![
            payment(&lease, date(2024, 1, 3), 25_000, "NK"),
            payment(&lease, date(2024, 7, 3), 25_000, "Heizung"),
            payment(&lease, date(2024, 7, 3), 90_000, "Miete"),
            payment(&lease, date(2024, 8, 3), 10_000, "nk"),
            payment(&lease, date(2023, 12, 3), 10_000, "NK"),
        ];
        let catalog = CategoryCatalog::seed();

        let settlement = settle(&lease, 2024, &statement, &catalog, &payments).unwrap();
        assert_eq!(settlement.advances, 500.0);
        assert!((settlement.balance - 120.0).abs() < 1e-9);
        assert_eq!(settlement.balance_cents(), MoneyCents::new(12_000));

        payments.push(payment(&lease, date(2024, 9, 3), 20_000, "NK"));
        let settlement = settle(&lease, 2024, &statement, &catalog, &payments).unwrap();
        assert_eq!(settlement.advances, 700.0);
        assert!((settlement.balance + 80.0).abs() < 1e-9);
    }

    #[test]
    fn lease_ended_before_the_year_is_not_applicable() {
        let unit_id = Uuid::new_v4();
        let lease = lease(unit_id, Some(date(2023, 6, 30)));
        let statement = statement(unit_id, &[("HAUSSTROM", 40.0, 19.0)]);

        let result = settle(&lease, 2024, &statement, &CategoryCatalog::seed(), &[]);
        assert!(matches!(result, Err(EngineError::NotApplicable(_))));
    }

    #[test]
    fn advances_of_other_leases_are_ignored() {
        let unit_id = Uuid::new_v4();
        let lease = lease(unit_id, None);
        let other = self::lease(unit_id, None);
        let payments = vec![
            payment(&lease, date(2024, 2, 1), 1_000, "NK"),
            payment(&other, date(2024, 2, 1), 9_000, "NK"),
        ];
        assert_eq!(advances(&payments, lease.id, 2024), 10.0);
    }
}
