//! Cost ledger entries.
//!
//! A [`CostEntry`] is one invoice booked against a property. It is either
//! shared (allocated across all units by its category's method) or pinned
//! to a single unit, in which case that unit carries the whole amount.
//!
//! Amounts are gross and stored as integer cents; `vat_rate` is a percent
//! (e.g. `19.0`) and may be 0.

use chrono::{Datelike, NaiveDate};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostEntry {
    pub id: Uuid,
    pub property_id: Uuid,
    /// Set when the entry is pre-assigned to one unit.
    pub unit_id: Option<Uuid>,
    pub date: NaiveDate,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub category_code: String,
    pub amount_gross: MoneyCents,
    pub vat_rate: f64,
    pub supplier: Option<String>,
    pub invoice_no: Option<String>,
    pub description: Option<String>,
}

impl CostEntry {
    pub fn new(
        property_id: Uuid,
        date: NaiveDate,
        category_code: impl Into<String>,
        amount_gross: MoneyCents,
        vat_rate: f64,
    ) -> ResultEngine<Self> {
        if amount_gross.is_negative() {
            return Err(EngineError::InvalidAmount(
                "amount_gross must be >= 0".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&vat_rate) {
            return Err(EngineError::InvalidAmount(format!(
                "vat_rate must be within 0..=100, got {vat_rate}"
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            property_id,
            unit_id: None,
            date,
            period_start: None,
            period_end: None,
            category_code: category_code.into(),
            amount_gross,
            vat_rate,
            supplier: None,
            invoice_no: None,
            description: None,
        })
    }

    /// Whether the entry is attributed to `year`.
    ///
    /// Only the booking `date` counts; `period_start`/`period_end` are
    /// informational.
    pub fn is_in_year(&self, year: i32) -> bool {
        self.date.year() == year
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cost_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub property_id: Uuid,
    pub unit_id: Option<Uuid>,
    pub date: Date,
    pub period_start: Option<Date>,
    pub period_end: Option<Date>,
    pub category_code: String,
    pub amount_minor: i64,
    #[sea_orm(column_type = "Double")]
    pub vat_rate: f64,
    pub supplier: Option<String>,
    pub invoice_no: Option<String>,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::properties::Entity",
        from = "Column::PropertyId",
        to = "super::properties::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Property,
}

impl Related<super::properties::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for CostEntry {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            property_id: model.property_id,
            unit_id: model.unit_id,
            date: model.date,
            period_start: model.period_start,
            period_end: model.period_end,
            category_code: model.category_code,
            amount_gross: MoneyCents::new(model.amount_minor),
            vat_rate: model.vat_rate,
            supplier: model.supplier,
            invoice_no: model.invoice_no,
            description: model.description,
        }
    }
}

impl From<&CostEntry> for ActiveModel {
    fn from(entry: &CostEntry) -> Self {
        Self {
            id: ActiveValue::Set(entry.id),
            property_id: ActiveValue::Set(entry.property_id),
            unit_id: ActiveValue::Set(entry.unit_id),
            date: ActiveValue::Set(entry.date),
            period_start: ActiveValue::Set(entry.period_start),
            period_end: ActiveValue::Set(entry.period_end),
            category_code: ActiveValue::Set(entry.category_code.clone()),
            amount_minor: ActiveValue::Set(entry.amount_gross.cents()),
            vat_rate: ActiveValue::Set(entry.vat_rate),
            supplier: ActiveValue::Set(entry.supplier.clone()),
            invoice_no: ActiveValue::Set(entry.invoice_no.clone()),
            description: ActiveValue::Set(entry.description.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rejects_negative_amount_and_bad_vat() {
        let property = Uuid::new_v4();
        assert!(CostEntry::new(property, date(2024, 1, 1), "MUELL", MoneyCents::new(-1), 0.0)
            .is_err());
        assert!(CostEntry::new(property, date(2024, 1, 1), "MUELL", MoneyCents::new(1), 120.0)
            .is_err());
    }

    #[test]
    fn year_attribution_uses_booking_date_only() {
        let mut entry = CostEntry::new(
            Uuid::new_v4(),
            date(2023, 12, 15),
            "HEIZ_BRENN",
            MoneyCents::new(100_000),
            19.0,
        )
        .unwrap();
        entry.period_start = Some(date(2023, 7, 1));
        entry.period_end = Some(date(2024, 6, 30));

        assert!(entry.is_in_year(2023));
        assert!(!entry.is_in_year(2024));
    }
}
