//! Command structs for engine write operations.
//!
//! They group the parameters of a write so call sites stay readable.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::MoneyCents;

/// Book a cost entry against a property.
#[derive(Clone, Debug)]
pub struct NewCostEntry {
    pub property_id: Uuid,
    pub date: NaiveDate,
    pub category_code: String,
    pub amount_gross: MoneyCents,
    pub vat_rate: f64,
    pub unit_id: Option<Uuid>,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    pub supplier: Option<String>,
    pub invoice_no: Option<String>,
    pub description: Option<String>,
}

impl NewCostEntry {
    #[must_use]
    pub fn new(
        property_id: Uuid,
        date: NaiveDate,
        category_code: impl Into<String>,
        amount_gross: MoneyCents,
    ) -> Self {
        Self {
            property_id,
            date,
            category_code: category_code.into(),
            amount_gross,
            vat_rate: 0.0,
            unit_id: None,
            period_start: None,
            period_end: None,
            supplier: None,
            invoice_no: None,
            description: None,
        }
    }

    #[must_use]
    pub fn vat_rate(mut self, vat_rate: f64) -> Self {
        self.vat_rate = vat_rate;
        self
    }

    /// Pin the entry to a single unit.
    #[must_use]
    pub fn unit_id(mut self, unit_id: Uuid) -> Self {
        self.unit_id = Some(unit_id);
        self
    }

    #[must_use]
    pub fn period(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.period_start = Some(start);
        self.period_end = Some(end);
        self
    }

    #[must_use]
    pub fn supplier(mut self, supplier: impl Into<String>) -> Self {
        self.supplier = Some(supplier.into());
        self
    }

    #[must_use]
    pub fn invoice_no(mut self, invoice_no: impl Into<String>) -> Self {
        self.invoice_no = Some(invoice_no.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
