use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Id of a newly created resource.
#[derive(Debug, Serialize, Deserialize)]
pub struct Created {
    pub id: Uuid,
}

pub mod unit {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UnitView {
        pub id: Uuid,
        pub label: String,
        pub area_sqm: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UnitsResponse {
        pub units: Vec<UnitView>,
    }
}

pub mod meter {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MeterNew {
        /// Type label, e.g. "Kaltwasser" or "Wärmemengenzähler".
        pub kind_label: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MeterReadingNew {
        pub read_date: NaiveDate,
        /// Cumulative counter value.
        pub value: f64,
    }
}

pub mod category {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum AllocationMethod {
        #[serde(rename = "AREA")]
        Area,
        #[serde(rename = "UNITS")]
        Units,
        #[serde(rename = "PERSONS")]
        Persons,
        #[serde(rename = "WATER_M3")]
        WaterM3,
        #[serde(rename = "HEAT_SPLIT_70_30")]
        HeatSplit,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub code: String,
        pub name: String,
        pub name_en: Option<String>,
        pub allocation_method: AllocationMethod,
        pub is_heating: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoriesResponse {
        pub categories: Vec<CategoryView>,
    }
}

pub mod settings {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum WaterFallback {
        Persons,
        Units,
    }

    /// Allocation parameters of a property, used for reads and writes.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PropertySettings {
        /// Percent of heating costs split by consumption (0..=100).
        pub heat_ratio_consumption: u8,
        pub persons_default: u32,
        pub water_allocation_fallback: WaterFallback,
    }
}

pub mod persons {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UnitPersons {
        pub unit_id: Uuid,
        pub persons: u32,
    }

    /// Replaces every person count of a property-year.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PersonsReplace {
        pub units: Vec<UnitPersons>,
    }
}

pub mod cost {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CostEntryNew {
        pub date: NaiveDate,
        pub category_code: String,
        /// Gross amount in cents.
        pub amount_minor: i64,
        /// VAT in percent, defaults to 0.
        pub vat_rate: Option<f64>,
        /// Pins the entry to one unit.
        pub unit_id: Option<Uuid>,
        pub period_start: Option<NaiveDate>,
        pub period_end: Option<NaiveDate>,
        pub supplier: Option<String>,
        pub invoice_no: Option<String>,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CostEntryView {
        pub id: Uuid,
        pub unit_id: Option<Uuid>,
        pub date: NaiveDate,
        pub period_start: Option<NaiveDate>,
        pub period_end: Option<NaiveDate>,
        pub category_code: String,
        pub amount_minor: i64,
        pub vat_rate: f64,
        pub supplier: Option<String>,
        pub invoice_no: Option<String>,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CostEntryList {
        pub year: Option<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CostEntriesResponse {
        pub entries: Vec<CostEntryView>,
    }
}

pub mod statement {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UnitTotal {
        pub unit_id: Uuid,
        pub label: String,
        pub area_sqm: f64,
        /// Allocated gross total, rounded to cents.
        pub total_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DetailRowView {
        pub entry_id: Uuid,
        pub unit_id: Uuid,
        pub category_code: String,
        pub gross_minor: i64,
        pub vat_rate: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatementView {
        pub property_id: Uuid,
        pub year: i32,
        pub units: Vec<UnitTotal>,
        pub rows: Vec<DetailRowView>,
    }
}

pub mod lease {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LeaseView {
        pub id: Uuid,
        pub unit_id: Uuid,
        pub tenant_name: Option<String>,
        pub start_date: NaiveDate,
        pub end_date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LeasesResponse {
        pub leases: Vec<LeaseView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LeaseNew {
        pub tenant_name: Option<String>,
        pub start_date: NaiveDate,
        pub end_date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentNew {
        pub pay_date: NaiveDate,
        pub amount_minor: i64,
        /// "NK" and "Heizung" count as advances.
        pub category: String,
    }
}

pub mod settlement {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CostBlock {
        Heating,
        Other,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BlockTotals {
        pub net_minor: i64,
        pub vat_minor: i64,
        pub gross_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryTotals {
        pub category_code: String,
        pub block: CostBlock,
        pub totals: BlockTotals,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettlementView {
        pub lease_id: Uuid,
        pub unit_id: Uuid,
        pub year: i32,
        pub heating: BlockTotals,
        pub other: BlockTotals,
        pub categories: Vec<CategoryTotals>,
        pub total_allocated_minor: i64,
        pub advances_minor: i64,
        /// Positive: the tenant owes. Negative: the tenant gets a refund.
        pub balance_minor: i64,
    }
}
