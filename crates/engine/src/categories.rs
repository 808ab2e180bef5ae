//! Cost category registry.
//!
//! Every cost entry carries a category code. The registry maps that code to
//! a display name, the [`AllocationMethod`] used to spread the cost across
//! units and the heating flag used by the settlement to split "heating" from
//! "other operating costs".
//!
//! Lookups are fail-soft: an unknown code allocates as
//! [`AllocationMethod::Units`] and is treated as a non-heating cost.

use std::collections::BTreeMap;

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::EngineError;

/// How a shared cost is spread across the units of a property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllocationMethod {
    /// Proportional to living area.
    Area,
    /// Equal split per unit.
    Units,
    /// Proportional to the number of occupants.
    Persons,
    /// Proportional to metered water consumption.
    #[serde(rename = "WATER_M3")]
    WaterM3,
    /// Configurable consumption/area split for heating costs.
    #[serde(rename = "HEAT_SPLIT_70_30")]
    HeatSplit,
}

impl AllocationMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Area => "AREA",
            Self::Units => "UNITS",
            Self::Persons => "PERSONS",
            Self::WaterM3 => "WATER_M3",
            Self::HeatSplit => "HEAT_SPLIT_70_30",
        }
    }
}

impl TryFrom<&str> for AllocationMethod {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "AREA" => Ok(Self::Area),
            "UNITS" => Ok(Self::Units),
            "PERSONS" => Ok(Self::Persons),
            "WATER_M3" => Ok(Self::WaterM3),
            "HEAT_SPLIT_70_30" => Ok(Self::HeatSplit),
            other => Err(EngineError::InvalidSettings(format!(
                "unknown allocation method: {other}"
            ))),
        }
    }
}

impl core::fmt::Display for AllocationMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostCategory {
    pub code: String,
    pub name: String,
    pub name_en: Option<String>,
    pub allocation_method: AllocationMethod,
    pub is_heating: bool,
}

impl CostCategory {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        allocation_method: AllocationMethod,
        is_heating: bool,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            name_en: None,
            allocation_method,
            is_heating,
        }
    }

    #[must_use]
    pub fn name_en(mut self, name_en: impl Into<String>) -> Self {
        self.name_en = Some(name_en.into());
        self
    }
}

/// In-memory catalog keyed by category code.
///
/// Passed explicitly to the statement and settlement builders so they can
/// be exercised with synthetic catalogs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryCatalog {
    categories: BTreeMap<String, CostCategory>,
}

impl CategoryCatalog {
    pub fn new(categories: impl IntoIterator<Item = CostCategory>) -> Self {
        Self {
            categories: categories
                .into_iter()
                .map(|category| (category.code.clone(), category))
                .collect(),
        }
    }

    /// The catalog seeded into a fresh database.
    pub fn seed() -> Self {
        use AllocationMethod::*;

        Self::new([
            CostCategory::new("GRUNDSTEUER", "Grundsteuer", Area, false).name_en("Property tax"),
            CostCategory::new("GEB_VERS", "Gebäudeversicherung", Area, false)
                .name_en("Building insurance"),
            CostCategory::new("HAUSSTROM", "Allgemeinstrom", Units, false)
                .name_en("Common electricity"),
            CostCategory::new("REINIGUNG", "Hausreinigung", Units, false).name_en("Cleaning"),
            CostCategory::new("GARTEN", "Gartenpflege", Units, false).name_en("Garden"),
            CostCategory::new("MUELL", "Müll", Persons, false).name_en("Waste"),
            CostCategory::new("WASSER", "Wasser/Abwasser", WaterM3, false)
                .name_en("Water/Sewage"),
            CostCategory::new("HEIZ_BRENN", "Heizung Brennstoff", HeatSplit, true)
                .name_en("Heating fuel"),
            CostCategory::new("HEIZ_WART", "Heizung Wartung", HeatSplit, true)
                .name_en("Heating service"),
            CostCategory::new("SCHORN", "Schornsteinfeger", HeatSplit, true)
                .name_en("Chimney sweep"),
            CostCategory::new("HAUSMEISTER", "Hausmeister", Units, false).name_en("Janitor"),
            CostCategory::new("SONSTIGE_BK", "Sonstige BK", Units, false).name_en("Other costs"),
        ])
    }

    pub fn get(&self, code: &str) -> Option<&CostCategory> {
        self.categories.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.categories.contains_key(code)
    }

    /// Allocation method for `code`, [`AllocationMethod::Units`] when unknown.
    pub fn method_for(&self, code: &str) -> AllocationMethod {
        match self.get(code) {
            Some(category) => category.allocation_method,
            None => {
                tracing::debug!("unknown cost category '{code}', allocating by units");
                AllocationMethod::Units
            }
        }
    }

    /// Heating flag for `code`, `false` when unknown.
    pub fn is_heating(&self, code: &str) -> bool {
        self.get(code).is_some_and(|category| category.is_heating)
    }

    /// Categories ordered by code.
    pub fn iter(&self) -> impl Iterator<Item = &CostCategory> {
        self.categories.values()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cost_categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub code: String,
    pub name: String,
    pub name_en: Option<String>,
    pub allocation_method: String,
    pub is_heating: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for CostCategory {
    /// Stored methods outside the known set fall back to
    /// [`AllocationMethod::Units`].
    fn from(model: Model) -> Self {
        let allocation_method = AllocationMethod::try_from(model.allocation_method.as_str())
            .unwrap_or_else(|err| {
                tracing::warn!("category '{}': {err}, allocating by units", model.code);
                AllocationMethod::Units
            });
        Self {
            code: model.code,
            name: model.name,
            name_en: model.name_en,
            allocation_method,
            is_heating: model.is_heating,
        }
    }
}

impl From<&CostCategory> for ActiveModel {
    fn from(category: &CostCategory) -> Self {
        Self {
            code: ActiveValue::Set(category.code.clone()),
            name: ActiveValue::Set(category.name.clone()),
            name_en: ActiveValue::Set(category.name_en.clone()),
            allocation_method: ActiveValue::Set(category.allocation_method.as_str().to_string()),
            is_heating: ActiveValue::Set(category.is_heating),
        }
    }
}
