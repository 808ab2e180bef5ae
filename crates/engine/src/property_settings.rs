//! Per-property allocation parameters.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

pub const DEFAULT_HEAT_RATIO_CONSUMPTION: u8 = 70;
pub const DEFAULT_PERSONS: u32 = 2;

/// Method used for water costs when no usable meter data exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WaterFallback {
    #[default]
    Persons,
    Units,
}

impl WaterFallback {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Persons => "PERSONS",
            Self::Units => "UNITS",
        }
    }
}

impl TryFrom<&str> for WaterFallback {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PERSONS" => Ok(Self::Persons),
            "UNITS" => Ok(Self::Units),
            other => Err(EngineError::InvalidSettings(format!(
                "invalid water allocation fallback: {other}"
            ))),
        }
    }
}

/// Allocation parameters of a property.
///
/// A property without a stored row uses [`PropertySettings::default`]
/// (70% consumption share, 2 persons per unit, water falls back to persons).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySettings {
    /// Consumption-weighted share of heating costs, in percent (0..=100).
    pub heat_ratio_consumption: u8,
    /// Occupancy assumed for a unit without a person count for the year.
    pub persons_default: u32,
    pub water_allocation_fallback: WaterFallback,
}

impl Default for PropertySettings {
    fn default() -> Self {
        Self {
            heat_ratio_consumption: DEFAULT_HEAT_RATIO_CONSUMPTION,
            persons_default: DEFAULT_PERSONS,
            water_allocation_fallback: WaterFallback::Persons,
        }
    }
}

impl PropertySettings {
    pub fn new(
        heat_ratio_consumption: u8,
        persons_default: u32,
        water_allocation_fallback: WaterFallback,
    ) -> ResultEngine<Self> {
        if heat_ratio_consumption > 100 {
            return Err(EngineError::InvalidSettings(format!(
                "heat_ratio_consumption must be within 0..=100, got {heat_ratio_consumption}"
            )));
        }
        Ok(Self {
            heat_ratio_consumption,
            persons_default,
            water_allocation_fallback,
        })
    }

    /// Consumption and base (area) weights of the heating split.
    ///
    /// The two weights always sum to 1.0.
    pub fn heat_weights(&self) -> (f64, f64) {
        let consumption = f64::from(self.heat_ratio_consumption.min(100)) / 100.0;
        (consumption, 1.0 - consumption)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "property_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub property_id: Uuid,
    pub heat_ratio_consumption: i32,
    pub persons_default: i32,
    pub water_allocation_fallback: String,
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

impl TryFrom<Model> for PropertySettings {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let heat_ratio_consumption = u8::try_from(model.heat_ratio_consumption).map_err(|_| {
            EngineError::InvalidSettings(format!(
                "stored heat_ratio_consumption out of range: {}",
                model.heat_ratio_consumption
            ))
        })?;
        let persons_default = u32::try_from(model.persons_default).map_err(|_| {
            EngineError::InvalidSettings(format!(
                "stored persons_default out of range: {}",
                model.persons_default
            ))
        })?;
        PropertySettings::new(
            heat_ratio_consumption,
            persons_default,
            WaterFallback::try_from(model.water_allocation_fallback.as_str())?,
        )
    }
}

impl ActiveModel {
    /// Row for `settings`; fails when `persons_default` does not fit the
    /// column.
    pub(crate) fn from_settings(
        property_id: Uuid,
        settings: &PropertySettings,
    ) -> Result<Self, EngineError> {
        let persons_default = i32::try_from(settings.persons_default).map_err(|_| {
            EngineError::InvalidSettings(format!(
                "persons_default too large: {}",
                settings.persons_default
            ))
        })?;
        Ok(Self {
            property_id: ActiveValue::Set(property_id),
            heat_ratio_consumption: ActiveValue::Set(i32::from(settings.heat_ratio_consumption)),
            persons_default: ActiveValue::Set(persons_default),
            water_allocation_fallback: ActiveValue::Set(
                settings.water_allocation_fallback.as_str().to_string(),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fresh_property() {
        let settings = PropertySettings::default();
        assert_eq!(settings.heat_ratio_consumption, 70);
        assert_eq!(settings.persons_default, 2);
        assert_eq!(settings.water_allocation_fallback, WaterFallback::Persons);
    }

    #[test]
    fn heat_weights_sum_to_one() {
        for ratio in [0u8, 30, 50, 70, 100] {
            let settings = PropertySettings::new(ratio, 2, WaterFallback::Units).unwrap();
            let (consumption, base) = settings.heat_weights();
            assert_eq!(consumption + base, 1.0);
        }
    }

    #[test]
    fn rejects_ratio_above_hundred() {
        assert!(matches!(
            PropertySettings::new(101, 2, WaterFallback::Persons),
            Err(EngineError::InvalidSettings(_))
        ));
    }

    #[test]
    fn stored_row_converts() {
        let settings = PropertySettings::try_from(Model {
            property_id: Uuid::new_v4(),
            heat_ratio_consumption: 50,
            persons_default: 3,
            water_allocation_fallback: "units".to_string(),
        })
        .unwrap();
        assert_eq!(settings.heat_ratio_consumption, 50);
        assert_eq!(settings.persons_default, 3);
        assert_eq!(settings.water_allocation_fallback, WaterFallback::Units);
    }

    #[test]
    fn row_rejects_persons_default_beyond_column() {
        let mut settings = PropertySettings::default();
        settings.persons_default = u32::MAX;
        assert!(matches!(
            ActiveModel::from_settings(Uuid::new_v4(), &settings),
            Err(EngineError::InvalidSettings(_))
        ));

        let row = ActiveModel::from_settings(Uuid::new_v4(), &PropertySettings::default()).unwrap();
        assert_eq!(row.persons_default, ActiveValue::Set(2));
    }
}
