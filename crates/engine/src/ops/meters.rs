use chrono::NaiveDate;
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, meter_readings, meters, units};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Install a meter in a unit.
    ///
    /// `kind_label` is the free-text type ("Kaltwasser", "Wärmemengenzähler")
    /// the consumption resolver classifies meters by.
    pub async fn add_meter(&self, unit_id: Uuid, kind_label: &str) -> ResultEngine<Uuid> {
        let kind_label = normalize_required_name(kind_label, "meter type")?;
        let id = Uuid::new_v4();
        with_tx!(self, |db_tx| {
            units::Entity::find_by_id(unit_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("unit {unit_id}")))?;

            meters::ActiveModel {
                id: ActiveValue::Set(id),
                unit_id: ActiveValue::Set(unit_id),
                kind_label: ActiveValue::Set(kind_label.clone()),
                serial_number: ActiveValue::Set(None),
                location: ActiveValue::Set(None),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(%unit_id, meter_id = %id, kind = %kind_label, "meter added");
            Ok(id)
        })
    }

    /// Record a cumulative counter value.
    pub async fn add_meter_reading(
        &self,
        meter_id: Uuid,
        read_date: NaiveDate,
        value: f64,
    ) -> ResultEngine<Uuid> {
        if !value.is_finite() || value < 0.0 {
            return Err(EngineError::InvalidAmount(format!(
                "meter reading must be >= 0, got {value}"
            )));
        }

        let id = Uuid::new_v4();
        with_tx!(self, |db_tx| {
            meters::Entity::find_by_id(meter_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("meter {meter_id}")))?;

            meter_readings::ActiveModel {
                id: ActiveValue::Set(id),
                meter_id: ActiveValue::Set(meter_id),
                read_date: ActiveValue::Set(read_date),
                value: ActiveValue::Set(value),
            }
            .insert(&db_tx)
            .await?;
            Ok(id)
        })
    }
}
