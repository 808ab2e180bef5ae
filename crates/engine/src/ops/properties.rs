use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, Unit, properties, units};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Add a new property and return its id.
    pub async fn new_property(&self, name: &str) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "property")?;
        let id = Uuid::new_v4();
        with_tx!(self, |db_tx| {
            let exists = properties::Entity::find()
                .filter(properties::Column::Name.eq(name.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(name));
            }

            properties::ActiveModel {
                id: ActiveValue::Set(id),
                name: ActiveValue::Set(name),
            }
            .insert(&db_tx)
            .await?;
            Ok(id)
        })
    }

    /// Add a rental unit to a property.
    ///
    /// Labels are unique within a property; `area_sqm` must be finite and
    /// not negative.
    pub async fn new_unit(&self, property_id: Uuid, label: &str, area_sqm: f64) -> ResultEngine<Uuid> {
        let label = normalize_required_name(label, "unit")?;
        if !area_sqm.is_finite() || area_sqm < 0.0 {
            return Err(EngineError::InvalidAmount(format!(
                "area_sqm must be >= 0, got {area_sqm}"
            )));
        }

        let unit = Unit::new(property_id, label, area_sqm);
        with_tx!(self, |db_tx| {
            self.require_property(&db_tx, property_id).await?;

            let exists = units::Entity::find()
                .filter(units::Column::PropertyId.eq(property_id))
                .filter(units::Column::Label.eq(unit.label.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(unit.label));
            }

            units::ActiveModel::from(&unit).insert(&db_tx).await?;
            Ok(unit.id)
        })
    }

    /// Units of a property ordered by label.
    pub async fn units(&self, property_id: Uuid) -> ResultEngine<Vec<Unit>> {
        with_tx!(self, |db_tx| {
            self.require_property(&db_tx, property_id).await?;
            self.load_units(&db_tx, property_id).await
        })
    }

    pub(super) async fn require_property(
        &self,
        db: &DatabaseTransaction,
        property_id: Uuid,
    ) -> ResultEngine<properties::Model> {
        properties::Entity::find_by_id(property_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("property {property_id}")))
    }

    pub(super) async fn load_units(
        &self,
        db: &DatabaseTransaction,
        property_id: Uuid,
    ) -> ResultEngine<Vec<Unit>> {
        let models = units::Entity::find()
            .filter(units::Column::PropertyId.eq(property_id))
            .order_by_asc(units::Column::Label)
            .order_by_asc(units::Column::Id)
            .all(db)
            .await?;
        Ok(models.into_iter().map(Unit::from).collect())
    }
}
