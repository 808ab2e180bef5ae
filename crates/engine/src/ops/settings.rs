use std::collections::BTreeMap;

use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    CategoryCatalog, CostCategory, EngineError, PropertySettings, ResultEngine, categories,
    property_settings, unit_persons,
};

use super::{Engine, with_tx};

impl Engine {
    /// The cost category catalog.
    pub async fn categories(&self) -> ResultEngine<CategoryCatalog> {
        with_tx!(self, |db_tx| self.load_catalog(&db_tx).await)
    }

    /// Allocation settings of a property, defaults when none are stored.
    pub async fn property_settings(&self, property_id: Uuid) -> ResultEngine<PropertySettings> {
        with_tx!(self, |db_tx| {
            self.require_property(&db_tx, property_id).await?;
            self.load_settings(&db_tx, property_id).await
        })
    }

    /// Store the allocation settings of a property.
    pub async fn upsert_property_settings(
        &self,
        property_id: Uuid,
        settings: PropertySettings,
    ) -> ResultEngine<PropertySettings> {
        let settings = PropertySettings::new(
            settings.heat_ratio_consumption,
            settings.persons_default,
            settings.water_allocation_fallback,
        )?;
        let model = property_settings::ActiveModel::from_settings(property_id, &settings)?;

        with_tx!(self, |db_tx| {
            self.require_property(&db_tx, property_id).await?;
            let existing = property_settings::Entity::find_by_id(property_id)
                .one(&db_tx)
                .await?;
            match existing {
                Some(_) => model.update(&db_tx).await?,
                None => model.insert(&db_tx).await?,
            };
            tracing::info!(%property_id, ?settings, "property settings stored");
            Ok(settings)
        })
    }

    /// Recorded person counts of a property for `year`.
    pub async fn unit_persons(
        &self,
        property_id: Uuid,
        year: i32,
    ) -> ResultEngine<BTreeMap<Uuid, u32>> {
        with_tx!(self, |db_tx| {
            self.require_property(&db_tx, property_id).await?;
            self.load_persons(&db_tx, property_id, year).await
        })
    }

    /// Replace every person count of a property for `year` with `counts`.
    ///
    /// Units left out of `counts` fall back to the property's default.
    pub async fn replace_unit_persons(
        &self,
        property_id: Uuid,
        year: i32,
        counts: &BTreeMap<Uuid, u32>,
    ) -> ResultEngine<()> {
        let mut rows = Vec::with_capacity(counts.len());
        for (unit_id, persons) in counts {
            let persons = i32::try_from(*persons).map_err(|_| {
                EngineError::InvalidAmount(format!("persons out of range: {persons}"))
            })?;
            rows.push(unit_persons::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4()),
                property_id: ActiveValue::Set(property_id),
                unit_id: ActiveValue::Set(*unit_id),
                year: ActiveValue::Set(year),
                persons: ActiveValue::Set(persons),
            });
        }

        with_tx!(self, |db_tx| {
            self.require_property(&db_tx, property_id).await?;

            let known = self.load_units(&db_tx, property_id).await?;
            if let Some(unit_id) = counts
                .keys()
                .find(|unit_id| !known.iter().any(|unit| &unit.id == *unit_id))
            {
                return Err(EngineError::KeyNotFound(format!("unit {unit_id}")));
            }

            unit_persons::Entity::delete_many()
                .filter(unit_persons::Column::PropertyId.eq(property_id))
                .filter(unit_persons::Column::Year.eq(year))
                .exec(&db_tx)
                .await?;
            if !rows.is_empty() {
                unit_persons::Entity::insert_many(rows).exec(&db_tx).await?;
            }
            Ok(())
        })
    }

    pub(super) async fn load_catalog(
        &self,
        db: &DatabaseTransaction,
    ) -> ResultEngine<CategoryCatalog> {
        let models = categories::Entity::find().all(db).await?;
        Ok(CategoryCatalog::new(models.into_iter().map(CostCategory::from)))
    }

    pub(super) async fn load_settings(
        &self,
        db: &DatabaseTransaction,
        property_id: Uuid,
    ) -> ResultEngine<PropertySettings> {
        match property_settings::Entity::find_by_id(property_id).one(db).await? {
            Some(model) => PropertySettings::try_from(model),
            None => Ok(PropertySettings::default()),
        }
    }

    pub(super) async fn load_persons(
        &self,
        db: &DatabaseTransaction,
        property_id: Uuid,
        year: i32,
    ) -> ResultEngine<BTreeMap<Uuid, u32>> {
        let models = unit_persons::Entity::find()
            .filter(unit_persons::Column::PropertyId.eq(property_id))
            .filter(unit_persons::Column::Year.eq(year))
            .all(db)
            .await?;

        let mut persons = BTreeMap::new();
        for model in models {
            // Negative counts are treated as an empty unit.
            let count = u32::try_from(model.persons).unwrap_or(0);
            persons.insert(model.unit_id, count);
        }
        Ok(persons)
    }
}
