use std::collections::BTreeMap;

use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    CostEntry, MeterReading, MeterSeries, PropertyLedger, ResultEngine, Statement,
    build_statement, cost_entries, meter_readings, meters,
};

use super::{Engine, with_tx};

impl Engine {
    /// Snapshot of the allocation inputs of a property for `year`.
    pub async fn property_ledger(&self, property_id: Uuid, year: i32) -> ResultEngine<PropertyLedger> {
        with_tx!(self, |db_tx| {
            self.require_property(&db_tx, property_id).await?;
            self.load_ledger(&db_tx, property_id, year).await
        })
    }

    /// Yearly statement of a property.
    pub async fn statement(&self, property_id: Uuid, year: i32) -> ResultEngine<Statement> {
        with_tx!(self, |db_tx| self.statement_in(&db_tx, property_id, year).await)
    }

    /// Builds the statement from reads made inside `db`.
    pub(super) async fn statement_in(
        &self,
        db: &DatabaseTransaction,
        property_id: Uuid,
        year: i32,
    ) -> ResultEngine<Statement> {
        self.require_property(db, property_id).await?;
        let catalog = self.load_catalog(db).await?;
        let settings = self.load_settings(db, property_id).await?;
        let ledger = self.load_ledger(db, property_id, year).await?;
        Ok(build_statement(&ledger, &catalog, &settings, year))
    }

    pub(super) async fn load_ledger(
        &self,
        db: &DatabaseTransaction,
        property_id: Uuid,
        year: i32,
    ) -> ResultEngine<PropertyLedger> {
        let units = self.load_units(db, property_id).await?;
        let persons = self.load_persons(db, property_id, year).await?;

        let entries = cost_entries::Entity::find()
            .filter(cost_entries::Column::PropertyId.eq(property_id))
            .order_by_asc(cost_entries::Column::Date)
            .all(db)
            .await?
            .into_iter()
            .map(CostEntry::from)
            .filter(|entry| entry.is_in_year(year))
            .collect();

        let unit_ids: Vec<Uuid> = units.iter().map(|unit| unit.id).collect();
        let meter_models = meters::Entity::find()
            .filter(meters::Column::UnitId.is_in(unit_ids))
            .order_by_asc(meters::Column::Id)
            .all(db)
            .await?;

        let meter_ids: Vec<Uuid> = meter_models.iter().map(|meter| meter.id).collect();
        let mut readings: BTreeMap<Uuid, Vec<MeterReading>> = BTreeMap::new();
        for reading in meter_readings::Entity::find()
            .filter(meter_readings::Column::MeterId.is_in(meter_ids))
            .all(db)
            .await?
        {
            readings
                .entry(reading.meter_id)
                .or_default()
                .push(MeterReading::from(reading));
        }

        let meters = meter_models
            .into_iter()
            .map(|meter| MeterSeries {
                meter_id: meter.id,
                unit_id: meter.unit_id,
                readings: readings.remove(&meter.id).unwrap_or_default(),
                kind_label: meter.kind_label,
            })
            .collect();

        Ok(PropertyLedger {
            property_id,
            units,
            entries,
            persons,
            meters,
        })
    }
}
