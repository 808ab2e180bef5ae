use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    CostEntry, EngineError, ResultEngine, commands::NewCostEntry, cost_entries, units,
};

use super::{Engine, normalize_optional_text, with_tx};

impl Engine {
    /// Book a cost entry.
    ///
    /// The category must exist in the catalog and a pinned unit must belong
    /// to the property. Amount and VAT rate are checked by [`CostEntry::new`].
    pub async fn add_cost_entry(&self, cmd: NewCostEntry) -> ResultEngine<CostEntry> {
        let mut entry = CostEntry::new(
            cmd.property_id,
            cmd.date,
            cmd.category_code.trim(),
            cmd.amount_gross,
            cmd.vat_rate,
        )?;
        entry.unit_id = cmd.unit_id;
        entry.period_start = cmd.period_start;
        entry.period_end = cmd.period_end;
        entry.supplier = normalize_optional_text(cmd.supplier);
        entry.invoice_no = normalize_optional_text(cmd.invoice_no);
        entry.description = normalize_optional_text(cmd.description);

        if let (Some(start), Some(end)) = (entry.period_start, entry.period_end)
            && end < start
        {
            return Err(EngineError::InvalidAmount(format!(
                "period ends before it starts: {start} > {end}"
            )));
        }

        with_tx!(self, |db_tx| {
            self.require_property(&db_tx, entry.property_id).await?;

            if !self.load_catalog(&db_tx).await?.contains(&entry.category_code) {
                return Err(EngineError::KeyNotFound(format!(
                    "category {}",
                    entry.category_code
                )));
            }

            if let Some(unit_id) = entry.unit_id {
                units::Entity::find_by_id(unit_id)
                    .filter(units::Column::PropertyId.eq(entry.property_id))
                    .one(&db_tx)
                    .await?
                    .ok_or_else(|| EngineError::KeyNotFound(format!("unit {unit_id}")))?;
            }

            cost_entries::ActiveModel::from(&entry).insert(&db_tx).await?;
            tracing::info!(
                property_id = %entry.property_id,
                category = %entry.category_code,
                amount = %entry.amount_gross,
                "cost entry booked"
            );
            Ok(entry)
        })
    }

    /// Cost entries of a property, newest first, optionally narrowed to the
    /// entries booked in `year`.
    pub async fn list_cost_entries(
        &self,
        property_id: Uuid,
        year: Option<i32>,
    ) -> ResultEngine<Vec<CostEntry>> {
        with_tx!(self, |db_tx| {
            self.require_property(&db_tx, property_id).await?;
            let models = cost_entries::Entity::find()
                .filter(cost_entries::Column::PropertyId.eq(property_id))
                .order_by_desc(cost_entries::Column::Date)
                .order_by_desc(cost_entries::Column::Id)
                .all(&db_tx)
                .await?;
            Ok::<_, EngineError>(
                models
                    .into_iter()
                    .map(CostEntry::from)
                    .filter(|entry| year.is_none_or(|year| entry.is_in_year(year)))
                    .collect(),
            )
        })
    }

    /// Remove a cost entry of a property.
    pub async fn delete_cost_entry(&self, property_id: Uuid, entry_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let result = cost_entries::Entity::delete_many()
                .filter(cost_entries::Column::Id.eq(entry_id))
                .filter(cost_entries::Column::PropertyId.eq(property_id))
                .exec(&db_tx)
                .await?;
            if result.rows_affected == 0 {
                return Err(EngineError::KeyNotFound(format!("cost entry {entry_id}")));
            }
            Ok(())
        })
    }
}
