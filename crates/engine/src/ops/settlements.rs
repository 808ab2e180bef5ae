use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Lease, Payment, ResultEngine, Settlement, leases, payments, settle, units,
};

use super::{Engine, with_tx};

impl Engine {
    /// Leases of a property active during `year`, oldest first.
    pub async fn active_leases(&self, property_id: Uuid, year: i32) -> ResultEngine<Vec<Lease>> {
        with_tx!(self, |db_tx| {
            self.require_property(&db_tx, property_id).await?;
            let unit_ids: Vec<Uuid> = self
                .load_units(&db_tx, property_id)
                .await?
                .into_iter()
                .map(|unit| unit.id)
                .collect();

            let models = leases::Entity::find()
                .filter(leases::Column::UnitId.is_in(unit_ids))
                .order_by_asc(leases::Column::StartDate)
                .order_by_asc(leases::Column::Id)
                .all(&db_tx)
                .await?;
            Ok(models
                .into_iter()
                .map(Lease::from)
                .filter(|lease| lease.is_active_in(year))
                .collect())
        })
    }

    /// Settlement of one lease for `year`.
    ///
    /// Fails with [`EngineError::NotApplicable`] when the lease is not
    /// active in `year`.
    pub async fn settle_lease(&self, lease_id: Uuid, year: i32) -> ResultEngine<Settlement> {
        with_tx!(self, |db_tx| {
            let lease: Lease = leases::Entity::find_by_id(lease_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("lease {lease_id}")))?
                .into();
            if !lease.is_active_in(year) {
                return Err(EngineError::NotApplicable(format!(
                    "lease {lease_id} is not active in {year}"
                )));
            }

            let unit = units::Entity::find_by_id(lease.unit_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("unit {}", lease.unit_id)))?;

            let statement = self.statement_in(&db_tx, unit.property_id, year).await?;
            let catalog = self.load_catalog(&db_tx).await?;
            let payments: Vec<Payment> = payments::Entity::find()
                .filter(payments::Column::LeaseId.eq(lease_id))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Payment::from)
                .collect();

            settle(&lease, year, &statement, &catalog, &payments)
        })
    }
}
