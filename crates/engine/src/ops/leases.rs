use chrono::NaiveDate;
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine, leases, payments, units};

use super::{Engine, normalize_optional_text, normalize_required_name, with_tx};

impl Engine {
    /// Start a lease on a unit. An open lease has no `end_date`.
    pub async fn new_lease(
        &self,
        unit_id: Uuid,
        tenant_name: Option<String>,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> ResultEngine<Uuid> {
        if let Some(end) = end_date
            && end < start_date
        {
            return Err(EngineError::InvalidAmount(format!(
                "lease ends before it starts: {start_date} > {end}"
            )));
        }

        let id = Uuid::new_v4();
        let tenant_name = normalize_optional_text(tenant_name);
        with_tx!(self, |db_tx| {
            units::Entity::find_by_id(unit_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("unit {unit_id}")))?;

            leases::ActiveModel {
                id: ActiveValue::Set(id),
                unit_id: ActiveValue::Set(unit_id),
                tenant_name: ActiveValue::Set(tenant_name),
                start_date: ActiveValue::Set(start_date),
                end_date: ActiveValue::Set(end_date),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(%unit_id, lease_id = %id, "lease created");
            Ok(id)
        })
    }

    /// Record a payment received on a lease.
    ///
    /// Payments tagged `NK` or `Heizung` count as advances in settlements.
    pub async fn add_payment(
        &self,
        lease_id: Uuid,
        pay_date: NaiveDate,
        amount: MoneyCents,
        category: &str,
    ) -> ResultEngine<Uuid> {
        if amount.is_negative() {
            return Err(EngineError::InvalidAmount(format!(
                "payment must be >= 0, got {amount}"
            )));
        }
        let category = normalize_required_name(category, "payment category")?;

        let id = Uuid::new_v4();
        with_tx!(self, |db_tx| {
            leases::Entity::find_by_id(lease_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(format!("lease {lease_id}")))?;

            payments::ActiveModel {
                id: ActiveValue::Set(id),
                lease_id: ActiveValue::Set(lease_id),
                pay_date: ActiveValue::Set(pay_date),
                amount_minor: ActiveValue::Set(amount.cents()),
                category: ActiveValue::Set(category.clone()),
                note: ActiveValue::Set(None),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(%lease_id, %amount, %category, "payment recorded");
            Ok(id)
        })
    }
}
