//! Rent and advance payments received on a lease.

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::MoneyCents;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub lease_id: Uuid,
    pub pay_date: NaiveDate,
    pub amount: MoneyCents,
    /// Free-text tag such as "Miete", "NK" or "Heizung".
    pub category: String,
    pub note: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub lease_id: Uuid,
    pub pay_date: Date,
    pub amount_minor: i64,
    pub category: String,
    pub note: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::leases::Entity",
        from = "Column::LeaseId",
        to = "super::leases::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Lease,
}

impl Related<super::leases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lease.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Payment {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            lease_id: model.lease_id,
            pay_date: model.pay_date,
            amount: MoneyCents::new(model.amount_minor),
            category: model.category,
            note: model.note,
        }
    }
}
