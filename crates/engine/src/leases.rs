//! Leases, as far as settlements need them.

use chrono::{Datelike, NaiveDate};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lease {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub tenant_name: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl Lease {
    /// A lease is active in `year` when it started in or before that year and
    /// has not ended before it. Only calendar years are compared.
    pub fn is_active_in(&self, year: i32) -> bool {
        self.start_date.year() <= year && self.end_date.is_none_or(|end| end.year() >= year)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "leases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub unit_id: Uuid,
    pub tenant_name: Option<String>,
    pub start_date: Date,
    pub end_date: Option<Date>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::units::Entity",
        from = "Column::UnitId",
        to = "super::units::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Unit,
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
}

impl Related<super::units::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Unit.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Lease {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            unit_id: model.unit_id,
            tenant_name: model.tenant_name,
            start_date: model.start_date,
            end_date: model.end_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lease(start: (i32, u32, u32), end: Option<(i32, u32, u32)>) -> Lease {
        let date = |(y, m, d): (i32, u32, u32)| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        Lease {
            id: Uuid::new_v4(),
            unit_id: Uuid::new_v4(),
            tenant_name: None,
            start_date: date(start),
            end_date: end.map(date),
        }
    }

    #[test]
    fn open_ended_lease_is_active_from_start_year() {
        let lease = lease((2022, 9, 1), None);
        assert!(!lease.is_active_in(2021));
        assert!(lease.is_active_in(2022));
        assert!(lease.is_active_in(2030));
    }

    #[test]
    fn lease_is_active_in_its_end_year_only_up_to_it() {
        let lease = lease((2020, 1, 1), Some((2023, 1, 31)));
        assert!(lease.is_active_in(2023));
        assert!(!lease.is_active_in(2024));
    }
}
