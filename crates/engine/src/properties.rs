//! Properties and their rental units.
//!
//! Both are owned by the surrounding CRUD layer; the engine reads them and
//! offers the bootstrap inserts used by the admin tooling.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A rental unit as seen by the allocation core.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: Uuid,
    pub property_id: Uuid,
    pub label: String,
    /// Living area in m². Missing areas count as 0.
    pub area_sqm: f64,
}

impl Unit {
    pub fn new(property_id: Uuid, label: impl Into<String>, area_sqm: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            property_id,
            label: label.into(),
            area_sqm,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "properties")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::units::Entity")]
    Units,
}

impl Related<super::units::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Units.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
