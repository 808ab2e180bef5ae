use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::Unit;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "units")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub property_id: Uuid,
    pub label: String,
    #[sea_orm(column_type = "Double", nullable)]
    pub area_sqm: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::properties::Entity",
        from = "Column::PropertyId",
        to = "super::properties::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Property,
}

impl Related<super::properties::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Unit {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            property_id: model.property_id,
            label: model.label,
            area_sqm: model.area_sqm.unwrap_or(0.0),
        }
    }
}

impl From<&Unit> for ActiveModel {
    fn from(unit: &Unit) -> Self {
        Self {
            id: ActiveValue::Set(unit.id),
            property_id: ActiveValue::Set(unit.property_id),
            label: ActiveValue::Set(unit.label.clone()),
            area_sqm: ActiveValue::Set(Some(unit.area_sqm)),
        }
    }
}
