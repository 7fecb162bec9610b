//! Cooling record database entity for SeaORM.
//!
//! Each blob array is stored as a JSONB array column.

use sea_orm::entity::prelude::*;

use crate::domain::{Cooling, CoolingData, JsonBlobs};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cooling_model")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: Option<String>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub components: Option<Json>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub losses: Option<Json>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub faces: Option<Json>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub passages: Option<Json>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub fluids: Option<Json>,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Owner,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Column value for a blob array
pub fn blobs_to_json(blobs: JsonBlobs) -> Option<Json> {
    blobs.map(Json::Array)
}

/// Blob array from a column value; a stray scalar becomes a one-element array
pub fn json_to_blobs(value: Option<Json>) -> JsonBlobs {
    match value {
        None | Some(Json::Null) => None,
        Some(Json::Array(items)) => Some(items),
        Some(other) => Some(vec![other]),
    }
}

/// Convert database model to domain entity
impl From<Model> for Cooling {
    fn from(model: Model) -> Self {
        Cooling {
            id: model.id,
            name: model.name,
            data: CoolingData {
                components: json_to_blobs(model.components),
                losses: json_to_blobs(model.losses),
                faces: json_to_blobs(model.faces),
                passages: json_to_blobs(model.passages),
                fluids: json_to_blobs(model.fluids),
            },
            owner_id: model.owner_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
