use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set};
use serde::Serialize;

/// An ordered class period within the school day, e.g. "第1节" or "早读".
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "class_periods")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub display_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("No RelationDef implemented")
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DatabaseConnection,
        name: &str,
        display_order: i32,
    ) -> Result<Model, DbErr> {
        ActiveModel {
            name: Set(name.to_owned()),
            display_order: Set(display_order),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn all_ordered(db: &DatabaseConnection) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .order_by_asc(Column::DisplayOrder)
            .all(db)
            .await
    }
}

impl From<&Model> for util::periods::Period {
    fn from(m: &Model) -> Self {
        util::periods::Period {
            id: m.id,
            name: m.name.clone(),
            display_order: m.display_order,
        }
    }
}
