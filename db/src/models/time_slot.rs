use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, Set};
use serde::Serialize;

/// A named preset grouping of period IDs, e.g. "上午" covering periods 1-4.
///
/// `period_ids` is persisted as a JSON array; use [`Model::period_id_list`]
/// to read it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "time_slots")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub period_ids: String,
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
        period_ids: &[i64],
    ) -> Result<Model, DbErr> {
        let encoded = serde_json::to_string(period_ids)
            .map_err(|e| DbErr::Custom(format!("Failed to encode period ids: {e}")))?;

        ActiveModel {
            name: Set(name.to_owned()),
            period_ids: Set(encoded),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn get_all(db: &DatabaseConnection) -> Result<Vec<Model>, DbErr> {
        Entity::find().all(db).await
    }

    /// Decoded period-ID list; malformed rows read as empty.
    pub fn period_id_list(&self) -> Vec<i64> {
        serde_json::from_str(&self.period_ids).unwrap_or_default()
    }
}

impl From<&Model> for util::periods::TimeSlot {
    fn from(m: &Model) -> Self {
        util::periods::TimeSlot {
            id: m.id,
            name: m.name.clone(),
            period_ids: m.period_id_list(),
        }
    }
}
