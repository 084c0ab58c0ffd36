use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A configurable category of absence (sick, personal, ...) with an
/// associated input schema describing what the submitter must provide.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "leave_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub input_type: InputType,
    /// JSON: required sub-inputs and allowed option keys.
    pub input_config: Option<String>,
}

/// The extra input a leave type collects on submission.
#[derive(
    Debug, Clone, PartialEq, EnumIter, DeriveActiveEnum, Display, EnumString, Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "leave_input_type")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum InputType {
    #[sea_orm(string_value = "none")]
    None,

    #[sea_orm(string_value = "time")]
    Time,

    #[sea_orm(string_value = "period_select")]
    PeriodSelect,

    #[sea_orm(string_value = "duration_select")]
    DurationSelect,

    #[sea_orm(string_value = "text")]
    Text,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::leave_request::Entity")]
    LeaveRequests,
}

impl Related<super::leave_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeaveRequests.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DatabaseConnection,
        name: &str,
        slug: &str,
        input_type: InputType,
        input_config: Option<&str>,
    ) -> Result<Model, DbErr> {
        ActiveModel {
            name: Set(name.to_owned()),
            slug: Set(slug.to_owned()),
            input_type: Set(input_type),
            input_config: Set(input_config.map(|s| s.to_owned())),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn get_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn get_by_slug(
        db: &DatabaseConnection,
        slug: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find().filter(Column::Slug.eq(slug)).one(db).await
    }

    pub async fn get_all(db: &DatabaseConnection) -> Result<Vec<Model>, DbErr> {
        Entity::find().all(db).await
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: i64,
        name: &str,
        input_type: InputType,
        input_config: Option<&str>,
    ) -> Result<Model, DbErr> {
        let existing = Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Leave type {id} not found")))?;

        let mut active: ActiveModel = existing.into();
        active.name = Set(name.to_owned());
        active.input_type = Set(input_type);
        active.input_config = Set(input_config.map(|s| s.to_owned()));
        active.update(db).await
    }

    pub async fn delete_by_id(db: &DatabaseConnection, id: i64) -> Result<bool, DbErr> {
        let res = Entity::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected > 0)
    }
}
