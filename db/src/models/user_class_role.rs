use sea_orm::EntityTrait;
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The central table for user-class membership and role.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "user_class_roles")]
pub struct Model {
    /// User ID (foreign key to `users`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,

    /// Class ID (foreign key to `school_classes`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub class_id: i64,

    /// Role type: Teacher or Student
    pub role: Role,
}

/// Enum representing user roles within a class.
#[derive(
    Debug, Clone, PartialEq, EnumIter, DeriveActiveEnum, Display, EnumString, Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_class_role_type")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    #[sea_orm(string_value = "teacher")]
    Teacher,

    #[sea_orm(string_value = "student")]
    Student,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::school_class::Entity",
        from = "Column::ClassId",
        to = "super::school_class::Column::Id"
    )]
    Class,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl Related<super::school_class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Adds a user to a class with the given role.
    pub async fn assign_user_to_class(
        db: &DatabaseConnection,
        user_id: i64,
        class_id: i64,
        role: Role,
    ) -> Result<Model, DbErr> {
        ActiveModel {
            user_id: Set(user_id),
            class_id: Set(class_id),
            role: Set(role),
        }
        .insert(db)
        .await
    }

    pub async fn is_in_role(
        db: &DatabaseConnection,
        user_id: i64,
        class_id: i64,
        role: Role,
    ) -> Result<bool, DbErr> {
        Ok(Entity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Role.eq(role))
            .one(db)
            .await?
            .is_some())
    }

    /// IDs of all students enrolled in a class, in stable order.
    pub async fn students_of_class(
        db: &DatabaseConnection,
        class_id: i64,
    ) -> Result<Vec<i64>, DbErr> {
        let mut ids: Vec<i64> = Entity::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Role.eq(Role::Student))
            .all(db)
            .await?
            .into_iter()
            .map(|m| m.user_id)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    /// Class IDs the user belongs to with the given role.
    pub async fn classes_of_user(
        db: &DatabaseConnection,
        user_id: i64,
        role: Role,
    ) -> Result<Vec<i64>, DbErr> {
        Ok(Entity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::Role.eq(role))
            .all(db)
            .await?
            .into_iter()
            .map(|m| m.class_id)
            .collect())
    }
}
