use sea_orm::entity::prelude::*;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, Set};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// A flat key-value setting. Structured settings (e.g. `attendance_periods`)
/// store a JSON-encoded value.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    pub value: String,
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
    pub async fn get(db: &DatabaseConnection, key: &str) -> Result<Option<String>, DbErr> {
        Ok(Entity::find_by_id(key).one(db).await?.map(|m| m.value))
    }

    /// Reads a setting as an integer, falling back to `default` when the key
    /// is missing or not numeric.
    pub async fn get_i64_or(db: &DatabaseConnection, key: &str, default: i64) -> i64 {
        match Self::get(db, key).await {
            Ok(Some(value)) => value.parse().unwrap_or(default),
            _ => default,
        }
    }

    /// Upserts a setting.
    pub async fn set(db: &DatabaseConnection, key: &str, value: &str) -> Result<Model, DbErr> {
        match Entity::find_by_id(key).one(db).await? {
            Some(existing) => {
                let mut active: ActiveModel = existing.into();
                active.value = Set(value.to_owned());
                active.update(db).await
            }
            None => {
                ActiveModel {
                    key: Set(key.to_owned()),
                    value: Set(value.to_owned()),
                }
                .insert(db)
                .await
            }
        }
    }

    /// The full settings table as a map, with JSON-encoded values decoded
    /// and everything else kept as a plain string.
    pub async fn get_map(db: &DatabaseConnection) -> Result<HashMap<String, Value>, DbErr> {
        let rows = Entity::find().all(db).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let value = serde_json::from_str(&row.value)
                    .unwrap_or_else(|_| Value::String(row.value.clone()));
                (row.key, value)
            })
            .collect())
    }
}
