use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};
use serde::Serialize;
use std::collections::HashSet;

/// A school semester: the frame for week numbering and holiday marking.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "semesters")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub total_weeks: i32,
    /// JSON array of ISO `YYYY-MM-DD` strings.
    pub holidays: String,
    /// At most one semester is current at a time.
    pub current: bool,
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
    /// Creates a semester; when `current` is set, any previously current
    /// semester is demoted first.
    pub async fn create(
        db: &DatabaseConnection,
        name: &str,
        start_date: NaiveDate,
        total_weeks: i32,
        holidays: &[String],
        current: bool,
    ) -> Result<Model, DbErr> {
        if current {
            Entity::update_many()
                .col_expr(Column::Current, Expr::value(false))
                .filter(Column::Current.eq(true))
                .exec(db)
                .await?;
        }

        let encoded = serde_json::to_string(holidays)
            .map_err(|e| DbErr::Custom(format!("Failed to encode holidays: {e}")))?;

        ActiveModel {
            name: Set(name.to_owned()),
            start_date: Set(start_date),
            total_weeks: Set(total_weeks),
            holidays: Set(encoded),
            current: Set(current),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn get_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn get_all(db: &DatabaseConnection) -> Result<Vec<Model>, DbErr> {
        Entity::find().all(db).await
    }

    pub async fn get_current(db: &DatabaseConnection) -> Result<Option<Model>, DbErr> {
        Entity::find().filter(Column::Current.eq(true)).one(db).await
    }

    /// Decoded holiday list; malformed rows read as empty.
    pub fn holiday_set(&self) -> HashSet<String> {
        serde_json::from_str(&self.holidays).unwrap_or_default()
    }
}

impl From<&Model> for util::calendar::SemesterCalendar {
    fn from(m: &Model) -> Self {
        util::calendar::SemesterCalendar {
            start_date: m.start_date,
            total_weeks: m.total_weeks.max(0) as u32,
            holidays: m.holiday_set(),
        }
    }
}
