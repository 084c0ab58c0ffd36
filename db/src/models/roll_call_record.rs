use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// One student's state within a roll call session.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "roll_call_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub roll_call_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub student_id: i64,

    pub status: Status,
    pub marked_at: Option<DateTime<Utc>>,
}

#[derive(
    Debug, Clone, PartialEq, EnumIter, DeriveActiveEnum, Display, EnumString, Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "roll_call_record_status")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Status {
    #[sea_orm(string_value = "pending")]
    Pending,

    #[sea_orm(string_value = "present")]
    Present,

    #[sea_orm(string_value = "absent")]
    Absent,

    #[sea_orm(string_value = "on_leave")]
    OnLeave,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::roll_call::Entity",
        from = "Column::RollCallId",
        to = "super::roll_call::Column::Id"
    )]
    RollCall,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id"
    )]
    Student,
}

impl Related<super::roll_call::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RollCall.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn for_roll_call(
        db: &DatabaseConnection,
        roll_call_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::RollCallId.eq(roll_call_id))
            .all(db)
            .await
    }

    /// Marks one student within a session, stamping the mark time.
    pub async fn mark(
        db: &DatabaseConnection,
        roll_call_id: i64,
        student_id: i64,
        status: Status,
    ) -> Result<Model, DbErr> {
        let record = Entity::find_by_id((roll_call_id, student_id))
            .one(db)
            .await?
            .ok_or_else(|| {
                DbErr::RecordNotFound(format!(
                    "Roll call record ({roll_call_id}, {student_id}) not found"
                ))
            })?;

        let mut active: ActiveModel = record.into();
        active.status = Set(status);
        active.marked_at = Set(Some(Utc::now()));
        active.update(db).await
    }

    /// Per-status tallies for a session: (pending, present, absent, on_leave).
    pub async fn status_counts(
        db: &DatabaseConnection,
        roll_call_id: i64,
    ) -> Result<(u64, u64, u64, u64), DbErr> {
        let records = Self::for_roll_call(db, roll_call_id).await?;
        let mut counts = (0, 0, 0, 0);
        for record in records {
            match record.status {
                Status::Pending => counts.0 += 1,
                Status::Present => counts.1 += 1,
                Status::Absent => counts.2 += 1,
                Status::OnLeave => counts.3 += 1,
            }
        }
        Ok(counts)
    }
}
