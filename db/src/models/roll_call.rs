use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::models::attendance_record::{self, NewAttendanceRecord, SourceType};
use crate::models::roll_call_record;
use crate::models::user_class_role;

/// A live attendance session for a class and a configured activity type
/// (e.g. morning exercise).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "roll_calls")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_id: i64,
    pub call_type: String,
    pub date: NaiveDate,
    pub status: Status,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Session lifecycle: in_progress → completed | cancelled, with cancelled
/// sessions restorable back to in_progress.
#[derive(
    Debug, Clone, PartialEq, EnumIter, DeriveActiveEnum, Display, EnumString, Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "roll_call_status")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Status {
    #[sea_orm(string_value = "in_progress")]
    InProgress,

    #[sea_orm(string_value = "completed")]
    Completed,

    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::school_class::Entity",
        from = "Column::ClassId",
        to = "super::school_class::Column::Id"
    )]
    Class,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id"
    )]
    Creator,
    #[sea_orm(has_many = "super::roll_call_record::Entity")]
    Records,
}

impl Related<super::school_class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl Related<super::roll_call_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Records.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Opens a session and pre-creates a pending record per enrolled student.
    pub async fn create_with_records(
        db: &DatabaseConnection,
        class_id: i64,
        call_type: &str,
        date: NaiveDate,
        created_by: i64,
    ) -> Result<Model, DbErr> {
        let student_ids = user_class_role::Model::students_of_class(db, class_id).await?;

        let txn = db.begin().await?;

        let call = ActiveModel {
            class_id: Set(class_id),
            call_type: Set(call_type.to_owned()),
            date: Set(date),
            status: Set(Status::InProgress),
            created_by: Set(created_by),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for student_id in student_ids {
            roll_call_record::ActiveModel {
                roll_call_id: Set(call.id),
                student_id: Set(student_id),
                status: Set(roll_call_record::Status::Pending),
                marked_at: Set(None),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(call)
    }

    pub async fn get_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn for_class(
        db: &DatabaseConnection,
        class_id: i64,
        date: Option<NaiveDate>,
    ) -> Result<Vec<Model>, DbErr> {
        let mut sel = Entity::find().filter(Column::ClassId.eq(class_id));
        if let Some(date) = date {
            sel = sel.filter(Column::Date.eq(date));
        }
        sel.order_by_desc(Column::CreatedAt).all(db).await
    }

    /// Completes an in-progress session and writes absent/on-leave results
    /// through to attendance records, all in one transaction.
    pub async fn complete(db: &DatabaseConnection, id: i64) -> Result<Model, DbErr> {
        let txn = db.begin().await?;

        let call = Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Roll call {id} not found")))?;
        if call.status != Status::InProgress {
            return Err(DbErr::Custom("Roll call is not in progress".into()));
        }

        let records = roll_call_record::Entity::find()
            .filter(roll_call_record::Column::RollCallId.eq(id))
            .all(&txn)
            .await?;

        for record in records {
            let status = match record.status {
                roll_call_record::Status::Absent => attendance_record::Status::Absent,
                roll_call_record::Status::OnLeave => attendance_record::Status::Leave,
                _ => continue,
            };
            attendance_record::Model::create(
                &txn,
                NewAttendanceRecord {
                    student_id: record.student_id,
                    class_id: call.class_id,
                    date: call.date,
                    period_id: None,
                    status,
                    leave_type_id: None,
                    details: None,
                    source_type: SourceType::RollCall,
                    source_id: Some(call.id),
                    approval_status: None,
                    created_by: call.created_by,
                },
            )
            .await?;
        }

        let mut active: ActiveModel = call.into();
        active.status = Set(Status::Completed);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Cancels an in-progress session and removes any attendance records
    /// already derived from it.
    pub async fn cancel(db: &DatabaseConnection, id: i64) -> Result<Model, DbErr> {
        let txn = db.begin().await?;

        let call = Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Roll call {id} not found")))?;
        if call.status != Status::InProgress {
            return Err(DbErr::Custom("Roll call is not in progress".into()));
        }

        attendance_record::Model::delete_by_source(&txn, SourceType::RollCall, call.id).await?;

        let mut active: ActiveModel = call.into();
        active.status = Set(Status::Cancelled);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Restores a cancelled session back to in-progress.
    pub async fn restore(db: &DatabaseConnection, id: i64) -> Result<Model, DbErr> {
        let call = Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Roll call {id} not found")))?;
        if call.status != Status::Cancelled {
            return Err(DbErr::Custom("Roll call is not cancelled".into()));
        }

        let mut active: ActiveModel = call.into();
        active.status = Set(Status::InProgress);
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }
}
