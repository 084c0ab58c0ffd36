use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::models::attendance_record::{
    self, ApprovalStatus, NewAttendanceRecord, RecordDetails, SourceType,
};

/// A student-submitted leave application, reviewed by a teacher or admin.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "leave_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub leave_type_id: i64,
    pub status: Status,
    pub reason: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Input payload matching the leave type's schema (JSON).
    pub details: Option<String>,
    /// JSON array of stored image paths.
    pub images: String,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, PartialEq, EnumIter, DeriveActiveEnum, Display, EnumString, Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "leave_request_status")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Status {
    #[sea_orm(string_value = "pending")]
    Pending,

    #[sea_orm(string_value = "approved")]
    Approved,

    #[sea_orm(string_value = "rejected")]
    Rejected,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::school_class::Entity",
        from = "Column::ClassId",
        to = "super::school_class::Column::Id"
    )]
    Class,
    #[sea_orm(
        belongs_to = "super::leave_type::Entity",
        from = "Column::LeaveTypeId",
        to = "super::leave_type::Column::Id"
    )]
    LeaveType,
}

impl Related<super::leave_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeaveType.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        db: &DatabaseConnection,
        student_id: i64,
        class_id: i64,
        leave_type_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: Option<&str>,
        details: Option<&RecordDetails>,
        images: &[String],
    ) -> Result<Model, DbErr> {
        let encoded_details = match details {
            Some(d) => Some(d.encode()?),
            None => None,
        };
        let encoded_images = serde_json::to_string(images)
            .map_err(|e| DbErr::Custom(format!("Failed to encode image paths: {e}")))?;

        ActiveModel {
            student_id: Set(student_id),
            class_id: Set(class_id),
            leave_type_id: Set(leave_type_id),
            status: Set(Status::Pending),
            reason: Set(reason.map(|s| s.to_owned())),
            start_date: Set(start_date),
            end_date: Set(end_date),
            details: Set(encoded_details),
            images: Set(encoded_images),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn get_by_id(db: &DatabaseConnection, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn for_student(
        db: &DatabaseConnection,
        student_id: i64,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::CreatedAt)
            .all(db)
            .await
    }

    pub async fn for_class(
        db: &DatabaseConnection,
        class_id: i64,
        status: Option<Status>,
    ) -> Result<Vec<Model>, DbErr> {
        let mut sel = Entity::find().filter(Column::ClassId.eq(class_id));
        if let Some(status) = status {
            sel = sel.filter(Column::Status.eq(status));
        }
        sel.order_by_desc(Column::CreatedAt).all(db).await
    }

    /// Approves a pending request and writes the derived attendance records
    /// (one per day of the range) in the same transaction.
    pub async fn approve(
        db: &DatabaseConnection,
        id: i64,
        reviewer_id: i64,
    ) -> Result<Model, DbErr> {
        let txn = db.begin().await?;

        let request = Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Leave request {id} not found")))?;
        if request.status != Status::Pending {
            return Err(DbErr::Custom("Leave request is not pending".into()));
        }

        let details = request.request_details();
        let mut date = request.start_date;
        while date <= request.end_date {
            attendance_record::Model::create(
                &txn,
                NewAttendanceRecord {
                    student_id: request.student_id,
                    class_id: request.class_id,
                    date,
                    period_id: None,
                    status: attendance_record::Status::Leave,
                    leave_type_id: Some(request.leave_type_id),
                    details: details.clone(),
                    source_type: SourceType::LeaveRequest,
                    source_id: Some(request.id),
                    approval_status: Some(ApprovalStatus::Approved),
                    created_by: reviewer_id,
                },
            )
            .await?;
            date = date
                .succ_opt()
                .ok_or_else(|| DbErr::Custom("Date range overflow".into()))?;
        }

        let mut active: ActiveModel = request.into();
        active.status = Set(Status::Approved);
        active.reviewed_by = Set(Some(reviewer_id));
        active.reviewed_at = Set(Some(Utc::now()));
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Rejects a pending request.
    pub async fn reject(
        db: &DatabaseConnection,
        id: i64,
        reviewer_id: i64,
    ) -> Result<Model, DbErr> {
        let request = Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("Leave request {id} not found")))?;
        if request.status != Status::Pending {
            return Err(DbErr::Custom("Leave request is not pending".into()));
        }

        let mut active: ActiveModel = request.into();
        active.status = Set(Status::Rejected);
        active.reviewed_by = Set(Some(reviewer_id));
        active.reviewed_at = Set(Some(Utc::now()));
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    /// Decoded input payload; malformed or missing payloads read as `None`.
    pub fn request_details(&self) -> Option<RecordDetails> {
        self.details
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
    }

    /// Decoded image path list; malformed rows read as empty.
    pub fn image_list(&self) -> Vec<String> {
        serde_json::from_str(&self.images).unwrap_or_default()
    }
}
