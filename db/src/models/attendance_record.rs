use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// One attendance fact about a student: a status for a date, optionally
/// narrowed to a single period or (via `details.period_ids`) several.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub date: NaiveDate,
    /// NULL covers the whole day.
    pub period_id: Option<i64>,
    pub status: Status,
    pub leave_type_id: Option<i64>,
    /// Free-form JSON payload: time, option, period_ids, text.
    pub details: Option<String>,
    pub source_type: SourceType,
    pub source_id: Option<i64>,
    /// Only set for self-applied leave.
    pub approval_status: Option<ApprovalStatus>,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, PartialEq, EnumIter, DeriveActiveEnum, Display, EnumString, Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_status")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Status {
    #[sea_orm(string_value = "present")]
    Present,

    #[sea_orm(string_value = "absent")]
    Absent,

    #[sea_orm(string_value = "late")]
    Late,

    #[sea_orm(string_value = "leave")]
    Leave,

    #[sea_orm(string_value = "early_leave")]
    EarlyLeave,

    #[sea_orm(string_value = "excused")]
    Excused,
}

/// Where a record came from.
#[derive(
    Debug, Clone, PartialEq, EnumIter, DeriveActiveEnum, Display, EnumString, Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_source_type")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SourceType {
    #[sea_orm(string_value = "manual")]
    Manual,

    #[sea_orm(string_value = "leave_request")]
    LeaveRequest,

    #[sea_orm(string_value = "roll_call")]
    RollCall,
}

#[derive(
    Debug, Clone, PartialEq, EnumIter, DeriveActiveEnum, Display, EnumString, Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_approval_status")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ApprovalStatus {
    #[sea_orm(string_value = "pending")]
    Pending,

    #[sea_orm(string_value = "approved")]
    Approved,

    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// Structured view of the `details` JSON column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period_ids: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl RecordDetails {
    pub fn encode(&self) -> Result<String, DbErr> {
        serde_json::to_string(self)
            .map_err(|e| DbErr::Custom(format!("Failed to encode record details: {e}")))
    }
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

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
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

/// Everything needed to insert one record; shared by the manual, roll-call
/// and leave-request write paths.
#[derive(Debug, Clone)]
pub struct NewAttendanceRecord {
    pub student_id: i64,
    pub class_id: i64,
    pub date: NaiveDate,
    pub period_id: Option<i64>,
    pub status: Status,
    pub leave_type_id: Option<i64>,
    pub details: Option<RecordDetails>,
    pub source_type: SourceType,
    pub source_id: Option<i64>,
    pub approval_status: Option<ApprovalStatus>,
    pub created_by: i64,
}

impl Model {
    /// Inserts one record on any connection (plain or transactional).
    pub async fn create<C: ConnectionTrait>(
        conn: &C,
        new: NewAttendanceRecord,
    ) -> Result<Model, DbErr> {
        let details = match &new.details {
            Some(d) => Some(d.encode()?),
            None => None,
        };

        ActiveModel {
            student_id: Set(new.student_id),
            class_id: Set(new.class_id),
            date: Set(new.date),
            period_id: Set(new.period_id),
            status: Set(new.status),
            leave_type_id: Set(new.leave_type_id),
            details: Set(details),
            source_type: Set(new.source_type),
            source_id: Set(new.source_id),
            approval_status: Set(new.approval_status),
            created_by: Set(new.created_by),
            ..Default::default()
        }
        .insert(conn)
        .await
    }

    /// Replaces the absent marks of the given students on `date` with one
    /// merged record each, carrying all affected periods in `details`.
    ///
    /// Delete and insert run in a single transaction so a failed insert never
    /// leaves students with their previous marks silently dropped.
    pub async fn replace_absent(
        db: &DatabaseConnection,
        class_id: i64,
        date: NaiveDate,
        student_ids: &[i64],
        period_ids: &[i64],
        created_by: i64,
    ) -> Result<Vec<Model>, DbErr> {
        let txn = db.begin().await?;

        Entity::delete_many()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Date.eq(date))
            .filter(Column::Status.eq(Status::Absent))
            .filter(Column::StudentId.is_in(student_ids.to_vec()))
            .exec(&txn)
            .await?;

        let details = RecordDetails {
            period_ids: Some(period_ids.to_vec()),
            ..Default::default()
        };

        let mut created = Vec::with_capacity(student_ids.len());
        for &student_id in student_ids {
            let record = Model::create(
                &txn,
                NewAttendanceRecord {
                    student_id,
                    class_id,
                    date,
                    period_id: None,
                    status: Status::Absent,
                    leave_type_id: None,
                    details: Some(details.clone()),
                    source_type: SourceType::Manual,
                    source_id: None,
                    approval_status: None,
                    created_by,
                },
            )
            .await?;
            created.push(record);
        }

        txn.commit().await?;
        Ok(created)
    }

    /// All records for a class on a date, newest first.
    pub async fn for_class_on(
        db: &DatabaseConnection,
        class_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Date.eq(date))
            .order_by_desc(Column::CreatedAt)
            .all(db)
            .await
    }

    /// All records for a class in an inclusive date range.
    pub async fn for_class_between(
        db: &DatabaseConnection,
        class_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Date.gte(from))
            .filter(Column::Date.lte(to))
            .order_by_asc(Column::Date)
            .all(db)
            .await
    }

    pub async fn delete_by_id(db: &DatabaseConnection, id: i64) -> Result<bool, DbErr> {
        let res = Entity::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected > 0)
    }

    /// Removes every record derived from the given source, e.g. when a roll
    /// call is cancelled.
    pub async fn delete_by_source<C: ConnectionTrait>(
        conn: &C,
        source_type: SourceType,
        source_id: i64,
    ) -> Result<u64, DbErr> {
        let res = Entity::delete_many()
            .filter(Column::SourceType.eq(source_type))
            .filter(Column::SourceId.eq(source_id))
            .exec(conn)
            .await?;
        Ok(res.rows_affected)
    }

    /// Decoded `details`; malformed or missing payloads read as empty.
    pub fn record_details(&self) -> RecordDetails {
        self.details
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default()
    }
}
