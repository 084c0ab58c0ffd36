use sea_orm::{DatabaseConnection, DbErr};
use serde::Serialize;
use serde_json::Value;

use db::models::{attendance_record, class_period, time_slot};
use util::periods::{Period, TimeSlot, selection_label};

/// One attendance record as returned to clients, with the period selection
/// already composed into a display label.
#[derive(Debug, Serialize)]
pub struct AttendanceRecordResponse {
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub date: String,
    pub period_id: Option<i64>,
    pub status: String,
    pub leave_type_id: Option<i64>,
    pub details: Value,
    pub source_type: String,
    pub source_id: Option<i64>,
    pub approval_status: Option<String>,
    pub period_label: String,
    pub created_at: String,
    pub updated_at: String,
}

/// The configured periods and time-slot presets, loaded once per request.
pub struct ScheduleContext {
    pub periods: Vec<Period>,
    pub slots: Vec<TimeSlot>,
}

impl ScheduleContext {
    pub async fn load(db: &DatabaseConnection) -> Result<Self, DbErr> {
        let periods = class_period::Model::all_ordered(db)
            .await?
            .iter()
            .map(Period::from)
            .collect();
        let slots = time_slot::Model::get_all(db)
            .await?
            .iter()
            .map(TimeSlot::from)
            .collect();
        Ok(Self { periods, slots })
    }

    /// Label for one record: explicit multi-period selections come from
    /// `details.period_ids`, single-period records from `period_id`, and
    /// records with neither cover the whole day.
    pub fn label_for(&self, record: &attendance_record::Model) -> String {
        let details = record.record_details();
        let selection: Vec<i64> = match (&details.period_ids, record.period_id) {
            (Some(ids), _) => ids.clone(),
            (None, Some(period_id)) => vec![period_id],
            (None, None) => Vec::new(),
        };
        selection_label(&selection, &self.periods, &self.slots)
    }

    pub fn response_for(&self, record: &attendance_record::Model) -> AttendanceRecordResponse {
        AttendanceRecordResponse {
            id: record.id,
            student_id: record.student_id,
            class_id: record.class_id,
            date: record.date.to_string(),
            period_id: record.period_id,
            status: record.status.to_string(),
            leave_type_id: record.leave_type_id,
            details: record
                .details
                .as_deref()
                .and_then(|raw| serde_json::from_str(raw).ok())
                .unwrap_or(Value::Null),
            source_type: record.source_type.to_string(),
            source_id: record.source_id,
            approval_status: record.approval_status.as_ref().map(|s| s.to_string()),
            period_label: self.label_for(record),
            created_at: record.created_at.to_rfc3339(),
            updated_at: record.updated_at.to_rfc3339(),
        }
    }
}
