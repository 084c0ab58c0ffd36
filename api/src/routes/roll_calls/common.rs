use serde::Serialize;

use db::models::{roll_call, roll_call_record};

#[derive(Debug, Serialize, Default)]
pub struct RollCallCounts {
    pub pending: u64,
    pub present: u64,
    pub absent: u64,
    pub on_leave: u64,
}

#[derive(Debug, Serialize, Default)]
pub struct RollCallResponse {
    pub id: i64,
    pub class_id: i64,
    pub call_type: String,
    pub date: String,
    pub status: String,
    pub created_by: i64,
    pub created_at: String,
    pub updated_at: String,
    pub counts: RollCallCounts,
}

impl RollCallResponse {
    pub fn from_with_counts(m: roll_call::Model, counts: (u64, u64, u64, u64)) -> Self {
        Self {
            id: m.id,
            class_id: m.class_id,
            call_type: m.call_type,
            date: m.date.to_string(),
            status: m.status.to_string(),
            created_by: m.created_by,
            created_at: m.created_at.to_rfc3339(),
            updated_at: m.updated_at.to_rfc3339(),
            counts: RollCallCounts {
                pending: counts.0,
                present: counts.1,
                absent: counts.2,
                on_leave: counts.3,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RollCallRecordResponse {
    pub student_id: i64,
    pub username: Option<String>,
    pub status: String,
    pub marked_at: Option<String>,
}

impl RollCallRecordResponse {
    pub fn new(m: roll_call_record::Model, username: Option<String>) -> Self {
        Self {
            student_id: m.student_id,
            username,
            status: m.status.to_string(),
            marked_at: m.marked_at.map(|t| t.to_rfc3339()),
        }
    }
}
