use serde::Serialize;
use serde_json::Value;

use db::models::{
    attendance_record::RecordDetails,
    leave_request,
    leave_type::{self, InputType},
};

#[derive(Debug, Serialize, Default)]
pub struct LeaveRequestResponse {
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub leave_type_id: i64,
    pub status: String,
    pub reason: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub details: Value,
    pub images: Vec<String>,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<leave_request::Model> for LeaveRequestResponse {
    fn from(m: leave_request::Model) -> Self {
        let images = m.image_list();
        Self {
            id: m.id,
            student_id: m.student_id,
            class_id: m.class_id,
            leave_type_id: m.leave_type_id,
            status: m.status.to_string(),
            reason: m.reason,
            start_date: m.start_date.to_string(),
            end_date: m.end_date.to_string(),
            details: m
                .details
                .as_deref()
                .and_then(|raw| serde_json::from_str(raw).ok())
                .unwrap_or(Value::Null),
            images,
            reviewed_by: m.reviewed_by,
            reviewed_at: m.reviewed_at.map(|t| t.to_rfc3339()),
            created_at: m.created_at.to_rfc3339(),
            updated_at: m.updated_at.to_rfc3339(),
        }
    }
}

/// Checks a submission's input payload against the leave type's input schema.
///
/// Returns a user-facing message when a required sub-input is missing or the
/// chosen option key is not allowed by the type's `input_config`.
pub fn validate_input(
    leave_type: &leave_type::Model,
    details: Option<&RecordDetails>,
) -> Result<(), String> {
    match leave_type.input_type {
        InputType::None => Ok(()),
        InputType::Time => {
            let has_time = details.and_then(|d| d.time.as_deref()).is_some_and(|t| !t.is_empty());
            has_time
                .then_some(())
                .ok_or_else(|| "This leave type requires a time".to_string())
        }
        InputType::PeriodSelect => {
            let has_periods = details
                .and_then(|d| d.period_ids.as_ref())
                .is_some_and(|ids| !ids.is_empty());
            has_periods
                .then_some(())
                .ok_or_else(|| "This leave type requires a period selection".to_string())
        }
        InputType::DurationSelect => {
            let Some(option) = details.and_then(|d| d.option.as_deref()).filter(|o| !o.is_empty())
            else {
                return Err("This leave type requires a duration option".to_string());
            };
            if let Some(allowed) = allowed_options(leave_type) {
                if !allowed.iter().any(|key| key == option) {
                    return Err(format!("'{option}' is not a valid duration option"));
                }
            }
            Ok(())
        }
        InputType::Text => {
            let has_text = details.and_then(|d| d.text.as_deref()).is_some_and(|t| !t.is_empty());
            has_text
                .then_some(())
                .ok_or_else(|| "This leave type requires a description".to_string())
        }
    }
}

/// Allowed option keys from the type's `input_config`, when configured.
fn allowed_options(leave_type: &leave_type::Model) -> Option<Vec<String>> {
    let config: Value = serde_json::from_str(leave_type.input_config.as_deref()?).ok()?;
    let options = config.get("options")?.as_array()?;
    Some(
        options
            .iter()
            .filter_map(|v| v.as_str().map(|s| s.to_string()))
            .collect(),
    )
}
