use axum::{
    Extension, Json,
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

use crate::auth::AuthUser;
use crate::auth::guards::can_manage_class;
use crate::response::ApiResponse;
use crate::routes::common::parse_id_list;
use db::models::{
    attendance_record::{self, Status},
    leave_type, roll_call, roll_call_record, school_class,
    user::{Column as UserCol, Entity as UserEntity},
    user_class_role,
};
use util::state::AppState;

use super::common::ScheduleContext;

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// Comma-separated class IDs.
    pub class_ids: String,
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// `all` (default) or `with_records`.
    pub scope: Option<String>,
    /// `summary` (default) or `detail`.
    pub format: Option<String>,
    /// Comma-separated leave-type IDs; empty means all.
    pub leave_type_ids: Option<String>,
    pub include_roll_calls: Option<bool>,
    /// Comma-separated call-type names; empty means all.
    pub roll_call_types: Option<String>,
}

struct ClassExport {
    class: school_class::Model,
    /// (student_id, username), enrollment order.
    students: Vec<(i64, String)>,
    records: Vec<attendance_record::Model>,
}

/// GET `/api/attendance/export`
///
/// Export attendance as an xlsx workbook.
///
/// **Auth**: a teacher of every requested class, or an admin.
///
/// **Query**: see [`ExportQuery`]. The response is a spreadsheet attachment;
/// error responses come back as JSON instead, which callers use to tell the
/// two apart.
pub async fn export_attendance(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Query(q): Query<ExportQuery>,
) -> Response {
    let db = state.db();

    let class_ids = parse_id_list(&q.class_ids);
    if class_ids.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No classes selected");
    }
    for &class_id in &class_ids {
        if !can_manage_class(db, &claims, class_id).await {
            return error_response(StatusCode::FORBIDDEN, "Not a teacher of this class");
        }
    }

    let with_records_only = q.scope.as_deref() == Some("with_records");
    let detail = q.format.as_deref() == Some("detail");
    let selected_leave_types: Vec<i64> = q
        .leave_type_ids
        .as_deref()
        .map(parse_id_list)
        .unwrap_or_default();

    // Gather per-class data up front; any failure aborts with JSON.
    let mut exports = Vec::new();
    for &class_id in &class_ids {
        match load_class_export(db, class_id, q.from, q.to, with_records_only).await {
            Ok(Some(export)) => exports.push(export),
            Ok(None) => return error_response(StatusCode::NOT_FOUND, "Class not found"),
            Err(e) => {
                tracing::error!(error = %e, class_id, "Failed to gather export data");
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error building export",
                );
            }
        }
    }

    let schedule = match ScheduleContext::load(db).await {
        Ok(schedule) => schedule,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load schedule configuration");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error building export",
            );
        }
    };

    let leave_types = leave_type::Model::get_all(db).await.unwrap_or_default();
    let type_names: HashMap<i64, String> =
        leave_types.iter().map(|t| (t.id, t.name.clone())).collect();

    // Roll-call columns: call types merged by display name, so two configured
    // activities sharing a name count into one column.
    let mut roll_call_columns: BTreeMap<String, Vec<i64>> = BTreeMap::new();
    if q.include_roll_calls.unwrap_or(false) {
        let wanted: Vec<String> = q
            .roll_call_types
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        for export in &exports {
            let calls = match roll_call::Model::for_class(db, export.class.id, None).await {
                Ok(calls) => calls,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to load roll calls for export");
                    return error_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Database error building export",
                    );
                }
            };
            for call in calls {
                if call.date < q.from || call.date > q.to {
                    continue;
                }
                if call.status != roll_call::Status::Completed {
                    continue;
                }
                if !wanted.is_empty() && !wanted.contains(&call.call_type) {
                    continue;
                }
                roll_call_columns
                    .entry(call.call_type.clone())
                    .or_default()
                    .push(call.id);
            }
        }
    }

    let built = if detail {
        build_detail_workbook(&exports, &schedule, &type_names)
    } else {
        build_summary_workbook(db, &exports, &selected_leave_types, &leave_types, &roll_call_columns)
            .await
    };

    let buffer = match built {
        Ok(buffer) => buffer,
        Err(e) => {
            tracing::error!(error = %e, "Failed to assemble workbook");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate spreadsheet",
            );
        }
    };

    let filename = format!("attendance_{}_{}.xlsx", q.from, q.to);
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        ),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", filename))
            .unwrap_or(HeaderValue::from_static("attachment")),
    );

    (StatusCode::OK, headers, buffer).into_response()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ApiResponse::<()>::error(message.to_string())),
    )
        .into_response()
}

async fn load_class_export(
    db: &sea_orm::DatabaseConnection,
    class_id: i64,
    from: NaiveDate,
    to: NaiveDate,
    with_records_only: bool,
) -> Result<Option<ClassExport>, sea_orm::DbErr> {
    let Some(class) = school_class::Model::get_by_id(db, class_id).await? else {
        return Ok(None);
    };

    let student_ids = user_class_role::Model::students_of_class(db, class_id).await?;
    let users = UserEntity::find()
        .filter(UserCol::Id.is_in(student_ids.clone()))
        .all(db)
        .await?;
    let username_map: HashMap<i64, String> =
        users.into_iter().map(|u| (u.id, u.username)).collect();

    let records = attendance_record::Model::for_class_between(db, class_id, from, to).await?;

    let mut students: Vec<(i64, String)> = student_ids
        .into_iter()
        .map(|id| {
            let name = username_map.get(&id).cloned().unwrap_or_default();
            (id, name)
        })
        .collect();
    if with_records_only {
        students.retain(|(id, _)| records.iter().any(|r| r.student_id == *id));
    }

    Ok(Some(ClassExport {
        class,
        students,
        records,
    }))
}

/// One row per record: class, student, date, status, leave type, periods, note.
fn build_detail_workbook(
    exports: &[ClassExport],
    schedule: &ScheduleContext,
    type_names: &HashMap<i64, String>,
) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header_fmt = Format::new().set_bold();

    let ws = workbook.add_worksheet();
    ws.set_name("考勤明细")?;

    for (col, title) in ["班级", "学号", "日期", "状态", "请假类型", "节次", "备注"]
        .iter()
        .enumerate()
    {
        ws.write_string_with_format(0, col as u16, *title, &header_fmt)?;
    }

    let mut row = 1u32;
    for export in exports {
        let usernames: HashMap<i64, &str> = export
            .students
            .iter()
            .map(|(id, name)| (*id, name.as_str()))
            .collect();
        for record in &export.records {
            let Some(username) = usernames.get(&record.student_id) else {
                // Student filtered out by scope; their records go with them.
                continue;
            };
            let details = record.record_details();
            let note = details.text.or(details.time).unwrap_or_default();
            let type_name = record
                .leave_type_id
                .and_then(|id| type_names.get(&id).cloned())
                .unwrap_or_default();

            ws.write_string(row, 0, &export.class.name)?;
            ws.write_string(row, 1, *username)?;
            ws.write_string(row, 2, record.date.to_string())?;
            ws.write_string(row, 3, record.status.to_string())?;
            ws.write_string(row, 4, type_name)?;
            ws.write_string(row, 5, schedule.label_for(record))?;
            ws.write_string(row, 6, note)?;
            row += 1;
        }
    }

    workbook.save_to_buffer()
}

/// One row per student with per-status counts, per-leave-type counts, and
/// optional roll-call absence columns.
async fn build_summary_workbook(
    db: &sea_orm::DatabaseConnection,
    exports: &[ClassExport],
    selected_leave_types: &[i64],
    leave_types: &[leave_type::Model],
    roll_call_columns: &BTreeMap<String, Vec<i64>>,
) -> Result<Vec<u8>, XlsxError> {
    let statuses = [
        Status::Present,
        Status::Absent,
        Status::Late,
        Status::Leave,
        Status::EarlyLeave,
        Status::Excused,
    ];
    let exported_types: Vec<&leave_type::Model> = leave_types
        .iter()
        .filter(|t| selected_leave_types.is_empty() || selected_leave_types.contains(&t.id))
        .collect();

    // Roll-call absences per (call type name, student), merged across classes.
    let mut roll_call_absences: HashMap<(String, i64), i64> = HashMap::new();
    for (name, call_ids) in roll_call_columns {
        for &call_id in call_ids {
            let records = roll_call_record::Model::for_roll_call(db, call_id)
                .await
                .unwrap_or_default();
            for record in records {
                if record.status == roll_call_record::Status::Absent {
                    *roll_call_absences
                        .entry((name.clone(), record.student_id))
                        .or_insert(0) += 1;
                }
            }
        }
    }

    let mut workbook = Workbook::new();
    let header_fmt = Format::new().set_bold();

    let ws = workbook.add_worksheet();
    ws.set_name("考勤汇总")?;

    let mut col = 0u16;
    for title in ["班级", "学号"] {
        ws.write_string_with_format(0, col, title, &header_fmt)?;
        col += 1;
    }
    for status in &statuses {
        ws.write_string_with_format(0, col, status.to_string(), &header_fmt)?;
        col += 1;
    }
    for leave_type in &exported_types {
        ws.write_string_with_format(0, col, &leave_type.name, &header_fmt)?;
        col += 1;
    }
    for name in roll_call_columns.keys() {
        ws.write_string_with_format(0, col, format!("{name}缺勤"), &header_fmt)?;
        col += 1;
    }

    let mut row = 1u32;
    for export in exports {
        for (student_id, username) in &export.students {
            let records: Vec<&attendance_record::Model> = export
                .records
                .iter()
                .filter(|r| r.student_id == *student_id)
                .collect();

            let mut col = 0u16;
            ws.write_string(row, col, &export.class.name)?;
            col += 1;
            ws.write_string(row, col, username)?;
            col += 1;
            for status in &statuses {
                let count = records.iter().filter(|r| r.status == *status).count();
                ws.write_number(row, col, count as f64)?;
                col += 1;
            }
            for leave_type in &exported_types {
                let count = records
                    .iter()
                    .filter(|r| r.leave_type_id == Some(leave_type.id))
                    .count();
                ws.write_number(row, col, count as f64)?;
                col += 1;
            }
            for name in roll_call_columns.keys() {
                let count = roll_call_absences
                    .get(&(name.clone(), *student_id))
                    .copied()
                    .unwrap_or(0);
                ws.write_number(row, col, count as f64)?;
                col += 1;
            }
            row += 1;
        }
    }

    workbook.save_to_buffer()
}
