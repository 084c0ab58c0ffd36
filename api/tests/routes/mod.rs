pub mod attendance_test;
pub mod auth_test;
pub mod export_test;
pub mod health_test;
pub mod leave_requests_test;
pub mod leave_types_test;
pub mod roll_calls_test;
pub mod schedule_test;
pub mod semesters_test;
pub mod users_test;
