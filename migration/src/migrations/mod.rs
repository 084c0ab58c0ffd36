pub mod m202602010001_create_users;
pub mod m202602010002_create_school_classes;
pub mod m202602010003_create_user_class_roles;
pub mod m202602010004_create_schedule;
pub mod m202602010005_create_semesters;
pub mod m202602010006_create_leave_types;
pub mod m202602010007_create_attendance_records;
pub mod m202602010008_create_leave_requests;
pub mod m202602010009_create_roll_calls;
pub mod m202602010010_create_settings;
