use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202602010001_create_users::Migration),
            Box::new(migrations::m202602010002_create_school_classes::Migration),
            Box::new(migrations::m202602010003_create_user_class_roles::Migration),
            Box::new(migrations::m202602010004_create_schedule::Migration),
            Box::new(migrations::m202602010005_create_semesters::Migration),
            Box::new(migrations::m202602010006_create_leave_types::Migration),
            Box::new(migrations::m202602010007_create_attendance_records::Migration),
            Box::new(migrations::m202602010008_create_leave_requests::Migration),
            Box::new(migrations::m202602010009_create_roll_calls::Migration),
            Box::new(migrations::m202602010010_create_settings::Migration),
        ]
    }
}
