use crate::seed::{Seeder, run_seeder};
use crate::seeds::{
    class_role::ClassRoleSeeder, leave_type::LeaveTypeSeeder, schedule::ScheduleSeeder,
    school_class::SchoolClassSeeder, semester::SemesterSeeder, settings::SettingsSeeder,
    user::UserSeeder,
};

mod seed;
mod seeds;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let db = db::connect().await;

    for (seeder, name) in [
        (Box::new(UserSeeder) as Box<dyn Seeder + Send + Sync>, "User"),
        (Box::new(SchoolClassSeeder), "SchoolClass"),
        (Box::new(ClassRoleSeeder), "ClassRole"),
        (Box::new(ScheduleSeeder), "Schedule"),
        (Box::new(SemesterSeeder), "Semester"),
        (Box::new(LeaveTypeSeeder), "LeaveType"),
        (Box::new(SettingsSeeder), "Settings"),
    ] {
        run_seeder(&*seeder, name, &db).await;
    }
}
