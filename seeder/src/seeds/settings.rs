use crate::seed::Seeder;
use db::models::setting::Model;
use sea_orm::DatabaseConnection;

pub struct SettingsSeeder;

#[async_trait::async_trait]
impl Seeder for SettingsSeeder {
    async fn seed(&self, db: &DatabaseConnection) {
        let _ = Model::set(db, "late_default_period", "1").await;
        let _ = Model::set(db, "early_leave_default_period", "8").await;
        let _ = Model::set(db, "attendance_periods", "[1,2,3,4,5,6,7,8]").await;
    }
}
