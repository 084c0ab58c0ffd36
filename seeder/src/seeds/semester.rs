use crate::seed::Seeder;
use chrono::NaiveDate;
use db::models::semester::Model;
use sea_orm::DatabaseConnection;

pub struct SemesterSeeder;

#[async_trait::async_trait]
impl Seeder for SemesterSeeder {
    async fn seed(&self, db: &DatabaseConnection) {
        let start = NaiveDate::from_ymd_opt(2025, 9, 1).expect("valid date");
        let holidays = vec![
            "2025-10-01".to_string(),
            "2025-10-02".to_string(),
            "2025-10-03".to_string(),
        ];
        let _ = Model::create(db, "2025秋季学期", start, 20, &holidays, true).await;
    }
}
