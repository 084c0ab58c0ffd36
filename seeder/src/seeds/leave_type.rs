use crate::seed::Seeder;
use db::models::leave_type::{InputType, Model};
use sea_orm::DatabaseConnection;

pub struct LeaveTypeSeeder;

#[async_trait::async_trait]
impl Seeder for LeaveTypeSeeder {
    async fn seed(&self, db: &DatabaseConnection) {
        let _ = Model::create(db, "病假", "sick", InputType::Time, None).await;
        let _ = Model::create(db, "事假", "personal", InputType::PeriodSelect, None).await;
        let _ = Model::create(
            db,
            "校活动",
            "school_activity",
            InputType::DurationSelect,
            Some(r#"{"options": ["morning", "afternoon", "full_day"]}"#),
        )
        .await;
        let _ = Model::create(db, "其他", "other", InputType::Text, None).await;
    }
}
