use crate::seed::Seeder;
use db::models::{class_period, time_slot};
use sea_orm::DatabaseConnection;

pub struct ScheduleSeeder;

#[async_trait::async_trait]
impl Seeder for ScheduleSeeder {
    async fn seed(&self, db: &DatabaseConnection) {
        let _ = class_period::Model::create(db, "早读", 0).await;
        for i in 1..=8 {
            let _ = class_period::Model::create(db, &format!("第{i}节"), i).await;
        }

        let periods = class_period::Model::all_ordered(db).await.unwrap_or_default();
        let numbered: Vec<i64> = periods
            .iter()
            .filter(|p| p.display_order > 0)
            .map(|p| p.id)
            .collect();
        if numbered.len() == 8 {
            let _ = time_slot::Model::create(db, "上午", &numbered[0..4]).await;
            let _ = time_slot::Model::create(db, "下午", &numbered[4..8]).await;
            let _ = time_slot::Model::create(db, "全天", &numbered).await;
        }
    }
}
