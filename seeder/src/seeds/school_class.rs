use crate::seed::Seeder;
use db::models::school_class::Model;
use sea_orm::DatabaseConnection;

pub struct SchoolClassSeeder;

#[async_trait::async_trait]
impl Seeder for SchoolClassSeeder {
    async fn seed(&self, db: &DatabaseConnection) {
        for grade in ["高一", "高二", "高三"] {
            for class_no in 1..=3 {
                let name = format!("{grade}({class_no})班");
                let _ = Model::create(db, &name, grade).await;
            }
        }
    }
}
