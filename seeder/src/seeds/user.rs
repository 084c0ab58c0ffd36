use crate::seed::Seeder;
use db::models::user::Model;
use fake::{Fake, faker::internet::en::SafeEmail};
use sea_orm::DatabaseConnection;

pub struct UserSeeder;

#[async_trait::async_trait]
impl Seeder for UserSeeder {
    async fn seed(&self, db: &DatabaseConnection) {
        // Fixed admin user
        let _ = Model::create(db, "admin", "admin@example.com", "password123", true).await;

        // Fixed homeroom teacher
        let _ = Model::create(db, "t0001", "teacher@example.com", "password123", false).await;

        // Random students
        for _ in 0..20 {
            let username = format!("s{:08}", fastrand::u32(..100_000_000));
            let email: String = SafeEmail().fake();
            let _ = Model::create(db, &username, &email, "password123", false).await;
        }
    }
}
