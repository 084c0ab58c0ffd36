use crate::seed::Seeder;
use db::models::{
    school_class,
    user::{Column as UserCol, Entity as UserEntity},
    user_class_role::{Model, Role},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

pub struct ClassRoleSeeder;

#[async_trait::async_trait]
impl Seeder for ClassRoleSeeder {
    async fn seed(&self, db: &DatabaseConnection) {
        let classes = school_class::Model::get_all(db).await.unwrap_or_default();
        if classes.is_empty() {
            return;
        }

        // The fixed teacher runs the first class.
        if let Ok(Some(teacher)) = UserEntity::find()
            .filter(UserCol::Username.eq("t0001"))
            .one(db)
        .await
        {
            let _ = Model::assign_user_to_class(db, teacher.id, classes[0].id, Role::Teacher).await;
        }

        // Spread the seeded students across the classes.
        let students = UserEntity::find()
            .filter(UserCol::Username.starts_with("s"))
            .filter(UserCol::Admin.eq(false))
            .all(db)
            .await
            .unwrap_or_default();
        for (i, student) in students.into_iter().enumerate() {
            let class = &classes[i % classes.len()];
            let _ = Model::assign_user_to_class(db, student.id, class.id, Role::Student).await;
        }
    }
}
