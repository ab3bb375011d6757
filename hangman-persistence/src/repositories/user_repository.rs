use anyhow::{Result, anyhow};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::{prelude::*, users};
use hangman_types::{Role, User};

pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_user(model: users::Model) -> Result<User> {
        let role = Role::parse(&model.role)
            .ok_or_else(|| anyhow!("Unknown role in user row: {}", model.role))?;

        Ok(User {
            id: model.id,
            username: model.username,
            role,
            course_id: model.course_id,
            teacher_id: model.teacher_id,
            created_at: model.created_at.to_rfc3339(),
        })
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user_model = Users::find_by_id(id).one(&self.db).await?;
        user_model.map(Self::model_to_user).transpose()
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user_model = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        user_model.map(Self::model_to_user).transpose()
    }

    pub async fn create_user(&self, user: User) -> Result<User> {
        let created_at = chrono::DateTime::parse_from_rfc3339(&user.created_at)
            .unwrap_or_else(|_| chrono::Utc::now().into());

        let user_model = users::ActiveModel {
            id: sea_orm::ActiveValue::Set(user.id),
            username: sea_orm::ActiveValue::Set(user.username),
            role: sea_orm::ActiveValue::Set(user.role.as_str().to_string()),
            course_id: sea_orm::ActiveValue::Set(user.course_id),
            teacher_id: sea_orm::ActiveValue::Set(user.teacher_id),
            created_at: sea_orm::ActiveValue::Set(created_at),
        };

        let saved_model = Users::insert(user_model).exec(&self.db).await?;

        let created_user = Users::find_by_id(saved_model.last_insert_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| anyhow!("Failed to retrieve created user"))?;

        Self::model_to_user(created_user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use migration::{Migrator, MigratorTrait};

    async fn setup_test_db() -> UserRepository {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        UserRepository::new(db)
    }

    fn test_user(username: &str, role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            role,
            course_id: None,
            teacher_id: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let repo = setup_test_db().await;

        let user = test_user("ms-estelle", Role::Teacher);
        let user_id = user.id;

        let created = repo.create_user(user).await.unwrap();
        assert_eq!(created.username, "ms-estelle");
        assert_eq!(created.role, Role::Teacher);

        let found = repo.find_by_id(user_id).await.unwrap().unwrap();
        assert_eq!(found.username, "ms-estelle");

        let found = repo.find_by_username("ms-estelle").await.unwrap().unwrap();
        assert_eq!(found.id, user_id);
    }

    #[tokio::test]
    async fn test_student_keeps_course_and_teacher() {
        let repo = setup_test_db().await;

        let course_id = Uuid::new_v4();
        let teacher_id = Uuid::new_v4();
        let mut user = test_user("sunny", Role::Student);
        user.course_id = Some(course_id);
        user.teacher_id = Some(teacher_id);

        repo.create_user(user).await.unwrap();

        let found = repo.find_by_username("sunny").await.unwrap().unwrap();
        assert_eq!(found.course_id, Some(course_id));
        assert_eq!(found.teacher_id, Some(teacher_id));
    }

    #[tokio::test]
    async fn test_find_missing_user() {
        let repo = setup_test_db().await;
        assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
        assert!(repo.find_by_username("nobody").await.unwrap().is_none());
    }
}
