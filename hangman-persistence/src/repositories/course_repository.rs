use anyhow::Result;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::{courses, prelude::*, teacher_course_assignments};

pub struct CourseRepository {
    db: DatabaseConnection,
}

impl CourseRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_course(&self, id: Uuid, name: &str) -> Result<()> {
        let course_model = courses::ActiveModel {
            id: sea_orm::ActiveValue::Set(id),
            name: sea_orm::ActiveValue::Set(name.to_string()),
            created_at: sea_orm::ActiveValue::Set(chrono::Utc::now().into()),
        };

        Courses::insert(course_model).exec(&self.db).await?;
        Ok(())
    }

    pub async fn assign_teacher(&self, teacher_id: Uuid, course_id: Uuid) -> Result<()> {
        let assignment_model = teacher_course_assignments::ActiveModel {
            id: sea_orm::ActiveValue::Set(Uuid::new_v4()),
            teacher_id: sea_orm::ActiveValue::Set(teacher_id),
            course_id: sea_orm::ActiveValue::Set(course_id),
            created_at: sea_orm::ActiveValue::Set(chrono::Utc::now().into()),
        };

        TeacherCourseAssignments::insert(assignment_model)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Existence query behind the course-statistics guard: is this teacher a
    /// teacher of record for the course?
    pub async fn is_teacher_assigned(&self, course_id: Uuid, teacher_id: Uuid) -> Result<bool> {
        let count = TeacherCourseAssignments::find()
            .filter(teacher_course_assignments::Column::CourseId.eq(course_id))
            .filter(teacher_course_assignments::Column::TeacherId.eq(teacher_id))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Courses a teacher is assigned to; feeds the class-average query.
    pub async fn assigned_course_ids(&self, teacher_id: Uuid) -> Result<Vec<Uuid>> {
        let assignments = TeacherCourseAssignments::find()
            .filter(teacher_course_assignments::Column::TeacherId.eq(teacher_id))
            .all(&self.db)
            .await?;

        Ok(assignments.into_iter().map(|a| a.course_id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use migration::{Migrator, MigratorTrait};

    async fn setup_test_db() -> CourseRepository {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        CourseRepository::new(db)
    }

    #[tokio::test]
    async fn test_assignment_existence() {
        let repo = setup_test_db().await;

        let course_id = Uuid::new_v4();
        let teacher_id = Uuid::new_v4();
        repo.create_course(course_id, "Class 1-A").await.unwrap();
        repo.assign_teacher(teacher_id, course_id).await.unwrap();

        assert!(repo
            .is_teacher_assigned(course_id, teacher_id)
            .await
            .unwrap());
        assert!(!repo
            .is_teacher_assigned(course_id, Uuid::new_v4())
            .await
            .unwrap());
        assert!(!repo
            .is_teacher_assigned(Uuid::new_v4(), teacher_id)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_assigned_course_ids() {
        let repo = setup_test_db().await;

        let teacher_id = Uuid::new_v4();
        let course_a = Uuid::new_v4();
        let course_b = Uuid::new_v4();
        repo.create_course(course_a, "Class 1-A").await.unwrap();
        repo.create_course(course_b, "Class 1-B").await.unwrap();
        repo.assign_teacher(teacher_id, course_a).await.unwrap();
        repo.assign_teacher(teacher_id, course_b).await.unwrap();

        let mut courses = repo.assigned_course_ids(teacher_id).await.unwrap();
        courses.sort();
        let mut expected = vec![course_a, course_b];
        expected.sort();
        assert_eq!(courses, expected);

        assert!(repo
            .assigned_course_ids(Uuid::new_v4())
            .await
            .unwrap()
            .is_empty());
    }
}
