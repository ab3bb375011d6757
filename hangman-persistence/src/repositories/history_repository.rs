use anyhow::Result;
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::entities::{game_histories, prelude::*, teacher_course_assignments, users};
use hangman_core::HistoryRecord;

/// Append-only log of terminal games, plus the role-scoped read interface
/// the history and statistics layers consume.
pub struct HistoryRepository {
    db: DatabaseConnection,
}

impl HistoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_record(model: game_histories::Model) -> HistoryRecord {
        HistoryRecord {
            id: model.id,
            student_id: model.student_id,
            word_id: model.word_id,
            word: model.word,
            category: model.category,
            success: model.is_success,
            wrong_attempts: model.attempts,
            wrong_letters: model.wrong_letters,
            played_at: model.played_at.with_timezone(&Utc),
        }
    }

    /// Called exactly once per terminal session.
    pub async fn append(&self, record: &HistoryRecord) -> Result<()> {
        let history_model = game_histories::ActiveModel {
            id: sea_orm::ActiveValue::Set(record.id),
            student_id: sea_orm::ActiveValue::Set(record.student_id),
            word_id: sea_orm::ActiveValue::Set(record.word_id),
            word: sea_orm::ActiveValue::Set(record.word.clone()),
            category: sea_orm::ActiveValue::Set(record.category.clone()),
            is_success: sea_orm::ActiveValue::Set(record.success),
            attempts: sea_orm::ActiveValue::Set(record.wrong_attempts),
            wrong_letters: sea_orm::ActiveValue::Set(record.wrong_letters.clone()),
            played_at: sea_orm::ActiveValue::Set(record.played_at.into()),
        };

        GameHistories::insert(history_model).exec(&self.db).await?;
        Ok(())
    }

    pub async fn find_all(&self) -> Result<Vec<HistoryRecord>> {
        let models = GameHistories::find()
            .order_by_asc(game_histories::Column::PlayedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Self::model_to_record).collect())
    }

    pub async fn find_by_student(&self, student_id: Uuid) -> Result<Vec<HistoryRecord>> {
        let models = GameHistories::find()
            .filter(game_histories::Column::StudentId.eq(student_id))
            .order_by_asc(game_histories::Column::PlayedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Self::model_to_record).collect())
    }

    /// Records of every student assigned to the teacher (via the student's
    /// recorded teacher, not course assignments).
    pub async fn find_by_teacher_students(&self, teacher_id: Uuid) -> Result<Vec<HistoryRecord>> {
        let student_ids = self
            .student_ids_where(users::Column::TeacherId.eq(teacher_id))
            .await?;
        self.find_by_students(student_ids).await
    }

    /// Records of every student enrolled in the course.
    pub async fn find_by_course(&self, course_id: Uuid) -> Result<Vec<HistoryRecord>> {
        let student_ids = self
            .student_ids_where(users::Column::CourseId.eq(course_id))
            .await?;
        self.find_by_students(student_ids).await
    }

    /// Half-open range on the completion timestamp: [start, end).
    pub async fn find_by_student_between(
        &self,
        student_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<HistoryRecord>> {
        let models = GameHistories::find()
            .filter(game_histories::Column::StudentId.eq(student_id))
            .filter(game_histories::Column::PlayedAt.gte(start))
            .filter(game_histories::Column::PlayedAt.lt(end))
            .order_by_asc(game_histories::Column::PlayedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Self::model_to_record).collect())
    }

    /// Average success rate across all students of the teacher's assigned
    /// courses. `None` when the teacher has no assignments or the students
    /// have no recorded games; the caller must not divide by that absence.
    pub async fn average_success_for_teacher(&self, teacher_id: Uuid) -> Result<Option<f64>> {
        let assignments = TeacherCourseAssignments::find()
            .filter(teacher_course_assignments::Column::TeacherId.eq(teacher_id))
            .all(&self.db)
            .await?;

        let course_ids: Vec<Uuid> = assignments.into_iter().map(|a| a.course_id).collect();
        if course_ids.is_empty() {
            return Ok(None);
        }

        let student_ids = self
            .student_ids_where(users::Column::CourseId.is_in(course_ids))
            .await?;
        let records = self.find_by_students(student_ids).await?;
        if records.is_empty() {
            return Ok(None);
        }

        let successes = records.iter().filter(|r| r.success).count();
        Ok(Some(successes as f64 / records.len() as f64))
    }

    async fn student_ids_where(
        &self,
        condition: sea_orm::sea_query::SimpleExpr,
    ) -> Result<Vec<Uuid>> {
        let students = Users::find().filter(condition).all(&self.db).await?;
        Ok(students.into_iter().map(|u| u.id).collect())
    }

    async fn find_by_students(&self, student_ids: Vec<Uuid>) -> Result<Vec<HistoryRecord>> {
        if student_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = GameHistories::find()
            .filter(game_histories::Column::StudentId.is_in(student_ids))
            .order_by_asc(game_histories::Column::PlayedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Self::model_to_record).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use crate::repositories::{CourseRepository, UserRepository};
    use chrono::TimeZone;
    use hangman_types::{Role, User};
    use migration::{Migrator, MigratorTrait};

    async fn setup_test_db() -> (HistoryRepository, UserRepository, CourseRepository) {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        (
            HistoryRepository::new(db.clone()),
            UserRepository::new(db.clone()),
            CourseRepository::new(db),
        )
    }

    fn student(course_id: Uuid, teacher_id: Uuid) -> User {
        User {
            id: Uuid::new_v4(),
            username: format!("student-{}", Uuid::new_v4()),
            role: Role::Student,
            course_id: Some(course_id),
            teacher_id: Some(teacher_id),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// A record completed on the given March 2024 day and hour.
    fn record_at(student_id: Uuid, word: &str, success: bool, day: u32, hour: u32) -> HistoryRecord {
        HistoryRecord {
            id: Uuid::new_v4(),
            student_id,
            word_id: Uuid::new_v4(),
            word: word.to_string(),
            category: "animals".to_string(),
            success,
            wrong_attempts: if success { 0 } else { 3 },
            wrong_letters: if success {
                String::new()
            } else {
                "X,Y,Z".to_string()
            },
            played_at: chrono::Utc
                .with_ymd_and_hms(2024, 3, day, hour, 0, 0)
                .unwrap(),
        }
    }

    #[tokio::test]
    async fn test_append_and_find_by_student() {
        let (history, users, _) = setup_test_db().await;

        let alice = student(Uuid::new_v4(), Uuid::new_v4());
        users.create_user(alice.clone()).await.unwrap();

        history
            .append(&record_at(alice.id, "CAT", true, 15, 9))
            .await
            .unwrap();
        history
            .append(&record_at(alice.id, "DOG", false, 16, 10))
            .await
            .unwrap();
        history
            .append(&record_at(Uuid::new_v4(), "OWL", true, 15, 9))
            .await
            .unwrap();

        let records = history.find_by_student(alice.id).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].word, "CAT");
        assert_eq!(records[1].word, "DOG");
        assert_eq!(records[1].wrong_letters, "X,Y,Z");

        assert_eq!(history.find_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_find_by_teacher_students_and_course() {
        let (history, users, _) = setup_test_db().await;

        let course = Uuid::new_v4();
        let teacher = Uuid::new_v4();
        let alice = student(course, teacher);
        let bob = student(course, teacher);
        let other = student(Uuid::new_v4(), Uuid::new_v4());
        for user in [&alice, &bob, &other] {
            users.create_user(user.clone()).await.unwrap();
        }

        history
            .append(&record_at(alice.id, "CAT", true, 15, 9))
            .await
            .unwrap();
        history
            .append(&record_at(bob.id, "DOG", false, 15, 10))
            .await
            .unwrap();
        history
            .append(&record_at(other.id, "OWL", true, 15, 11))
            .await
            .unwrap();

        let by_teacher = history.find_by_teacher_students(teacher).await.unwrap();
        assert_eq!(by_teacher.len(), 2);

        let by_course = history.find_by_course(course).await.unwrap();
        assert_eq!(by_course.len(), 2);

        assert!(history
            .find_by_teacher_students(Uuid::new_v4())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_date_range_is_half_open() {
        let (history, users, _) = setup_test_db().await;

        let alice = student(Uuid::new_v4(), Uuid::new_v4());
        users.create_user(alice.clone()).await.unwrap();

        history
            .append(&record_at(alice.id, "CAT", true, 14, 23))
            .await
            .unwrap();
        history
            .append(&record_at(alice.id, "DOG", true, 15, 0))
            .await
            .unwrap();
        history
            .append(&record_at(alice.id, "OWL", true, 16, 0))
            .await
            .unwrap();

        let start = chrono::Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
        let end = chrono::Utc.with_ymd_and_hms(2024, 3, 16, 0, 0, 0).unwrap();

        let records = history
            .find_by_student_between(alice.id, start, end)
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].word, "DOG");
    }

    #[tokio::test]
    async fn test_average_success_for_teacher() {
        let (history, users, courses) = setup_test_db().await;

        let course = Uuid::new_v4();
        let teacher = Uuid::new_v4();
        courses.create_course(course, "Class 1-A").await.unwrap();
        courses.assign_teacher(teacher, course).await.unwrap();

        let alice = student(course, teacher);
        let bob = student(course, teacher);
        users.create_user(alice.clone()).await.unwrap();
        users.create_user(bob.clone()).await.unwrap();

        history
            .append(&record_at(alice.id, "CAT", true, 15, 9))
            .await
            .unwrap();
        history
            .append(&record_at(alice.id, "DOG", true, 15, 10))
            .await
            .unwrap();
        history
            .append(&record_at(bob.id, "OWL", false, 15, 11))
            .await
            .unwrap();
        history
            .append(&record_at(bob.id, "FOX", false, 15, 12))
            .await
            .unwrap();

        let average = history.average_success_for_teacher(teacher).await.unwrap();
        assert_eq!(average, Some(0.5));
    }

    #[tokio::test]
    async fn test_average_success_none_without_assignments_or_games() {
        let (history, users, courses) = setup_test_db().await;

        // No assignment rows at all.
        assert_eq!(
            history
                .average_success_for_teacher(Uuid::new_v4())
                .await
                .unwrap(),
            None
        );

        // Assigned course, but no student has played yet.
        let course = Uuid::new_v4();
        let teacher = Uuid::new_v4();
        courses.create_course(course, "Class 1-B").await.unwrap();
        courses.assign_teacher(teacher, course).await.unwrap();
        users.create_user(student(course, teacher)).await.unwrap();

        assert_eq!(
            history.average_success_for_teacher(teacher).await.unwrap(),
            None
        );
    }
}
