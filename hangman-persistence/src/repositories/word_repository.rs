use anyhow::{Result, anyhow};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::{prelude::*, words};
use hangman_core::WordScope;
use hangman_types::Word;

/// Read side of the word catalog. Words are owned by a teacher within a
/// course; game starts draw from one of three scopes.
pub struct WordRepository {
    db: DatabaseConnection,
}

impl WordRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_word(model: words::Model) -> Word {
        Word {
            id: model.id,
            text: model.word,
            category: model.category,
            difficulty: model.difficulty,
            course_id: model.course_id,
            teacher_id: model.teacher_id,
        }
    }

    pub async fn find_by_teacher(&self, teacher_id: Uuid) -> Result<Vec<Word>> {
        let models = Words::find()
            .filter(words::Column::TeacherId.eq(teacher_id))
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Self::model_to_word).collect())
    }

    pub async fn find_by_course(&self, course_id: Uuid) -> Result<Vec<Word>> {
        let models = Words::find()
            .filter(words::Column::CourseId.eq(course_id))
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Self::model_to_word).collect())
    }

    pub async fn find_by_course_and_teacher(
        &self,
        course_id: Uuid,
        teacher_id: Uuid,
    ) -> Result<Vec<Word>> {
        let models = Words::find()
            .filter(words::Column::CourseId.eq(course_id))
            .filter(words::Column::TeacherId.eq(teacher_id))
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Self::model_to_word).collect())
    }

    pub async fn find_in_scope(&self, scope: WordScope) -> Result<Vec<Word>> {
        match scope {
            WordScope::Teacher(teacher_id) => self.find_by_teacher(teacher_id).await,
            WordScope::Course(course_id) => self.find_by_course(course_id).await,
            WordScope::CourseAndTeacher {
                course_id,
                teacher_id,
            } => self.find_by_course_and_teacher(course_id, teacher_id).await,
        }
    }

    pub async fn create_word(&self, word: Word) -> Result<Word> {
        let word_model = words::ActiveModel {
            id: sea_orm::ActiveValue::Set(word.id),
            word: sea_orm::ActiveValue::Set(word.text),
            category: sea_orm::ActiveValue::Set(word.category),
            difficulty: sea_orm::ActiveValue::Set(word.difficulty),
            course_id: sea_orm::ActiveValue::Set(word.course_id),
            teacher_id: sea_orm::ActiveValue::Set(word.teacher_id),
            created_at: sea_orm::ActiveValue::Set(chrono::Utc::now().into()),
        };

        let saved_model = Words::insert(word_model).exec(&self.db).await?;

        let created = Words::find_by_id(saved_model.last_insert_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| anyhow!("Failed to retrieve created word"))?;

        Ok(Self::model_to_word(created))
    }
}
