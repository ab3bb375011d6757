use std::sync::Arc;

use uuid::Uuid;

use hangman_core::{
    HistoryScope, WinLossSource, authorize_course_statistics_access, build_snapshot,
};
use hangman_persistence::repositories::{CourseRepository, HistoryRepository};
use hangman_types::{GameError, Role, StatisticsSnapshot, User};

use crate::game_service::records_for_scope;

/// Assembles statistics snapshots: fetches the role-scoped record slice and
/// picks the win/loss source before handing off to the pure aggregator.
pub struct StatisticsService {
    history: Arc<HistoryRepository>,
    courses: Arc<CourseRepository>,
}

impl StatisticsService {
    pub fn new(history: Arc<HistoryRepository>, courses: Arc<CourseRepository>) -> Self {
        Self { history, courses }
    }

    pub async fn statistics(&self, user: &User) -> Result<StatisticsSnapshot, GameError> {
        let records = records_for_scope(&self.history, HistoryScope::for_user(user)).await?;
        let source = self.win_loss_source(user).await?;
        Ok(build_snapshot(&records, source))
    }

    pub async fn class_statistics(
        &self,
        user: &User,
        course_id: Uuid,
    ) -> Result<StatisticsSnapshot, GameError> {
        let is_assigned = if user.role == Role::Teacher {
            self.courses.is_teacher_assigned(course_id, user.id).await?
        } else {
            false
        };
        authorize_course_statistics_access(user, is_assigned)?;

        let records = self.history.find_by_course(course_id).await?;
        let source = self.win_loss_source(user).await?;
        Ok(build_snapshot(&records, source))
    }

    pub async fn category_statistics(
        &self,
        user: &User,
        category: &str,
    ) -> Result<StatisticsSnapshot, GameError> {
        let records: Vec<_> = records_for_scope(&self.history, HistoryScope::for_user(user))
            .await?
            .into_iter()
            .filter(|record| record.category == category)
            .collect();

        let source = self.win_loss_source(user).await?;
        Ok(build_snapshot(&records, source))
    }

    /// Teachers get class-average win/loss figures from the history store's
    /// aggregate query; everyone else counts the record slice itself.
    async fn win_loss_source(&self, user: &User) -> Result<WinLossSource, GameError> {
        if user.role == Role::Teacher {
            let average = self.history.average_success_for_teacher(user.id).await?;
            Ok(WinLossSource::ClassAverage(average))
        } else {
            Ok(WinLossSource::Records)
        }
    }
}
