use std::sync::Arc;

use hangman_persistence::repositories::UserRepository;
use hangman_types::{GameError, User};

/// Resolves a bearer identity to a user row. Credential issuance and
/// validation live upstream; by the time a request reaches this service the
/// token carries an already-authenticated username.
pub struct AuthService {
    users: Arc<UserRepository>,
}

impl AuthService {
    pub fn new(users: Arc<UserRepository>) -> Self {
        Self { users }
    }

    pub async fn authenticate(&self, token: &str) -> Result<User, GameError> {
        let username = token.strip_prefix("Bearer ").unwrap_or(token);

        self.users
            .find_by_username(username)
            .await?
            .ok_or(GameError::UserNotFound)
    }
}
