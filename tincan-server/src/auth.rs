use crate::user::{User, UserStore, UserStoreError};
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Issues opaque bearer tokens backed by the user store. Tokens are plain
/// UUIDs held server-side; there is nothing to decode client-side.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: DashMap<String, i64>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self {
            users,
            tokens: DashMap::new(),
        }
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
    ) -> Result<(User, String), UserStoreError> {
        let user = self.users.create_user(username, email).await?;
        let token = Uuid::new_v4().to_string();
        self.tokens.insert(token.clone(), user.id);
        Ok((user, token))
    }

    /// Resolves a bearer token to its user. Unknown and revoked tokens
    /// both come back as `None`.
    pub async fn authenticate(&self, token: &str) -> Option<User> {
        let user_id = *self.tokens.get(token)?;
        self.users.get_user_by_id(user_id).await.ok()
    }

    pub fn revoke(&self, token: &str) {
        self.tokens.remove(token);
    }
}
