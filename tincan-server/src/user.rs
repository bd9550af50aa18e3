use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Serialize;
use std::sync::atomic::{AtomicI64, Ordering};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserStoreError {
    #[error("user not found")]
    NotFound,
    #[error("email already registered")]
    DuplicateEmail,
    #[error("username already taken")]
    DuplicateUsername,
}

/// Registered account. `is_online` tracks whether the user currently
/// holds a live signaling connection.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_online: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, username: &str, email: &str) -> Result<User, UserStoreError>;
    async fn get_user_by_id(&self, id: i64) -> Result<User, UserStoreError>;
    async fn get_user_by_username(&self, username: &str) -> Result<User, UserStoreError>;
    async fn get_user_by_email(&self, email: &str) -> Result<User, UserStoreError>;
    async fn update_user(&self, user: &User) -> Result<User, UserStoreError>;
    async fn set_online_status(&self, id: i64, online: bool) -> Result<(), UserStoreError>;
}

/// In-memory store, the only backend shipped. Secondary maps index the
/// unique username/email columns.
pub struct MemoryUserStore {
    users: DashMap<i64, User>,
    ids_by_username: DashMap<String, i64>,
    ids_by_email: DashMap<String, i64>,
    next_id: AtomicI64,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            ids_by_username: DashMap::new(),
            ids_by_email: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, username: &str, email: &str) -> Result<User, UserStoreError> {
        // Both index entries are reserved in the same order everywhere,
        // email first, so concurrent registrations cannot deadlock.
        let email_slot = match self.ids_by_email.entry(email.to_string()) {
            Entry::Occupied(_) => return Err(UserStoreError::DuplicateEmail),
            Entry::Vacant(slot) => slot,
        };
        let username_slot = match self.ids_by_username.entry(username.to_string()) {
            Entry::Occupied(_) => return Err(UserStoreError::DuplicateUsername),
            Entry::Vacant(slot) => slot,
        };

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let now = Utc::now();
        let user = User {
            id,
            username: username.to_string(),
            email: email.to_string(),
            is_online: false,
            created_at: now,
            updated_at: now,
        };

        email_slot.insert(id);
        username_slot.insert(id);
        self.users.insert(id, user.clone());
        Ok(user)
    }

    async fn get_user_by_id(&self, id: i64) -> Result<User, UserStoreError> {
        self.users
            .get(&id)
            .map(|user| user.clone())
            .ok_or(UserStoreError::NotFound)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<User, UserStoreError> {
        let id = *self
            .ids_by_username
            .get(username)
            .ok_or(UserStoreError::NotFound)?;
        self.get_user_by_id(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, UserStoreError> {
        let id = *self
            .ids_by_email
            .get(email)
            .ok_or(UserStoreError::NotFound)?;
        self.get_user_by_id(id).await
    }

    async fn update_user(&self, user: &User) -> Result<User, UserStoreError> {
        let current = self.get_user_by_id(user.id).await?;

        // Changed unique columns are reserved in the same email-then-username
        // order as create_user, and only committed once both are free.
        let email_slot = if user.email != current.email {
            match self.ids_by_email.entry(user.email.clone()) {
                Entry::Occupied(_) => return Err(UserStoreError::DuplicateEmail),
                Entry::Vacant(slot) => Some(slot),
            }
        } else {
            None
        };
        let username_slot = if user.username != current.username {
            match self.ids_by_username.entry(user.username.clone()) {
                Entry::Occupied(_) => return Err(UserStoreError::DuplicateUsername),
                Entry::Vacant(slot) => Some(slot),
            }
        } else {
            None
        };

        if let Some(slot) = email_slot {
            slot.insert(user.id);
            self.ids_by_email.remove(&current.email);
        }
        if let Some(slot) = username_slot {
            slot.insert(user.id);
            self.ids_by_username.remove(&current.username);
        }

        let mut updated = user.clone();
        updated.updated_at = Utc::now();
        self.users.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn set_online_status(&self, id: i64, online: bool) -> Result<(), UserStoreError> {
        let mut user = self.users.get_mut(&id).ok_or(UserStoreError::NotFound)?;
        user.is_online = online;
        user.updated_at = Utc::now();
        Ok(())
    }
}
