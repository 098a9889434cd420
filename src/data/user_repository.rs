use crate::domain::repository::UserRepository;
use crate::domain::user::User;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, trace};

/// Users keyed by email, the identity the session carries.
#[derive(Clone)]
pub struct InMemoryUserRepository {
    storage: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self), fields(email = email))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        trace!("Acquiring read lock for user storage");
        let storage = self.storage.read().await;
        let user = storage.get(email).cloned();
        match &user {
            Some(u) => debug!(user_id = %u.id, "User found in storage"),
            None => trace!("User not found in storage"),
        }
        Ok(user)
    }

    #[instrument(skip(self, candidate), fields(email = %candidate.email))]
    async fn find_or_create_user(&self, candidate: User) -> Result<User> {
        trace!("Acquiring write lock for user storage");
        let mut storage = self.storage.write().await;
        if let Some(existing) = storage.get(&candidate.email) {
            debug!(user_id = %existing.id, "User already present");
            return Ok(existing.clone());
        }
        info!(user_id = %candidate.id, "Creating user record");
        storage.insert(candidate.email.clone(), candidate.clone());
        Ok(candidate)
    }

    async fn count_users(&self) -> Result<usize> {
        Ok(self.storage.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(id: &str, email: &str) -> User {
        User {
            id: id.to_string(),
            email: email.to_string(),
            name: String::new(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_find_or_create_user_inserts_new_user() {
        let repo = InMemoryUserRepository::new();

        let created = repo
            .find_or_create_user(user("user-1", "alice@example.com"))
            .await
            .unwrap();
        assert_eq!(created.id, "user-1");

        let found = repo.find_user_by_email("alice@example.com").await.unwrap();
        assert_eq!(found.unwrap().id, "user-1");
        assert_eq!(repo.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_or_create_user_keeps_existing_user() {
        let repo = InMemoryUserRepository::new();
        repo.find_or_create_user(user("user-1", "bob@example.com"))
            .await
            .unwrap();

        let second = repo
            .find_or_create_user(user("user-2", "bob@example.com"))
            .await
            .unwrap();

        assert_eq!(second.id, "user-1");
        assert_eq!(repo.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_user_by_email_returns_none_for_nonexistent_email() {
        let repo = InMemoryUserRepository::new();

        let found = repo
            .find_user_by_email("nonexistent@example.com")
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_find_user_by_email_case_sensitive() {
        let repo = InMemoryUserRepository::new();
        repo.find_or_create_user(user("user-5", "Test@Example.com"))
            .await
            .unwrap();

        assert!(repo.find_user_by_email("Test@Example.com").await.unwrap().is_some());
        assert!(repo.find_user_by_email("test@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_first_creations_store_one_user() {
        let repo = InMemoryUserRepository::new();

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let repo_clone = repo.clone();
                let candidate = user(&format!("user-{}", i), "race@example.com");
                tokio::spawn(async move { repo_clone.find_or_create_user(candidate).await })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }

        ids.dedup();
        assert_eq!(ids.len(), 1);
        assert_eq!(repo.count_users().await.unwrap(), 1);
    }
}
