//! In-memory backends for tests and embedding

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::Error;
use crate::storage::{TemplateStore, UserDirectory};
use crate::template::TemplateDefinition;
use crate::user::{User, UserId};

#[derive(Debug, Default)]
pub struct InMemoryTemplateStore {
    templates: DashMap<String, TemplateDefinition>,
}

impl InMemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, definition: TemplateDefinition) {
        self.templates.insert(definition.id.clone(), definition);
    }

    pub fn remove(&self, id: &str) {
        self.templates.remove(id);
    }
}

#[async_trait]
impl TemplateStore for InMemoryTemplateStore {
    async fn get(&self, id: &str) -> Result<Option<TemplateDefinition>, Error> {
        Ok(self.templates.get(id).map(|entry| entry.clone()))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    users: DashMap<UserId, User>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: User) {
        self.users.insert(user.id, user);
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn find_active_by_role(&self, role: &str) -> Result<Vec<User>, Error> {
        let mut users: Vec<User> = self
            .users
            .iter()
            .filter(|entry| entry.is_active() && entry.has_role(role))
            .map(|entry| entry.clone())
            .collect();
        // DashMap iteration order is arbitrary; keep batches deterministic.
        users.sort_by_key(|user| user.id.into_inner());
        Ok(users)
    }

    async fn load_by_id(&self, id: UserId) -> Result<Option<User>, Error> {
        Ok(self.users.get(&id).map(|entry| entry.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::UserStatus;

    fn user(id: i64, name: &str, status: UserStatus, roles: &[&str]) -> User {
        let mut builder = User::builder()
            .id(id)
            .display_name(name)
            .email(format!("{}@example.com", name.to_lowercase()))
            .status(status);
        for role in roles {
            builder = builder.role(*role);
        }
        builder.build().unwrap()
    }

    #[tokio::test]
    async fn test_template_store_roundtrip() {
        let store = InMemoryTemplateStore::new();
        store.insert(TemplateDefinition::new("welcome", "Hi", "<p>Hi</p>"));

        assert!(store.get("welcome").await.unwrap().is_some());
        assert!(store.get("absent").await.unwrap().is_none());

        store.remove("welcome");
        assert!(store.get("welcome").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_directory_filters_inactive_and_other_roles() {
        let directory = InMemoryDirectory::new();
        directory.insert(user(1, "Ann", UserStatus::Active, &["editor"]));
        directory.insert(user(2, "Bob", UserStatus::Blocked, &["editor"]));
        directory.insert(user(3, "Cal", UserStatus::Active, &["viewer"]));
        directory.insert(user(4, "Dee", UserStatus::Active, &["editor", "viewer"]));

        let editors = directory.find_active_by_role("editor").await.unwrap();
        let names: Vec<&str> = editors.iter().map(|u| u.display_name.as_str()).collect();
        assert_eq!(names, vec!["Ann", "Dee"]);

        let admins = directory.find_active_by_role("admin").await.unwrap();
        assert!(admins.is_empty());
    }

    #[tokio::test]
    async fn test_load_by_id() {
        let directory = InMemoryDirectory::new();
        directory.insert(user(1, "Ann", UserStatus::Active, &[]));

        assert!(directory.load_by_id(UserId::new(1)).await.unwrap().is_some());
        assert!(directory.load_by_id(UserId::new(9)).await.unwrap().is_none());
    }
}
