//! Recipient resolution
//!
//! Turns a role name into the concrete set of users to notify. Filtering
//! (active status, role membership) is the directory backend's contract;
//! this service only owns the seam and the empty-result logging.

use std::sync::Arc;

use tracing::info;

use crate::error::Error;
use crate::storage::UserDirectory;
use crate::user::{User, UserId};

#[derive(Clone)]
pub struct RecipientResolver {
    directory: Arc<dyn UserDirectory>,
}

impl RecipientResolver {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    /// All active users holding `role`. An empty role is a no-op, not an
    /// error.
    pub async fn resolve_by_role(&self, role: &str) -> Result<Vec<User>, Error> {
        let users = self.directory.find_active_by_role(role).await?;
        if users.is_empty() {
            info!(role, "no active users found for role");
        }
        Ok(users)
    }

    pub async fn resolve_by_id(&self, id: UserId) -> Result<Option<User>, Error> {
        self.directory.load_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryDirectory;
    use crate::user::UserStatus;

    #[tokio::test]
    async fn test_resolve_by_role_returns_active_members_only() {
        let directory = Arc::new(InMemoryDirectory::new());
        directory.insert(
            User::builder()
                .id(1)
                .display_name("Ann")
                .email("ann@example.com")
                .role("editor")
                .build()
                .unwrap(),
        );
        directory.insert(
            User::builder()
                .id(2)
                .display_name("Bob")
                .email("bob@example.com")
                .status(UserStatus::Blocked)
                .role("editor")
                .build()
                .unwrap(),
        );

        let resolver = RecipientResolver::new(directory);
        let users = resolver.resolve_by_role("editor").await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].display_name, "Ann");
    }

    #[tokio::test]
    async fn test_resolve_by_role_empty_is_ok() {
        let resolver = RecipientResolver::new(Arc::new(InMemoryDirectory::new()));
        let users = resolver.resolve_by_role("nobody").await.unwrap();
        assert!(users.is_empty());
    }
}
