//! Collaborator storage traits
//!
//! The template store and user directory are owned by the hosting platform;
//! the engine only reads through these seams. See [`crate::memory`] for the
//! in-memory reference backends.

use async_trait::async_trait;

use crate::error::Error;
use crate::template::TemplateDefinition;
use crate::user::{User, UserId};

#[async_trait]
pub trait TemplateStore: Send + Sync + 'static {
    /// Look up a template definition by id. `Ok(None)` means the template
    /// is not configured, which the engine treats as a configuration error.
    async fn get(&self, id: &str) -> Result<Option<TemplateDefinition>, Error>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync + 'static {
    /// All active users holding `role`. An empty result is valid and
    /// distinct from a backend fault.
    async fn find_active_by_role(&self, role: &str) -> Result<Vec<User>, Error>;

    async fn load_by_id(&self, id: UserId) -> Result<Option<User>, Error>;
}
