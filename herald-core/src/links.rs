//! Auto-login link generation seam

use async_trait::async_trait;

use crate::error::Error;
use crate::user::UserId;

/// Produces one-time auto-login URLs. The implementation is an external
/// service; the engine only ever passes same-origin relative paths (leading
/// slashes trimmed) so the deep link cannot become an open redirect.
#[async_trait]
pub trait LinkGenerator: Send + Sync {
    async fn create_auto_login_link(
        &self,
        user_id: UserId,
        relative_path: &str,
    ) -> Result<String, Error>;
}
