use crate::{Email, MailerError};
use async_trait::async_trait;

/// The mail transport seam. Implementations attempt delivery of one
/// addressed, rendered message and report acceptance or failure.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_email(&self, email: Email) -> Result<(), MailerError>;
}
