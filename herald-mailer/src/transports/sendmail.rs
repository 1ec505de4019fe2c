use super::build_message;
use crate::{Email, Mailer, MailerError};
use async_trait::async_trait;
use lettre::transport::sendmail::SendmailTransport as LettreTransport;
use lettre::Transport;

#[derive(Debug, Clone)]
pub struct SendmailTransport {
    transport: LettreTransport,
}

impl SendmailTransport {
    pub fn new() -> Self {
        Self {
            transport: LettreTransport::new(),
        }
    }

    pub fn with_command<S: Into<String>>(command: S) -> Self {
        let cmd: String = command.into();
        Self {
            transport: LettreTransport::new_with_command(cmd),
        }
    }
}

impl Default for SendmailTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for SendmailTransport {
    async fn send_email(&self, email: Email) -> Result<(), MailerError> {
        let message = build_message(email)?;

        // lettre's SendmailTransport is sync, so we use spawn_blocking
        let transport = self.transport.clone();
        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| MailerError::Builder(format!("Failed to send email: {e}")))??;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sendmail_transport_creation() {
        let _transport = SendmailTransport::new();
    }

    #[test]
    fn test_sendmail_with_command() {
        let _transport = SendmailTransport::with_command("/usr/sbin/sendmail");
    }
}
