use crate::MailerError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single addressed, rendered message ready for a transport.
///
/// Dispatch is always per-recipient, so `to` is a single address. The
/// `headers` map carries the fixed header set the engine constructs
/// (`content-type`, `MIME-Version`, `reply-to`, `from`); transports that
/// model those headers natively read the dedicated fields instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Email {
    pub to: String,
    pub from: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html_body: Option<String>,
    pub text_body: Option<String>,
    pub headers: HashMap<String, String>,
}

impl Email {
    pub fn builder() -> EmailBuilder {
        EmailBuilder::default()
    }

    pub fn validate(&self) -> Result<(), MailerError> {
        if self.to.is_empty() {
            return Err(MailerError::Builder(
                "A recipient address is required".to_string(),
            ));
        }

        if self.from.is_empty() {
            return Err(MailerError::Builder("From address is required".to_string()));
        }

        if self.html_body.is_none() && self.text_body.is_none() {
            return Err(MailerError::Builder(
                "Either HTML or text body is required".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct EmailBuilder {
    to: Option<String>,
    from: Option<String>,
    reply_to: Option<String>,
    subject: Option<String>,
    html_body: Option<String>,
    text_body: Option<String>,
    headers: HashMap<String, String>,
}

impl EmailBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to<S: Into<String>>(mut self, email: S) -> Self {
        self.to = Some(email.into());
        self
    }

    pub fn from<S: Into<String>>(mut self, email: S) -> Self {
        self.from = Some(email.into());
        self
    }

    pub fn reply_to<S: Into<String>>(mut self, email: S) -> Self {
        self.reply_to = Some(email.into());
        self
    }

    pub fn subject<S: Into<String>>(mut self, subject: S) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn html_body<S: Into<String>>(mut self, html: S) -> Self {
        self.html_body = Some(html.into());
        self
    }

    pub fn text_body<S: Into<String>>(mut self, text: S) -> Self {
        self.text_body = Some(text.into());
        self
    }

    pub fn header<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Result<Email, MailerError> {
        let email = Email {
            to: self
                .to
                .ok_or_else(|| MailerError::Builder("Recipient address is required".to_string()))?,
            from: self
                .from
                .ok_or_else(|| MailerError::Builder("From address is required".to_string()))?,
            reply_to: self.reply_to,
            // An admin-authored subject template may legitimately render to
            // an empty string, so the subject is not a hard requirement.
            subject: self.subject.unwrap_or_default(),
            html_body: self.html_body,
            text_body: self.text_body,
            headers: self.headers,
        };

        email.validate()?;
        Ok(email)
    }
}
