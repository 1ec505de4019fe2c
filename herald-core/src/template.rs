//! Named email template definitions
//!
//! Templates are authored by site staff through an admin form and stored as
//! configuration. The engine reads them fresh on every dispatch call, so
//! edits take effect without restart.

use serde::{Deserialize, Serialize};

use crate::error::{DataError, Error};

/// A stored email template: subject and HTML body template text plus the
/// default redirect destination and reply-to address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDefinition {
    pub id: String,
    pub description: String,
    pub subject: String,
    pub body: String,
    pub destination: String,
    pub reply_to: Option<String>,
}

impl TemplateDefinition {
    pub fn new(
        id: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            subject: subject.into(),
            body: body.into(),
            destination: String::new(),
            reply_to: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = destination.into();
        self
    }

    pub fn with_reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }

    /// Template keys are machine names: word characters and hyphens only.
    pub fn is_valid_key(key: &str) -> bool {
        !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }
}

/// One line of the admin "Definitions" list: a template key and its
/// human-readable description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub key: String,
    pub description: String,
}

/// Parse the free-text definition list, one `key|description` per line.
///
/// Blank lines are skipped, both parts are trimmed and the description is
/// optional. A key that is not a machine name fails the whole list, naming
/// the offending line.
pub fn parse_definition_list(raw: &str) -> Result<Vec<TemplateSummary>, Error> {
    let mut summaries = Vec::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (key, description) = match line.split_once('|') {
            Some((key, description)) => (key.trim(), description.trim()),
            None => (line, ""),
        };

        if !TemplateDefinition::is_valid_key(key) {
            return Err(DataError::MalformedKey(line.to_string()).into());
        }

        summaries.push(TemplateSummary {
            key: key.to_string(),
            description: description.to_string(),
        });
    }

    Ok(summaries)
}
