//! User records and raw recipient data
//!
//! The dispatch engine addresses recipients either as platform users loaded
//! from a [`UserDirectory`](crate::storage::UserDirectory) or as raw
//! name/email pairs supplied by the caller.

use serde::{Deserialize, Serialize};

use crate::error::{DataError, Error};

/// A unique, stable identifier for a user in the hosting platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        UserId(id)
    }

    pub fn into_inner(self) -> i64 {
        self.0
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        UserId(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Blocked,
}

/// A user record as exposed by the hosting platform's directory.
///
/// `email` is optional: a user without an address is a legitimate record
/// that the engine skips with a warning rather than an invalid one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub display_name: String,
    pub email: Option<String>,
    pub profile_edit_url: String,
    pub status: UserStatus,
    pub roles: Vec<String>,
}

impl User {
    pub fn builder() -> UserBuilder {
        UserBuilder::default()
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Recipient identity used to key aggregate success/failure sets.
    pub fn recipient_key(&self) -> String {
        format!(
            "{} <{}>",
            self.display_name,
            self.email.as_deref().unwrap_or_default()
        )
    }
}

#[derive(Default)]
pub struct UserBuilder {
    id: Option<UserId>,
    display_name: Option<String>,
    email: Option<String>,
    profile_edit_url: Option<String>,
    status: Option<UserStatus>,
    roles: Vec<String>,
}

impl UserBuilder {
    pub fn id(mut self, id: impl Into<UserId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn profile_edit_url(mut self, url: impl Into<String>) -> Self {
        self.profile_edit_url = Some(url.into());
        self
    }

    pub fn status(mut self, status: UserStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    pub fn build(self) -> Result<User, Error> {
        let id = self
            .id
            .ok_or_else(|| DataError::MissingField("id".to_string()))?;
        Ok(User {
            id,
            display_name: self
                .display_name
                .ok_or_else(|| DataError::MissingField("display_name".to_string()))?,
            email: self.email,
            profile_edit_url: self
                .profile_edit_url
                .unwrap_or_else(|| format!("/user/{}/edit", id)),
            status: self.status.unwrap_or(UserStatus::Active),
            roles: self.roles,
        })
    }
}

/// A raw name/email pair for dispatch outside the user system.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipientDetails {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl RecipientDetails {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
        }
    }

    /// Both fields present and non-empty, or nothing. Empty strings are
    /// treated the same as absent fields.
    pub fn complete(&self) -> Option<(&str, &str)> {
        match (self.name.as_deref(), self.email.as_deref()) {
            (Some(name), Some(email)) if !name.is_empty() && !email.is_empty() => {
                Some((name, email))
            }
            _ => None,
        }
    }

    pub fn recipient_key(&self) -> String {
        format!(
            "{} <{}>",
            self.name.as_deref().unwrap_or_default(),
            self.email.as_deref().unwrap_or_default()
        )
    }
}
