//! Site metadata injected into the dispatch engine
//!
//! Replaces the hosting platform's ambient config and request services with
//! an explicit value passed at construction time.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct SiteContext {
    /// Human-readable site name, used in the `from` header.
    pub name: String,
    /// Site admin address: the `from` address and the default reply-to.
    pub admin_email: String,
    /// Absolute URL of the site front page, exposed as `site_front`.
    pub front_url: String,
    /// Scheme and host of the current request, used to absolutize relative
    /// destinations.
    pub base_url: String,
    /// Timestamp of the current request, exposed as `misc.time`.
    pub request_time: DateTime<Utc>,
    /// Preferred language code of the acting user, carried on outgoing
    /// messages as `Content-Language`.
    pub langcode: String,
}

impl SiteContext {
    pub fn new(
        name: impl Into<String>,
        admin_email: impl Into<String>,
        front_url: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            admin_email: admin_email.into(),
            front_url: front_url.into(),
            base_url: base_url.into(),
            request_time: Utc::now(),
            langcode: "en".to_string(),
        }
    }

    pub fn with_request_time(mut self, time: DateTime<Utc>) -> Self {
        self.request_time = time;
        self
    }

    pub fn with_langcode(mut self, langcode: impl Into<String>) -> Self {
        self.langcode = langcode.into();
        self
    }

    /// RFC 5322 sender mailbox: `Site Name <admin@site>`. The from address
    /// is never caller-supplied; only reply-to is configurable.
    pub fn from_mailbox(&self) -> String {
        format!("{} <{}>", self.name, self.admin_email)
    }
}
