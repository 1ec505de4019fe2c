//! Template-driven notification dispatch
//!
//! [`DispatchService`] is the engine entry point: it resolves a named
//! template, renders it per recipient, and hands the message to the mail
//! transport with bounded retry. Batch operations accumulate per-recipient
//! outcomes and never abort on a single failure; a missing template is a
//! configuration error and fails the whole call before any recipient is
//! touched.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tokio::time::timeout;
use tracing::{debug, error, warn};

use herald_mailer::{Email, Mailer, wrap_body};

use crate::context::DataContext;
use crate::error::{DataError, DirectoryError, Error, TemplateError};
use crate::links::LinkGenerator;
use crate::outcome::{DispatchOutcome, DispatchReport};
use crate::report::Reporter;
use crate::services::recipients::RecipientResolver;
use crate::services::renderer::MessageRenderer;
use crate::site::SiteContext;
use crate::storage::{TemplateStore, UserDirectory};
use crate::template::TemplateDefinition;
use crate::user::{RecipientDetails, User, UserId};

/// Upper bound on delivery attempts for a single message. The message is
/// rendered once; retries resend the same content.
pub const MAX_SEND_ATTEMPTS: u32 = 5;

const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// One-shot replacements for the stored subject and body templates,
/// scoped to a single call.
#[derive(Debug, Clone, Default)]
pub struct TemplateOverrides {
    pub subject: Option<String>,
    pub body: Option<String>,
}

/// Per-call dispatch options. Everything is optional; defaults come from
/// the template definition and the site context.
#[derive(Debug, Clone, Default)]
pub struct NotifyOptions {
    /// Redirect destination, overriding the template's default. Relative
    /// paths (leading `/`) are absolutized against the site base URL.
    pub destination: Option<String>,
    /// Reply-to address, overriding the template's default and the site
    /// admin address.
    pub reply_to: Option<String>,
    /// Deliver to this address instead of the resolved user's own.
    pub to_email: Option<String>,
    /// Extra template data. Engine-computed fields win on collision.
    pub data: Map<String, Value>,
    pub overrides: TemplateOverrides,
}

impl NotifyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }

    pub fn to_email(mut self, email: impl Into<String>) -> Self {
        self.to_email = Some(email.into());
        self
    }

    pub fn data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn data_map(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    pub fn subject_override(mut self, subject: impl Into<String>) -> Self {
        self.overrides.subject = Some(subject.into());
        self
    }

    pub fn body_override(mut self, body: impl Into<String>) -> Self {
        self.overrides.body = Some(body.into());
        self
    }
}

pub struct DispatchService {
    templates: Arc<dyn TemplateStore>,
    resolver: RecipientResolver,
    links: Arc<dyn LinkGenerator>,
    transport: Arc<dyn Mailer>,
    reporter: Arc<dyn Reporter>,
    site: SiteContext,
    renderer: MessageRenderer,
    max_attempts: u32,
    send_timeout: Duration,
}

impl DispatchService {
    pub fn new(
        templates: Arc<dyn TemplateStore>,
        directory: Arc<dyn UserDirectory>,
        links: Arc<dyn LinkGenerator>,
        transport: Arc<dyn Mailer>,
        reporter: Arc<dyn Reporter>,
        site: SiteContext,
    ) -> Self {
        Self {
            templates,
            resolver: RecipientResolver::new(directory),
            links,
            transport,
            reporter,
            site,
            renderer: MessageRenderer::handlebars(),
            max_attempts: MAX_SEND_ATTEMPTS,
            send_timeout: DEFAULT_SEND_TIMEOUT,
        }
    }

    pub fn with_renderer(mut self, renderer: MessageRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_send_timeout(mut self, send_timeout: Duration) -> Self {
        self.send_timeout = send_timeout;
        self
    }

    /// Notify every active user holding `role`.
    pub async fn notify_by_role(
        &self,
        template_id: &str,
        role: &str,
        opts: &NotifyOptions,
    ) -> Result<DispatchReport, Error> {
        let definition = self.require_template(template_id).await?;
        let users = self.resolver.resolve_by_role(role).await?;
        Ok(self.notify_batch(&definition, &users, opts).await)
    }

    /// Notify an explicit set of users.
    pub async fn notify_users(
        &self,
        template_id: &str,
        users: &[User],
        opts: &NotifyOptions,
    ) -> Result<DispatchReport, Error> {
        let definition = self.require_template(template_id).await?;
        Ok(self.notify_batch(&definition, users, opts).await)
    }

    /// Notify raw name/email pairs outside the user system. Entries missing
    /// a name or email are reported on the malformed channel; the rest of
    /// the batch still runs.
    pub async fn notify_by_details(
        &self,
        template_id: &str,
        recipients: &[RecipientDetails],
        opts: &NotifyOptions,
    ) -> Result<DispatchReport, Error> {
        let definition = self.require_template(template_id).await?;
        let mut report = DispatchReport::new();

        for details in recipients {
            let Some((name, email)) = details.complete() else {
                warn!(entry = %details.recipient_key(), "recipient entry missing name or email");
                report.record_malformed(details.recipient_key());
                continue;
            };

            let key = details.recipient_key();
            let result = self
                .dispatch_to_address(
                    &definition,
                    name,
                    email,
                    self.resolve_destination(&definition, opts),
                    DataContext::from_extra(opts.data.clone()),
                    opts,
                )
                .await;
            self.record_result(&mut report, key, result);
        }

        if !report.malformed().is_empty() {
            self.reporter.error(&format!(
                "Unable to notify {} users: {}",
                report.malformed().len(),
                report.malformed().join(", ")
            ));
        }
        self.report_successes(&report);
        Ok(report)
    }

    /// Notify a single user.
    pub async fn notify_user(
        &self,
        template_id: &str,
        user: &User,
        opts: &NotifyOptions,
    ) -> Result<DispatchOutcome, Error> {
        let definition = self.require_template(template_id).await?;
        self.notify_user_with(&definition, user, opts).await
    }

    /// Notify a single user loaded from the directory.
    pub async fn notify_user_by_id(
        &self,
        template_id: &str,
        id: UserId,
        opts: &NotifyOptions,
    ) -> Result<DispatchOutcome, Error> {
        let definition = self.require_template(template_id).await?;
        let user = self
            .resolver
            .resolve_by_id(id)
            .await?
            .ok_or(DirectoryError::UserNotFound(id))?;
        self.notify_user_with(&definition, &user, opts).await
    }

    /// Notify a raw name/email pair. Incomplete details are an error here,
    /// unlike the batch variant where they are accumulated.
    pub async fn notify_email(
        &self,
        template_id: &str,
        details: &RecipientDetails,
        opts: &NotifyOptions,
    ) -> Result<DispatchOutcome, Error> {
        let definition = self.require_template(template_id).await?;
        let Some((name, email)) = details.complete() else {
            let field = if details.name.as_deref().unwrap_or_default().is_empty() {
                "name"
            } else {
                "email"
            };
            return Err(DataError::MissingField(field.to_string()).into());
        };

        self.dispatch_to_address(
            &definition,
            name,
            email,
            self.resolve_destination(&definition, opts),
            DataContext::from_extra(opts.data.clone()),
            opts,
        )
        .await
    }

    /// Send a one-off message without a stored template. The body still
    /// gets the fixed style wrapper, but no substitution is applied.
    pub async fn send_simple(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<DispatchOutcome, Error> {
        let message = Email::builder()
            .to(to)
            .from(self.site.from_mailbox())
            .reply_to(self.site.admin_email.as_str())
            .subject(subject)
            .html_body(wrap_body(body))
            .header("content-type", "text/html")
            .header("MIME-Version", "1.0")
            .header("reply-to", self.site.admin_email.as_str())
            .header("from", self.site.from_mailbox())
            .header("Content-Language", self.site.langcode.as_str())
            .build()?;
        Ok(self.send_with_retry(message).await)
    }

    async fn require_template(&self, template_id: &str) -> Result<TemplateDefinition, Error> {
        match self.templates.get(template_id).await? {
            Some(definition) => Ok(definition),
            None => {
                error!(template_id, "email template is not configured");
                self.reporter
                    .error(&format!("Email template {template_id} does not exist"));
                Err(TemplateError::NotFound(template_id.to_string()).into())
            }
        }
    }

    async fn notify_batch(
        &self,
        definition: &TemplateDefinition,
        users: &[User],
        opts: &NotifyOptions,
    ) -> DispatchReport {
        let mut report = DispatchReport::new();
        for user in users {
            let key = match opts.to_email.as_deref() {
                Some(email) => format!("{} <{}>", user.display_name, email),
                None => user.recipient_key(),
            };
            let result = self.notify_user_with(definition, user, opts).await;
            self.record_result(&mut report, key, result);
        }
        self.report_successes(&report);
        report
    }

    fn record_result(
        &self,
        report: &mut DispatchReport,
        key: String,
        result: Result<DispatchOutcome, Error>,
    ) {
        match result {
            Ok(outcome) => {
                if let DispatchOutcome::FailedAfterRetries { attempts } = &outcome
                    && *attempts > 0
                {
                    self.reporter
                        .error(&format!("Unable to notify {key} after {attempts} tries"));
                }
                report.record(key, &outcome);
            }
            Err(err) => {
                error!(recipient = %key, error = %err, "dispatch failed");
                self.reporter.error(&format!("Unable to notify {key}: {err}"));
                report.record(key, &DispatchOutcome::FailedAfterRetries { attempts: 0 });
            }
        }
    }

    fn report_successes(&self, report: &DispatchReport) {
        if !report.successes().is_empty() {
            let notified: Vec<&str> = report.successes().iter().map(String::as_str).collect();
            self.reporter
                .status(&format!("Notified: {}", notified.join(", ")));
        }
    }

    async fn notify_user_with(
        &self,
        definition: &TemplateDefinition,
        user: &User,
        opts: &NotifyOptions,
    ) -> Result<DispatchOutcome, Error> {
        let email = opts
            .to_email
            .as_deref()
            .filter(|e| !e.is_empty())
            .or(user.email.as_deref().filter(|e| !e.is_empty()));
        let Some(email) = email else {
            warn!(user = %user.id, "user has no email address");
            self.reporter.warning(&format!(
                "{} has no email address, edit the user at {}",
                user.display_name, user.profile_edit_url
            ));
            return Ok(DispatchOutcome::SkippedNoEmail);
        };

        let destination = self.resolve_destination(definition, opts);
        // The link generator receives a same-origin path, never a URL.
        let login_path = destination.trim_start_matches('/');
        let auto_login_link = match self.links.create_auto_login_link(user.id, login_path).await {
            Ok(link) => link,
            Err(err) => {
                error!(user = %user.id, error = %err, "auto-login link generation failed");
                self.reporter.error(&format!(
                    "Unable to create a login link for {}",
                    user.display_name
                ));
                return Ok(DispatchOutcome::FailedAfterRetries { attempts: 0 });
            }
        };

        let mut context = DataContext::from_extra(opts.data.clone());
        context.set_path("auto_login_link", &auto_login_link)?;
        // The whole record, so templates can reach fields like
        // `misc.user.display_name`.
        context.set_path("misc.user", user)?;

        self.dispatch_to_address(definition, &user.display_name, email, destination, context, opts)
            .await
    }

    /// Destination precedence: per-call option, then the template default,
    /// then the site root. Empty strings count as absent.
    fn resolve_destination<'a>(
        &self,
        definition: &'a TemplateDefinition,
        opts: &'a NotifyOptions,
    ) -> &'a str {
        opts.destination
            .as_deref()
            .filter(|d| !d.is_empty())
            .or_else(|| Some(definition.destination.as_str()).filter(|d| !d.is_empty()))
            .unwrap_or("/")
    }

    async fn dispatch_to_address(
        &self,
        definition: &TemplateDefinition,
        name: &str,
        email: &str,
        destination: &str,
        mut context: DataContext,
        opts: &NotifyOptions,
    ) -> Result<DispatchOutcome, Error> {
        let destination_link = if destination.starts_with('/') {
            format!("{}{}", self.site.base_url, destination)
        } else {
            destination.to_string()
        };

        context.set_path("name", name)?;
        context.set_path("destination_link", &destination_link)?;
        context.set_path("site_name", &self.site.name)?;
        context.set_path("site_front", &self.site.front_url)?;
        context.set_path("misc.time", self.site.request_time.to_rfc3339())?;
        context.set_path("misc.time_raw", self.site.request_time.timestamp())?;

        let subject = self
            .renderer
            .render_subject(definition, opts.overrides.subject.as_deref(), &context)
            .await?;
        let body = self
            .renderer
            .render_body(definition, opts.overrides.body.as_deref(), &context)
            .await?;

        let reply_to = opts
            .reply_to
            .as_deref()
            .filter(|r| !r.is_empty())
            .or(definition.reply_to.as_deref().filter(|r| !r.is_empty()))
            .unwrap_or(&self.site.admin_email);

        // The from mailbox always carries the site identity; callers can
        // only steer replies.
        let message = Email::builder()
            .to(email)
            .from(self.site.from_mailbox())
            .reply_to(reply_to)
            .subject(subject)
            .html_body(body)
            .header("content-type", "text/html")
            .header("MIME-Version", "1.0")
            .header("reply-to", reply_to)
            .header("from", self.site.from_mailbox())
            .header("Content-Language", self.site.langcode.as_str())
            .build()?;

        Ok(self.send_with_retry(message).await)
    }

    /// Deliver with bounded retry. Rendering already happened; every
    /// attempt resends the same message.
    async fn send_with_retry(&self, email: Email) -> DispatchOutcome {
        for attempt in 1..=self.max_attempts {
            match timeout(self.send_timeout, self.transport.send_email(email.clone())).await {
                Ok(Ok(())) => {
                    if attempt > 1 {
                        debug!(attempt, to = %email.to, "delivery succeeded after retry");
                    }
                    return DispatchOutcome::Sent;
                }
                Ok(Err(err)) => {
                    warn!(attempt, to = %email.to, error = %err, "delivery attempt failed");
                }
                Err(_) => {
                    warn!(attempt, to = %email.to, timeout = ?self.send_timeout, "delivery attempt timed out");
                }
            }
        }
        DispatchOutcome::FailedAfterRetries {
            attempts: self.max_attempts,
        }
    }
}
