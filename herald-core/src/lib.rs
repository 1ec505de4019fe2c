//! Core functionality for the herald notification engine
//!
//! This crate contains the dispatch engine that resolves a named email
//! template plus per-recipient data into a rendered message, sends it
//! through a pluggable mail transport with bounded retry, and aggregates
//! per-recipient outcomes for reporting.
//!
//! Collaborators (template store, user directory, auto-login link
//! generator, mail transport, reporter) are injected through traits; see
//! [`services::DispatchService`] for the engine and [`memory`] for the
//! in-memory backends used in tests and embedding.

pub mod context;
pub mod error;
pub mod links;
pub mod memory;
pub mod outcome;
pub mod report;
pub mod services;
pub mod site;
pub mod storage;
pub mod template;
pub mod user;

pub use context::DataContext;
pub use error::Error;
pub use links::LinkGenerator;
pub use outcome::{DispatchOutcome, DispatchReport};
pub use report::{Reporter, TracingReporter};
pub use services::{DispatchService, MessageRenderer, NotifyOptions, TemplateOverrides};
pub use site::SiteContext;
pub use storage::{TemplateStore, UserDirectory};
pub use template::{TemplateDefinition, TemplateSummary};
pub use user::{RecipientDetails, User, UserId, UserStatus};
