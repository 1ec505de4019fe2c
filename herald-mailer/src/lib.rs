pub mod config;
pub mod email;
pub mod error;
pub mod mailer;
pub mod templates;
pub mod transports;

pub use config::MailerConfig;
pub use email::{Email, EmailBuilder};
pub use error::MailerError;
pub use mailer::Mailer;
pub use templates::{HandlebarsTemplateEngine, TemplateEngine, wrap_body};
pub use transports::{FileTransport, SendmailTransport, SmtpTransport};

pub mod prelude {
    pub use crate::{
        Email, EmailBuilder, FileTransport, HandlebarsTemplateEngine, Mailer, MailerConfig,
        MailerError, SendmailTransport, SmtpTransport, TemplateEngine, wrap_body,
    };
}
