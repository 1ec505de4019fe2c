mod file;
mod sendmail;
pub mod smtp;

pub use file::FileTransport;
pub use sendmail::SendmailTransport;
pub use smtp::{SmtpTransport, TlsConfig};

use crate::{Email, MailerError};
use lettre::Message;

/// Convert an [`Email`] into a lettre message shared by all transports.
///
/// The `headers` map is not copied verbatim: lettre models from/reply-to as
/// typed fields and derives content-type and MIME-Version from the body
/// parts, so the fixed header set survives the conversion through those.
pub(crate) fn build_message(email: Email) -> Result<Message, MailerError> {
    let mut message_builder = Message::builder()
        .from(email.from.parse()?)
        .to(email.to.parse()?)
        .subject(email.subject);

    if let Some(reply_to) = email.reply_to {
        message_builder = message_builder.reply_to(reply_to.parse()?);
    }

    // Prefer HTML over text
    let message = if let Some(html) = email.html_body {
        if let Some(text) = email.text_body {
            message_builder.multipart(
                lettre::message::MultiPart::alternative()
                    .singlepart(lettre::message::SinglePart::plain(text))
                    .singlepart(lettre::message::SinglePart::html(html)),
            )?
        } else {
            message_builder.singlepart(lettre::message::SinglePart::html(html))?
        }
    } else if let Some(text) = email.text_body {
        message_builder.body(text)?
    } else {
        return Err(MailerError::Builder("No email body provided".to_string()));
    };

    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_message() {
        let email = Email::builder()
            .from("sender@example.com")
            .to("recipient@example.com")
            .subject("Test Subject")
            .html_body("<h1>Hello</h1>")
            .text_body("Hello")
            .build()
            .unwrap();

        let message = build_message(email);
        assert!(message.is_ok());
    }

    #[test]
    fn test_build_message_html_only() {
        let email = Email::builder()
            .from("sender@example.com")
            .to("recipient@example.com")
            .subject("Test Subject")
            .html_body("<h1>Hello</h1>")
            .build()
            .unwrap();

        let message = build_message(email).unwrap();
        let rendered = String::from_utf8(message.formatted()).unwrap();
        assert!(rendered.contains("text/html"));
    }

    #[test]
    fn test_build_message_rejects_bad_address() {
        let email = Email {
            to: "not an address".to_string(),
            from: "sender@example.com".to_string(),
            reply_to: None,
            subject: "Test".to_string(),
            html_body: Some("<p>hi</p>".to_string()),
            text_body: None,
            headers: std::collections::HashMap::new(),
        };

        assert!(build_message(email).is_err());
    }
}
