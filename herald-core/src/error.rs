use thiserror::Error;

use crate::user::UserId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Mailer error: {0}")]
    Mailer(#[from] herald_mailer::MailerError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Email template {0} does not exist")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum DataError {
    #[error("Recipient data does not contain a \"{0}\"")]
    MissingField(String),

    #[error("Malformed template key in definition: {0}")]
    MalformedKey(String),
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("User {0} could not be loaded")]
    UserNotFound(UserId),

    #[error("Directory backend error: {0}")]
    Backend(String),
}

impl Error {
    /// True when a named template had no definition in the store. This is a
    /// configuration error and is never retried.
    pub fn is_template_missing(&self) -> bool {
        matches!(self, Error::Template(TemplateError::NotFound(_)))
    }

    /// True for malformed caller-supplied recipient or definition data.
    pub fn is_data_error(&self) -> bool {
        matches!(self, Error::Data(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let template_error = Error::Template(TemplateError::NotFound("welcome".to_string()));
        assert_eq!(
            template_error.to_string(),
            "Template error: Email template welcome does not exist"
        );

        let data_error = Error::Data(DataError::MissingField("email".to_string()));
        assert_eq!(
            data_error.to_string(),
            "Data error: Recipient data does not contain a \"email\""
        );
    }

    #[test]
    fn test_is_template_missing() {
        assert!(Error::Template(TemplateError::NotFound("x".to_string())).is_template_missing());
        assert!(!Error::Data(DataError::MissingField("name".to_string())).is_template_missing());
    }

    #[test]
    fn test_is_data_error() {
        assert!(Error::Data(DataError::MissingField("name".to_string())).is_data_error());
        assert!(Error::Data(DataError::MalformedKey("bad key".to_string())).is_data_error());
        assert!(!Error::Directory(DirectoryError::Backend("down".to_string())).is_data_error());
    }
}
