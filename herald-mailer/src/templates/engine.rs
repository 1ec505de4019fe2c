use crate::MailerError;
use async_trait::async_trait;
use handlebars::Handlebars;

#[async_trait]
pub trait TemplateEngine: Send + Sync {
    async fn render(
        &self,
        template: &str,
        data: &serde_json::Value,
    ) -> Result<String, MailerError>;
}

/// Handlebars-backed substitution over admin-authored template text.
///
/// Strict mode stays off: templates are free text written by non-engineers,
/// so an unresolved `{{ variable }}` renders as an empty string instead of
/// failing the send. Only malformed syntax is an error.
#[derive(Debug)]
pub struct HandlebarsTemplateEngine {
    registry: Handlebars<'static>,
}

impl HandlebarsTemplateEngine {
    pub fn new() -> Self {
        let registry = Handlebars::new();
        Self { registry }
    }
}

impl Default for HandlebarsTemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TemplateEngine for HandlebarsTemplateEngine {
    async fn render(
        &self,
        template: &str,
        data: &serde_json::Value,
    ) -> Result<String, MailerError> {
        Ok(self.registry.render_template(template, data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_basic_substitution() {
        let engine = HandlebarsTemplateEngine::new();
        let data = json!({ "name": "Ann" });

        let result = engine.render("Hi {{ name }}", &data).await.unwrap();
        assert_eq!(result, "Hi Ann");
    }

    #[tokio::test]
    async fn test_dotted_path_lookup() {
        let engine = HandlebarsTemplateEngine::new();
        let data = json!({ "misc": { "time_raw": 1700000000 } });

        let result = engine
            .render("Sent at {{ misc.time_raw }}", &data)
            .await
            .unwrap();
        assert_eq!(result, "Sent at 1700000000");
    }

    #[tokio::test]
    async fn test_unresolved_variable_renders_empty() {
        let engine = HandlebarsTemplateEngine::new();
        let data = json!({ "name": "Ann" });

        let result = engine
            .render("Hi {{ name }}{{ nickname }}, bye {{ misc.deep.path }}", &data)
            .await
            .unwrap();
        assert_eq!(result, "Hi Ann, bye ");
    }

    #[tokio::test]
    async fn test_html_values_are_escaped() {
        let engine = HandlebarsTemplateEngine::new();
        let data = json!({ "content": "<script>alert('x')</script>" });

        let result = engine.render("<p>{{ content }}</p>", &data).await.unwrap();
        assert!(result.contains("&lt;script&gt;"));
        assert!(!result.contains("<script>"));
    }

    #[tokio::test]
    async fn test_malformed_template_is_an_error() {
        let engine = HandlebarsTemplateEngine::new();
        let data = json!({});

        let result = engine.render("{{#if}}broken", &data).await;
        assert!(result.is_err());
    }
}
