//! Message rendering
//!
//! Renders a template definition's subject and body against a data context.
//! The fixed body wrapper is applied to the raw template text before
//! substitution, so rendered values can never duplicate or escape it.

use std::sync::Arc;

use herald_mailer::{HandlebarsTemplateEngine, TemplateEngine, wrap_body};

use crate::context::DataContext;
use crate::error::Error;
use crate::template::TemplateDefinition;

#[derive(Clone)]
pub struct MessageRenderer {
    engine: Arc<dyn TemplateEngine>,
}

impl MessageRenderer {
    pub fn new(engine: Arc<dyn TemplateEngine>) -> Self {
        Self { engine }
    }

    /// Renderer backed by the default handlebars engine.
    pub fn handlebars() -> Self {
        Self::new(Arc::new(HandlebarsTemplateEngine::new()))
    }

    /// Render the subject line. A caller-supplied override replaces the
    /// stored subject template entirely.
    pub async fn render_subject(
        &self,
        definition: &TemplateDefinition,
        override_subject: Option<&str>,
        context: &DataContext,
    ) -> Result<String, Error> {
        let template = override_subject.unwrap_or(&definition.subject);
        Ok(self.engine.render(template, &context.as_value()).await?)
    }

    /// Render the HTML body inside the fixed style wrapper.
    pub async fn render_body(
        &self,
        definition: &TemplateDefinition,
        override_body: Option<&str>,
        context: &DataContext,
    ) -> Result<String, Error> {
        let template = wrap_body(override_body.unwrap_or(&definition.body));
        Ok(self.engine.render(&template, &context.as_value()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_with_name(name: &str) -> DataContext {
        let mut ctx = DataContext::new();
        ctx.set_path("name", name).unwrap();
        ctx
    }

    #[tokio::test]
    async fn test_render_subject_substitutes() {
        let renderer = MessageRenderer::handlebars();
        let def = TemplateDefinition::new("welcome", "Hi {{ name }}", "<p>{{ name }}</p>");

        let subject = renderer
            .render_subject(&def, None, &context_with_name("Ann"))
            .await
            .unwrap();
        assert_eq!(subject, "Hi Ann");
    }

    #[tokio::test]
    async fn test_render_body_applies_wrapper_once() {
        let renderer = MessageRenderer::handlebars();
        let def = TemplateDefinition::new("welcome", "Hi", "<p>{{ name }}</p>");

        let body = renderer
            .render_body(&def, None, &context_with_name("Ann"))
            .await
            .unwrap();
        assert_eq!(
            body,
            "<body style=\"font-size: 14px; color: #000;\"><p>Ann</p></body>"
        );
        assert_eq!(body.matches("<body").count(), 1);
    }

    #[tokio::test]
    async fn test_overrides_replace_stored_templates() {
        let renderer = MessageRenderer::handlebars();
        let def = TemplateDefinition::new("welcome", "Stored subject", "<p>stored</p>");
        let ctx = context_with_name("Ann");

        let subject = renderer
            .render_subject(&def, Some("Override for {{ name }}"), &ctx)
            .await
            .unwrap();
        assert_eq!(subject, "Override for Ann");

        let body = renderer
            .render_body(&def, Some("<p>override {{ name }}</p>"), &ctx)
            .await
            .unwrap();
        assert!(body.contains("<p>override Ann</p>"));
        assert!(!body.contains("stored"));
    }

    #[tokio::test]
    async fn test_unresolved_placeholder_renders_empty() {
        let renderer = MessageRenderer::handlebars();
        let def = TemplateDefinition::new("welcome", "Hi {{ nickname }}!", "<p></p>");

        let subject = renderer
            .render_subject(&def, None, &DataContext::new())
            .await
            .unwrap();
        assert_eq!(subject, "Hi !");
    }

    #[tokio::test]
    async fn test_malformed_template_is_an_error() {
        let renderer = MessageRenderer::handlebars();
        let def = TemplateDefinition::new("welcome", "{{#each}}", "<p></p>");

        let result = renderer
            .render_subject(&def, None, &DataContext::new())
            .await;
        assert!(result.is_err());
    }
}
