mod engine;

pub use engine::{HandlebarsTemplateEngine, TemplateEngine};

/// Inline style applied to every rendered body so all emails share a
/// consistent baseline regardless of admin-authored content.
pub const BODY_WRAPPER_STYLE: &str = "font-size: 14px; color: #000;";

/// Wrap template body text in the fixed style wrapper. Applied before
/// substitution so the wrapper itself is never subject to templating.
pub fn wrap_body(body: &str) -> String {
    format!("<body style=\"{BODY_WRAPPER_STYLE}\">{body}</body>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_body() {
        let wrapped = wrap_body("<p>Hello</p>");
        assert_eq!(
            wrapped,
            "<body style=\"font-size: 14px; color: #000;\"><p>Hello</p></body>"
        );
    }

    #[test]
    fn test_wrap_body_applies_wrapper_exactly_once() {
        let wrapped = wrap_body("<p>{{ name }}</p>");
        assert_eq!(wrapped.matches("<body").count(), 1);
        assert_eq!(wrapped.matches("</body>").count(), 1);
        assert!(wrapped.contains("{{ name }}"));
    }
}
