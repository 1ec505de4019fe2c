//! Template data context
//!
//! A nested string-keyed mapping rendered into subject and body templates.
//! Callers may seed the context with extra data; engine-computed fields
//! (`name`, `destination_link`, `site_name`, `auto_login_link`, `misc.*`)
//! are written afterwards and always win on key collision. Callers may
//! enrich but not override core identity and link fields.

use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default)]
pub struct DataContext {
    root: Map<String, Value>,
}

impl DataContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the context with caller-supplied extra data (lowest precedence).
    pub fn from_extra(extra: Map<String, Value>) -> Self {
        Self { root: extra }
    }

    /// Set a value at a dotted path, creating intermediate objects as
    /// needed. An existing non-object intermediate is replaced, so computed
    /// fields win even against conflicting caller data shapes.
    pub fn set_path<T: Serialize>(
        &mut self,
        path: &str,
        value: T,
    ) -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(value)?;
        let mut current = &mut self.root;

        let mut segments = path.split('.').peekable();
        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                current.insert(segment.to_string(), value);
                return Ok(());
            }

            let entry = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            current = entry
                .as_object_mut()
                .unwrap_or_else(|| unreachable!("entry was just made an object"));
        }

        Ok(())
    }

    /// Dotted-path lookup. A missing path is `None`, never an error.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.root.get(first)?;

        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }

        Some(current)
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_and_get_top_level() {
        let mut ctx = DataContext::new();
        ctx.set_path("name", "Ann").unwrap();

        assert_eq!(ctx.get("name"), Some(&json!("Ann")));
        assert_eq!(ctx.get("missing"), None);
    }

    #[test]
    fn test_set_path_nested() {
        let mut ctx = DataContext::new();
        ctx.set_path("misc.time_raw", 1700000000).unwrap();
        ctx.set_path("misc.time", "2023-11-14T22:13:20+00:00").unwrap();

        assert_eq!(ctx.get("misc.time_raw"), Some(&json!(1700000000)));
        assert_eq!(ctx.get("misc.time"), Some(&json!("2023-11-14T22:13:20+00:00")));
    }

    #[test]
    fn test_computed_fields_override_extra_data() {
        let mut extra = Map::new();
        extra.insert("name".to_string(), json!("X"));
        extra.insert("promo".to_string(), json!("deal"));

        let mut ctx = DataContext::from_extra(extra);
        ctx.set_path("name", "Y").unwrap();

        assert_eq!(ctx.get("name"), Some(&json!("Y")));
        // Unrelated caller data survives
        assert_eq!(ctx.get("promo"), Some(&json!("deal")));
    }

    #[test]
    fn test_nested_merge_preserves_sibling_keys() {
        let mut extra = Map::new();
        extra.insert("misc".to_string(), json!({ "campaign": "spring" }));

        let mut ctx = DataContext::from_extra(extra);
        ctx.set_path("misc.time_raw", 42).unwrap();

        assert_eq!(ctx.get("misc.campaign"), Some(&json!("spring")));
        assert_eq!(ctx.get("misc.time_raw"), Some(&json!(42)));
    }

    #[test]
    fn test_non_object_intermediate_is_replaced() {
        let mut extra = Map::new();
        extra.insert("misc".to_string(), json!("not an object"));

        let mut ctx = DataContext::from_extra(extra);
        ctx.set_path("misc.time_raw", 42).unwrap();

        assert_eq!(ctx.get("misc.time_raw"), Some(&json!(42)));
    }
}
