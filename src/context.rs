//! Render context assembly.

use indexmap::IndexMap;
use serde::Serialize;

/// Final mapping of substitution keys to values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RenderContext(serde_json::Map<String, serde_json::Value>);

impl RenderContext {
    /// Merges prompt answers with the template's static context.
    ///
    /// Static context wins over an identically named answer.
    pub fn build(
        answers: &IndexMap<String, serde_json::Value>,
        static_context: &IndexMap<String, serde_json::Value>,
    ) -> Self {
        let mut values = serde_json::Map::new();
        for (key, value) in answers.iter().chain(static_context) {
            values.insert(key.clone(), value.clone());
        }
        Self(values)
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::Value::Object(self.0.clone())
    }
}
