//! Template renderers for Sprout.
//! `MiniJinjaRenderer` evaluates descriptor values at load time, while
//! `TagRenderer` performs the plain variable substitution applied to copied files.
use crate::error::{SproutError, SproutResult};
use cruet::Inflector;
use minijinja::Environment;
use regex::Regex;

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `template` - Template string to render
    /// * `context` - Context variables for rendering
    ///
    /// # Returns
    /// * `SproutResult<String>` - Rendered template string
    fn render(&self, template: &str, context: &serde_json::Value) -> SproutResult<String>;
}

/// Lowercases the input and collapses every run of characters outside
/// `[a-z0-9_]` into a single `-`.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut in_gap = false;
    for c in value.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
            slug.push(c);
            in_gap = false;
        } else if !in_gap {
            slug.push('-');
            in_gap = true;
        }
    }
    slug
}

/// MiniJinja-based renderer used to evaluate template descriptors.
pub struct MiniJinjaRenderer {
    /// MiniJinja environment instance
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a renderer with the case-conversion filters registered.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.add_filter("slugify", |value: String| slugify(&value));
        env.add_filter("kebab_case", |value: String| value.to_kebab_case());
        env.add_filter("snake_case", |value: String| value.to_snake_case());
        env.add_filter("camel_case", |value: String| value.to_camel_case());
        env.add_filter("pascal_case", |value: String| value.to_pascal_case());
        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, template: &str, context: &serde_json::Value) -> SproutResult<String> {
        self.env.render_str(template, context).map_err(SproutError::MinijinjaError)
    }
}

/// Open/close token pair marking substitution points inside file text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimiterTags {
    pub open: String,
    pub close: String,
}

impl DelimiterTags {
    pub fn new<S: Into<String>>(open: S, close: S) -> Self {
        Self { open: open.into(), close: close.into() }
    }
}

impl Default for DelimiterTags {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_OPEN_TAG, crate::constants::DEFAULT_CLOSE_TAG)
    }
}

/// Variable-interpolation renderer working on `<open> key <close>` tokens.
///
/// Keys are whitespace-trimmed and may use dots to reach into nested objects.
/// Keys missing from the context render as an empty string. A single pass
/// is made over the input, so substituted values are never re-scanned.
#[derive(Debug, Clone)]
pub struct TagRenderer {
    pattern: Regex,
}

impl TagRenderer {
    /// Compiles the token matcher for the given delimiters.
    ///
    /// # Errors
    /// * `SproutError::TemplateError` if either tag is empty or blank
    pub fn new(tags: &DelimiterTags) -> SproutResult<Self> {
        if tags.open.trim().is_empty() || tags.close.trim().is_empty() {
            return Err(SproutError::TemplateError(format!(
                "invalid delimiter tags ['{}', '{}']",
                tags.open, tags.close
            )));
        }
        let pattern = format!(
            r"{}[ \t]*([^\r\n]*?)[ \t]*{}",
            regex::escape(&tags.open),
            regex::escape(&tags.close)
        );
        let pattern = Regex::new(&pattern).map_err(|e| SproutError::TemplateError(e.to_string()))?;
        Ok(Self { pattern })
    }
}

fn lookup<'a>(context: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
    if let Some(value) = context.get(key) {
        return Some(value);
    }
    if !key.contains('.') {
        return None;
    }
    key.split('.').try_fold(context, |current, part| current.get(part))
}

fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl TemplateRenderer for TagRenderer {
    fn render(&self, template: &str, context: &serde_json::Value) -> SproutResult<String> {
        let rendered = self.pattern.replace_all(template, |caps: &regex::Captures| {
            let key = caps[1].trim();
            lookup(context, key).map(display_value).unwrap_or_default()
        });
        Ok(rendered.into_owned())
    }
}
