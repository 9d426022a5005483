//! Template descriptor handling for Sprout.
//! Locates the optional descriptor file of a template, evaluates its string
//! values against the invocation context and normalizes it into a
//! `TemplateDescriptor` with every default already substituted.
//!
//! Only strings containing `{{`, `{%` or `{#` are evaluated, and evaluation
//! always yields a string: `"{{ timestamp }}"` becomes `"1718000000000"`, not
//! a number. Literal template syntax meant for the generated files must be
//! wrapped in `{% raw %}...{% endraw %}`.

use crate::constants::{CONFIG_FILES, DEFAULT_RENDER_FILES, TEMPLATE_DIR};
use crate::error::{SproutError, SproutResult};
use crate::renderer::{DelimiterTags, MiniJinjaRenderer, TemplateRenderer};
use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Answer constraint for free-text prompts.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Validation {
    pub pattern: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// An option offered by `select` and `multiselect` prompts.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Choice {
    Plain(String),
    Labeled { title: String, value: serde_json::Value },
}

impl Choice {
    pub fn title(&self) -> &str {
        match self {
            Choice::Plain(title) => title,
            Choice::Labeled { title, .. } => title,
        }
    }

    pub fn value(&self) -> serde_json::Value {
        match self {
            Choice::Plain(title) => serde_json::Value::String(title.clone()),
            Choice::Labeled { value, .. } => value.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PromptKind {
    Text {
        #[serde(default)]
        initial: Option<String>,
        #[serde(default)]
        validate: Option<Validation>,
    },
    Password {
        #[serde(default)]
        validate: Option<Validation>,
    },
    Number {
        #[serde(default)]
        initial: Option<f64>,
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    Confirm {
        #[serde(default)]
        initial: bool,
    },
    Select {
        choices: Vec<Choice>,
        #[serde(default)]
        initial: usize,
    },
    MultiSelect {
        choices: Vec<Choice>,
        #[serde(default)]
        selected: Vec<usize>,
    },
}

/// A single question asked during generation.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PromptSpec {
    pub name: String,
    #[serde(default)]
    pub message: String,
    #[serde(flatten)]
    pub kind: PromptKind,
}

impl PromptSpec {
    pub fn confirm<S: Into<String>>(name: S, message: S, initial: bool) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            kind: PromptKind::Confirm { initial },
        }
    }
}

/// Hook scripts declared by a template. Paths are relative to the template
/// root in the descriptor file and absolute once loaded.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct HookScripts {
    #[serde(default, alias = "onBeforeCreate")]
    pub on_before_create: Option<PathBuf>,
    #[serde(default, alias = "onBeforeRender")]
    pub on_before_render: Option<PathBuf>,
    #[serde(default, alias = "onAfterCreate")]
    pub on_after_create: Option<PathBuf>,
}

impl HookScripts {
    pub fn is_empty(&self) -> bool {
        self.on_before_create.is_none()
            && self.on_before_render.is_none()
            && self.on_after_create.is_none()
    }

    fn resolve(self, template_root: &Path) -> SproutResult<Self> {
        let resolve_one = |script: Option<PathBuf>| -> SproutResult<Option<PathBuf>> {
            let Some(script) = script else {
                return Ok(None);
            };
            let path = template_root.join(&script);
            if !path.is_file() {
                return Err(SproutError::ConfigError(format!(
                    "hook script '{}' does not exist",
                    path.display()
                )));
            }
            Ok(Some(path))
        };

        Ok(Self {
            on_before_create: resolve_one(self.on_before_create)?,
            on_before_render: resolve_one(self.on_before_render)?,
            on_after_create: resolve_one(self.on_after_create)?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDescriptor {
    context: IndexMap<String, serde_json::Value>,
    prompts: Vec<PromptSpec>,
    #[serde(alias = "renderFiles")]
    render_files: Option<OneOrMany>,
    #[serde(alias = "customTags")]
    custom_tags: Option<(String, String)>,
    hooks: HookScripts,
}

/// Normalized template metadata. Consumers never need to apply defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateDescriptor {
    pub prompts: Vec<PromptSpec>,
    pub context: IndexMap<String, serde_json::Value>,
    pub render_files: Vec<String>,
    pub tags: DelimiterTags,
    pub hooks: HookScripts,
}

impl Default for TemplateDescriptor {
    fn default() -> Self {
        Self {
            prompts: Vec::new(),
            context: IndexMap::new(),
            render_files: default_render_files(),
            tags: DelimiterTags::default(),
            hooks: HookScripts::default(),
        }
    }
}

fn default_render_files() -> Vec<String> {
    DEFAULT_RENDER_FILES.iter().map(|pattern| pattern.to_string()).collect()
}

/// Returns the directory whose tree is copied into the output.
///
/// # Errors
/// * `SproutError::TemplateDirectoryMissing` if `<template_root>/template` is not a directory
pub fn get_template_files_dir<P: AsRef<Path>>(template_root: P) -> SproutResult<PathBuf> {
    let template_root = template_root.as_ref();
    let files_dir = template_root.join(TEMPLATE_DIR);
    if !files_dir.is_dir() {
        return Err(SproutError::TemplateDirectoryMissing {
            template_dir: template_root.display().to_string(),
        });
    }
    Ok(files_dir)
}

/// Reads the first descriptor file found in the template root.
///
/// # Returns
/// * `SproutResult<Option<String>>` - Contents of the descriptor, `None` when the
///   template has no descriptor at all
pub fn load_config<P: AsRef<Path>>(
    template_root: P,
    config_files: &[&str],
) -> SproutResult<Option<String>> {
    for file in config_files {
        let config_path = template_root.as_ref().join(file);
        if config_path.is_file() {
            debug!("Loading configuration from {}", config_path.display());
            return Ok(Some(std::fs::read_to_string(&config_path)?));
        }
    }
    debug!("No descriptor found (tried: {})", config_files.join(", "));
    Ok(None)
}

/// Builds the values available to descriptor expressions.
///
/// `timestamp` is captured once here, so every expression of one load sees
/// the same instant.
pub fn evaluation_context<P: AsRef<Path>>(template: P, output: P) -> serde_json::Value {
    let template = template.as_ref();
    let output = output.as_ref();
    let output_name = output
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default();

    serde_json::json!({
        "template": template.display().to_string(),
        "output": output.display().to_string(),
        "output_name": output_name,
        "timestamp": timestamp,
    })
}

/// Evaluates a descriptor string. Strings without template syntax are
/// returned verbatim.
fn evaluate_str(
    value: &str,
    context: &serde_json::Value,
    engine: &dyn TemplateRenderer,
) -> SproutResult<String> {
    if ["{{", "{%", "{#"].iter().any(|marker| value.contains(marker)) {
        engine.render(value, context)
    } else {
        Ok(value.to_string())
    }
}

/// Processes a descriptor value, recursively evaluating every string in it.
fn process_config_value(
    value: &serde_json::Value,
    context: &serde_json::Value,
    engine: &dyn TemplateRenderer,
) -> SproutResult<serde_json::Value> {
    match value {
        serde_json::Value::String(s) => {
            Ok(serde_json::Value::String(evaluate_str(s, context, engine)?))
        }
        serde_json::Value::Array(arr) => arr
            .iter()
            .map(|item| process_config_value(item, context, engine))
            .collect::<SproutResult<Vec<_>>>()
            .map(serde_json::Value::Array),
        serde_json::Value::Object(obj) => {
            let mut processed_obj = serde_json::Map::new();
            for (k, v) in obj {
                processed_obj.insert(k.clone(), process_config_value(v, context, engine)?);
            }
            Ok(serde_json::Value::Object(processed_obj))
        }
        _ => Ok(value.clone()),
    }
}

fn process_prompt(
    mut prompt: PromptSpec,
    context: &serde_json::Value,
    engine: &dyn TemplateRenderer,
) -> SproutResult<PromptSpec> {
    prompt.message = evaluate_str(&prompt.message, context, engine)?;
    if let PromptKind::Text { initial: Some(initial), .. } = &mut prompt.kind {
        *initial = evaluate_str(initial, context, engine)?;
    }
    Ok(prompt)
}

/// Parses descriptor content and evaluates it.
///
/// # Arguments
/// * `content` - Raw descriptor, JSON or YAML
/// * `engine` - Renderer used to evaluate string values
/// * `context` - Values available to descriptor expressions
///
/// # Errors
/// * `SproutError::ConfigError` if the content cannot be parsed or declares empty tags
pub fn parse_config(
    content: &str,
    engine: &dyn TemplateRenderer,
    context: &serde_json::Value,
) -> SproutResult<TemplateDescriptor> {
    let raw: RawDescriptor = match serde_json::from_str(content) {
        Ok(v) => v,
        Err(_) if content.trim().is_empty() => RawDescriptor::default(),
        Err(_) => serde_yaml::from_str::<Option<RawDescriptor>>(content)
            .map_err(|e| SproutError::ConfigError(format!("Invalid configuration format: {e}")))?
            .unwrap_or_default(),
    };

    let mut static_context = IndexMap::new();
    for (key, value) in raw.context {
        let processed = process_config_value(&value, context, engine)?;
        static_context.insert(key, processed);
    }

    let prompts = raw
        .prompts
        .into_iter()
        .map(|prompt| process_prompt(prompt, context, engine))
        .collect::<SproutResult<Vec<_>>>()?;

    let render_files: Vec<String> = match raw.render_files {
        Some(OneOrMany::One(pattern)) => vec![pattern],
        Some(OneOrMany::Many(patterns)) => patterns,
        None => Vec::new(),
    }
    .into_iter()
    .filter(|pattern| !pattern.is_empty())
    .collect();

    let tags = match raw.custom_tags {
        Some((open, close)) => {
            if open.trim().is_empty() || close.trim().is_empty() {
                return Err(SproutError::ConfigError(
                    "custom_tags must contain two non-empty tags".to_string(),
                ));
            }
            DelimiterTags::new(open, close)
        }
        None => DelimiterTags::default(),
    };

    Ok(TemplateDescriptor {
        prompts,
        context: static_context,
        render_files: if render_files.is_empty() { default_render_files() } else { render_files },
        tags,
        hooks: raw.hooks,
    })
}

/// A template root that passed validation, ready for generation.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTemplate {
    /// The `template` subdirectory, copied into the output
    pub files_dir: PathBuf,
    pub descriptor: TemplateDescriptor,
}

/// Loads the template at `template_root`.
///
/// The `template` subdirectory is checked before anything is read. A template
/// without a descriptor yields `TemplateDescriptor::default()`.
pub fn get_config<P: AsRef<Path>>(template_root: P, output: P) -> SproutResult<LoadedTemplate> {
    let template_root = template_root.as_ref();
    let files_dir = get_template_files_dir(template_root)?;

    let Some(content) = load_config(template_root, &CONFIG_FILES)? else {
        return Ok(LoadedTemplate { files_dir, descriptor: TemplateDescriptor::default() });
    };

    let engine = MiniJinjaRenderer::new();
    let context = evaluation_context(template_root, output.as_ref());
    let mut descriptor = parse_config(&content, &engine, &context)?;
    descriptor.hooks = descriptor.hooks.resolve(template_root)?;

    Ok(LoadedTemplate { files_dir, descriptor })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_context_output_name() {
        let context = evaluation_context("/tmp/tpl", "/home/me/projects/My App");
        assert_eq!(context["output_name"], "My App");
        assert_eq!(context["template"], "/tmp/tpl");
        assert!(context["timestamp"].as_u64().is_some());
    }

    #[test]
    fn test_hook_scripts_is_empty() {
        assert!(HookScripts::default().is_empty());
        let hooks = HookScripts {
            on_after_create: Some(PathBuf::from("hooks/after")),
            ..Default::default()
        };
        assert!(!hooks.is_empty());
    }
}
