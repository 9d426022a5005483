#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use sprout::config::PromptSpec;
use sprout::error::{SproutError, SproutResult};
use sprout::hooks::{Hook, HookInvocation, HookRunner};
use sprout::prompt::{Prompter, Response};

/// Replays canned responses and records which prompts were asked.
#[derive(Default)]
pub struct ScriptedPrompter {
    responses: RefCell<VecDeque<Response>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new(responses: Vec<Response>) -> Self {
        Self { responses: RefCell::new(responses.into()), asked: RefCell::new(Vec::new()) }
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn prompt(&self, spec: &PromptSpec) -> SproutResult<Response> {
        self.asked.borrow_mut().push(spec.name.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| SproutError::PromptError(format!("unexpected prompt '{}'", spec.name)))
    }
}

/// What a hook saw when it was invoked.
#[derive(Debug, Clone)]
pub struct HookCall {
    pub hook: Hook,
    pub context: serde_json::Value,
    /// Contents of `observe` inside the output directory, if it existed
    pub observed: Option<String>,
}

/// Records hook invocations instead of running scripts.
pub struct RecordingHooks {
    pub observe: PathBuf,
    pub calls: RefCell<Vec<HookCall>>,
    pub fail_on: Option<Hook>,
}

impl RecordingHooks {
    pub fn new<P: Into<PathBuf>>(observe: P) -> Self {
        Self { observe: observe.into(), calls: RefCell::new(Vec::new()), fail_on: None }
    }

    pub fn hooks(&self) -> Vec<Hook> {
        self.calls.borrow().iter().map(|call| call.hook).collect()
    }
}

impl HookRunner for RecordingHooks {
    fn run(&self, invocation: &HookInvocation) -> SproutResult<()> {
        let observed = fs::read_to_string(invocation.output_dir.join(&self.observe)).ok();
        self.calls.borrow_mut().push(HookCall {
            hook: invocation.hook,
            context: invocation.context.to_value(),
            observed,
        });
        if self.fail_on == Some(invocation.hook) {
            return Err(SproutError::HookError(format!("{} hook failed", invocation.hook)));
        }
        Ok(())
    }
}

/// Writes `files` (relative path, content) under `root`.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (path, content) in files {
        let path = root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

/// Creates a template root with the given template files and descriptor.
pub fn make_template(root: &Path, files: &[(&str, &str)], descriptor: Option<&str>) {
    fs::create_dir_all(root.join("template")).unwrap();
    write_tree(&root.join("template"), files);
    if let Some(descriptor) = descriptor {
        fs::write(root.join("config.yaml"), descriptor).unwrap();
    }
}
