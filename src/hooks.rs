use std::fmt;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use log::debug;
use serde::Serialize;

use crate::config::{HookScripts, PromptSpec};
use crate::constants::HOOKS_PROMPT_NAME;
use crate::context::RenderContext;
use crate::error::{SproutError, SproutResult};
use crate::prompt::{Prompter, Response};

/// The points in a generation run where a template can hook in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Hook {
    /// After the template tree is copied, before any file is selected
    OnBeforeCreate,
    /// After file selection, before substitution
    OnBeforeRender,
    /// After every file is rendered
    OnAfterCreate,
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Hook::OnBeforeCreate => "on_before_create",
            Hook::OnBeforeRender => "on_before_render",
            Hook::OnAfterCreate => "on_after_create",
        };
        f.write_str(name)
    }
}

impl HookScripts {
    pub fn script(&self, hook: Hook) -> Option<&Path> {
        match hook {
            Hook::OnBeforeCreate => self.on_before_create.as_deref(),
            Hook::OnBeforeRender => self.on_before_render.as_deref(),
            Hook::OnAfterCreate => self.on_after_create.as_deref(),
        }
    }
}

/// Everything a hook gets to see.
#[derive(Debug, Serialize)]
pub struct HookInvocation<'a> {
    pub hook: Hook,
    #[serde(skip)]
    pub script: &'a Path,
    pub template_dir: &'a Path,
    pub output_dir: &'a Path,
    pub context: &'a RenderContext,
}

/// Executes a declared hook. A returned error aborts the run.
pub trait HookRunner {
    fn run(&self, invocation: &HookInvocation) -> SproutResult<()>;
}

/// Runs hooks as executables with the output directory as working directory.
///
/// The invocation is written to the script's stdin as JSON.
#[derive(Debug, Default)]
pub struct ScriptHookRunner;

impl ScriptHookRunner {
    pub fn new() -> Self {
        Self
    }
}

impl HookRunner for ScriptHookRunner {
    fn run(&self, invocation: &HookInvocation) -> SproutResult<()> {
        debug!("Running {} hook: {}", invocation.hook, invocation.script.display());

        let payload =
            serde_json::to_vec(invocation).map_err(|e| SproutError::HookError(e.to_string()))?;

        let mut child = Command::new(invocation.script)
            .current_dir(invocation.output_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| {
                SproutError::HookError(format!(
                    "failed to start '{}': {e}",
                    invocation.script.display()
                ))
            })?;

        // The pipe is closed when `stdin` drops, before waiting.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(&payload),
            None => Ok(()),
        };

        let status = child.wait()?;
        if !status.success() {
            return Err(SproutError::HookError(format!(
                "{} hook failed with status: {status}",
                invocation.hook
            )));
        }

        match written {
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                debug!("{} hook exited without reading its payload", invocation.hook);
                Ok(())
            }
            Err(e) => Err(e.into()),
            Ok(()) => Ok(()),
        }
    }
}

/// Asks whether the template's hooks may run.
///
/// Returns `Some(true)` without asking when `skip_hooks_check` is set or the
/// template declares no hooks, `None` when the user aborts the question.
pub fn confirm_hooks_execution(
    prompter: &dyn Prompter,
    hooks: &HookScripts,
    skip_hooks_check: bool,
) -> SproutResult<Option<bool>> {
    if skip_hooks_check || hooks.is_empty() {
        return Ok(Some(true));
    }

    let prompt = PromptSpec::confirm(
        HOOKS_PROMPT_NAME,
        "WARNING: This template contains hooks that will execute commands on your system. Do you want to run these hooks?",
        false,
    );
    match prompter.prompt(&prompt)? {
        Response::Answered(value) => Ok(Some(value.as_bool().unwrap_or(false))),
        Response::Cancelled => Ok(None),
    }
}

/// Invokes `hook` if the template declares it; otherwise does nothing.
pub fn invoke_hook(
    runner: &dyn HookRunner,
    hooks: &HookScripts,
    hook: Hook,
    template_dir: &Path,
    output_dir: &Path,
    context: &RenderContext,
) -> SproutResult<()> {
    let Some(script) = hooks.script(hook) else {
        debug!("No {hook} hook declared");
        return Ok(());
    };

    runner.run(&HookInvocation { hook, script, template_dir, output_dir, context })
}
