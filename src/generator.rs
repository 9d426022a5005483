//! End-to-end generation of a project from a template.
//!
//! A run moves strictly forward through these stages:
//!
//! 1. load the template descriptor
//! 2. prompt (may end the run as cancelled, before anything is touched)
//! 3. clear the existing output and copy the template tree
//! 4. `on_before_create`, select files, `on_before_render`
//! 5. render the selected files concurrently
//! 6. `on_after_create`
//!
//! A failure after step 2 leaves the output directory as far as the run got:
//! copied, partially rendered or fully rendered. Nothing is rolled back.

use std::path::PathBuf;

use log::{debug, warn};

use crate::answers::{build_prompts, get_answers, is_truthy, PromptOutcome};
use crate::config::{get_config, LoadedTemplate};
use crate::constants::OVERWRITE_PROMPT_NAME;
use crate::context::RenderContext;
use crate::error::SproutResult;
use crate::hooks::{confirm_hooks_execution, invoke_hook, Hook, HookRunner, ScriptHookRunner};
use crate::processor::{copy_tree, output_exists, remove_output, render_files, select_render_files};
use crate::prompt::{DialoguerPrompter, Prompter};
use crate::renderer::TagRenderer;

/// Input of a single generation run.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Template root, containing `template/` and optionally a descriptor
    pub template: PathBuf,
    /// Destination of the generated project
    pub output: PathBuf,
    /// Suppress progress output
    pub silent: bool,
    /// Answers that are used instead of asking
    pub preloaded_answers: serde_json::Value,
    /// Run hooks without asking first
    pub skip_hooks_check: bool,
    /// Number of render workers, `None` for the default pool
    pub jobs: Option<usize>,
}

impl GenerationRequest {
    pub fn new<P: Into<PathBuf>>(template: P, output: P) -> Self {
        Self {
            template: template.into(),
            output: output.into(),
            silent: false,
            preloaded_answers: serde_json::Value::Object(serde_json::Map::new()),
            skip_hooks_check: false,
            jobs: None,
        }
    }
}

/// Runs generation against the given prompt and hook backends.
pub struct Generator<'a> {
    prompter: &'a dyn Prompter,
    hook_runner: &'a dyn HookRunner,
}

impl<'a> Generator<'a> {
    pub fn new(prompter: &'a dyn Prompter, hook_runner: &'a dyn HookRunner) -> Self {
        Self { prompter, hook_runner }
    }

    /// Generates the project described by `request`.
    ///
    /// # Returns
    /// * `Ok(true)` - the project was generated
    /// * `Ok(false)` - the user cancelled or refused to overwrite; the output is untouched
    pub fn generate(&self, request: &GenerationRequest) -> SproutResult<bool> {
        let report = |message: &str| {
            if !request.silent {
                println!("{message}");
            }
        };
        let template_root = request.template.as_path();
        let output_root = request.output.as_path();

        debug!("Loading template from {}", template_root.display());
        let LoadedTemplate { files_dir, descriptor } = get_config(template_root, output_root)?;
        let renderer = TagRenderer::new(&descriptor.tags)?;

        let output_existed = output_exists(output_root);
        let prompts = build_prompts(output_existed, &descriptor.prompts);
        let answers =
            match get_answers(self.prompter, &prompts, &request.preloaded_answers)? {
                PromptOutcome::Answers(answers) => answers,
                PromptOutcome::Cancelled => {
                    report("Canceled.");
                    return Ok(false);
                }
            };

        if output_existed
            && !answers.get(OVERWRITE_PROMPT_NAME).is_some_and(is_truthy)
        {
            report("Canceled.");
            return Ok(false);
        }

        let run_hooks = match confirm_hooks_execution(
            self.prompter,
            &descriptor.hooks,
            request.skip_hooks_check,
        )? {
            Some(run_hooks) => run_hooks,
            None => {
                report("Canceled.");
                return Ok(false);
            }
        };
        if !run_hooks {
            warn!("Hooks declined, generating without them");
        }

        if output_existed {
            remove_output(output_root)?;
        }
        let copied = copy_tree(files_dir.as_path(), output_root)?;
        debug!("Copied {copied} files to {}", output_root.display());

        let context = RenderContext::build(&answers, &descriptor.context);
        let hook = |hook: Hook| -> SproutResult<()> {
            if !run_hooks {
                return Ok(());
            }
            invoke_hook(
                self.hook_runner,
                &descriptor.hooks,
                hook,
                template_root,
                output_root,
                &context,
            )
        };

        hook(Hook::OnBeforeCreate)?;

        let files = select_render_files(output_root, &descriptor.render_files)?;
        debug!("Selected {} files for rendering", files.len());

        hook(Hook::OnBeforeRender)?;

        render_files(
            output_root,
            &files,
            &renderer,
            &context.to_value(),
            request.jobs,
            request.silent,
        )?;

        hook(Hook::OnAfterCreate)?;

        report("Done.");
        Ok(true)
    }
}

/// Generates a project interactively, running hooks as scripts.
pub fn generate(request: &GenerationRequest) -> SproutResult<bool> {
    let prompter = DialoguerPrompter::new();
    let hook_runner = ScriptHookRunner::new();
    Generator::new(&prompter, &hook_runner).generate(request)
}
