mod common;

use std::path::Path;

use common::ScriptedPrompter;
use serde_json::json;
use sprout::config::HookScripts;
use sprout::context::RenderContext;
use sprout::hooks::{confirm_hooks_execution, Hook, HookInvocation};
use sprout::prompt::Response;

fn declared_hooks() -> HookScripts {
    HookScripts {
        on_after_create: Some("hooks/after.sh".into()),
        ..Default::default()
    }
}

#[test]
fn test_hook_display() {
    assert_eq!(Hook::OnBeforeCreate.to_string(), "on_before_create");
    assert_eq!(Hook::OnBeforeRender.to_string(), "on_before_render");
    assert_eq!(Hook::OnAfterCreate.to_string(), "on_after_create");
}

#[test]
fn test_script_lookup() {
    let hooks = declared_hooks();
    assert_eq!(hooks.script(Hook::OnAfterCreate), Some(Path::new("hooks/after.sh")));
    assert_eq!(hooks.script(Hook::OnBeforeCreate), None);
}

#[test]
fn test_confirm_hooks_execution() {
    let prompter = ScriptedPrompter::default();
    assert_eq!(confirm_hooks_execution(&prompter, &declared_hooks(), true).unwrap(), Some(true));
    assert_eq!(confirm_hooks_execution(&prompter, &HookScripts::default(), false).unwrap(), Some(true));
    assert!(prompter.asked().is_empty());

    let prompter = ScriptedPrompter::new(vec![Response::Answered(json!(false))]);
    assert_eq!(confirm_hooks_execution(&prompter, &declared_hooks(), false).unwrap(), Some(false));

    let prompter = ScriptedPrompter::new(vec![Response::Cancelled]);
    assert_eq!(confirm_hooks_execution(&prompter, &declared_hooks(), false).unwrap(), None);
}

#[test]
fn test_invocation_serialization() {
    let context = RenderContext::build(
        &serde_json::from_value(json!({"key": "value"})).unwrap(),
        &Default::default(),
    );
    let invocation = HookInvocation {
        hook: Hook::OnBeforeRender,
        script: Path::new("/path/to/template/hooks/script"),
        template_dir: Path::new("/path/to/template"),
        output_dir: Path::new("/path/to/output"),
        context: &context,
    };

    let serialized = serde_json::to_value(&invocation).unwrap();
    assert_eq!(
        serialized,
        json!({
            "hook": "on_before_render",
            "template_dir": "/path/to/template",
            "output_dir": "/path/to/output",
            "context": {"key": "value"},
        })
    );
}

#[cfg(unix)]
mod scripts {
    use super::*;
    use sprout::error::SproutError;
    use sprout::hooks::{HookRunner, ScriptHookRunner};
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn write_script(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_script_receives_payload_in_output_dir() {
        let template = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let script = write_script(template.path(), "hook.sh", "#!/bin/sh\ncat > payload.json\n");
        let context = RenderContext::default();

        ScriptHookRunner::new()
            .run(&HookInvocation {
                hook: Hook::OnAfterCreate,
                script: &script,
                template_dir: template.path(),
                output_dir: output.path(),
                context: &context,
            })
            .unwrap();

        let payload: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(output.path().join("payload.json")).unwrap())
                .unwrap();
        assert_eq!(payload["hook"], "on_after_create");
        assert_eq!(payload["context"], json!({}));
    }

    #[test]
    fn test_script_ignoring_large_payload() {
        let template = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        let script = write_script(template.path(), "quiet.sh", "#!/bin/sh\nexit 0\n");
        let context = RenderContext::build(
            &serde_json::from_value(json!({"blob": "x".repeat(256 * 1024)})).unwrap(),
            &Default::default(),
        );

        let result = ScriptHookRunner::new().run(&HookInvocation {
            hook: Hook::OnBeforeCreate,
            script: &script,
            template_dir: template.path(),
            output_dir: output.path(),
            context: &context,
        });
        assert!(result.is_ok(), "unexpected result: {result:?}");
    }

    #[test]
    fn test_failing_script_ignoring_payload() {
        let template = TempDir::new().unwrap();
        let script = write_script(template.path(), "fail.sh", "#!/bin/sh\nexit 1\n");
        let context = RenderContext::build(
            &serde_json::from_value(json!({"blob": "x".repeat(256 * 1024)})).unwrap(),
            &Default::default(),
        );

        let result = ScriptHookRunner::new().run(&HookInvocation {
            hook: Hook::OnAfterCreate,
            script: &script,
            template_dir: template.path(),
            output_dir: template.path(),
            context: &context,
        });
        assert!(matches!(result, Err(SproutError::HookError(_))));
    }

    #[test]
    fn test_failing_script() {
        let template = TempDir::new().unwrap();
        let script = write_script(template.path(), "fail.sh", "#!/bin/sh\nexit 3\n");
        let context = RenderContext::default();

        let result = ScriptHookRunner::new().run(&HookInvocation {
            hook: Hook::OnBeforeCreate,
            script: &script,
            template_dir: template.path(),
            output_dir: template.path(),
            context: &context,
        });
        assert!(matches!(result, Err(SproutError::HookError(_))));
    }
}
