//! Prompt sequencing for Sprout.
//! Builds the effective prompt list for a run and collects the answers,
//! honoring preloaded answers, overwrite refusal and user cancellation.

use crate::config::PromptSpec;
use crate::constants::OVERWRITE_PROMPT_NAME;
use crate::error::SproutResult;
use crate::prompt::{Prompter, Response};
use indexmap::IndexMap;
use log::debug;
use std::io::Read;

pub type Answers = IndexMap<String, serde_json::Value>;

/// Result of running a prompt sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptOutcome {
    Answers(Answers),
    Cancelled,
}

/// JavaScript-style truthiness used for the overwrite answer.
pub fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Returns the overwrite confirmation prompt.
pub fn overwrite_prompt() -> PromptSpec {
    PromptSpec::confirm(
        OVERWRITE_PROMPT_NAME,
        "Output directory exists. Should I overwrite it?",
        false,
    )
}

/// Builds the ordered prompt list: the overwrite confirmation first when the
/// output already exists, then the template's prompts in declared order.
pub fn build_prompts(output_exists: bool, template_prompts: &[PromptSpec]) -> Vec<PromptSpec> {
    let mut prompts = Vec::with_capacity(template_prompts.len() + 1);
    if output_exists {
        prompts.push(overwrite_prompt());
    }
    prompts.extend(template_prompts.iter().cloned());
    prompts
}

/// Asks every prompt in order.
///
/// A preloaded answer for a prompt's name is used instead of asking. A falsy
/// answer to the overwrite confirmation ends the sequence; the answers
/// gathered so far are returned. Cancellation discards everything.
pub fn get_answers(
    prompter: &dyn Prompter,
    prompts: &[PromptSpec],
    preloaded_answers: &serde_json::Value,
) -> SproutResult<PromptOutcome> {
    let mut answers = Answers::new();

    for prompt in prompts {
        let value = match preloaded_answers.get(&prompt.name) {
            Some(value) => {
                debug!("Using preloaded answer for '{}'", prompt.name);
                value.clone()
            }
            None => match prompter.prompt(prompt)? {
                Response::Answered(value) => value,
                Response::Cancelled => {
                    debug!("Prompting cancelled at '{}'", prompt.name);
                    return Ok(PromptOutcome::Cancelled);
                }
            },
        };

        let refused = prompt.name == OVERWRITE_PROMPT_NAME && !is_truthy(&value);
        answers.insert(prompt.name.clone(), value);
        if refused {
            debug!("Overwrite refused, skipping remaining prompts");
            break;
        }
    }

    Ok(PromptOutcome::Answers(answers))
}

/// Reads a JSON document of preloaded answers from stdin.
pub fn load_from_stdin() -> SproutResult<serde_json::Value> {
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(parse_preloaded_answers(&buffer))
}

/// Parses preloaded answers. Anything but a JSON object yields no answers.
pub fn parse_preloaded_answers(content: &str) -> serde_json::Value {
    match serde_json::from_str(content.trim()) {
        Ok(value @ serde_json::Value::Object(_)) => value,
        _ => serde_json::Value::Object(serde_json::Map::new()),
    }
}

/// Collects the answers known before prompting starts.
///
/// # Arguments
/// * `take_from_stdin` - Read a JSON object of answers from stdin
/// * `force` - Pre-answer the overwrite confirmation with `true`
pub fn get_preloaded_answers(take_from_stdin: bool, force: bool) -> SproutResult<serde_json::Value> {
    let mut preloaded = if take_from_stdin {
        load_from_stdin()?
    } else {
        serde_json::Value::Object(serde_json::Map::new())
    };

    if force {
        if let serde_json::Value::Object(map) = &mut preloaded {
            map.insert(OVERWRITE_PROMPT_NAME.to_string(), serde_json::Value::Bool(true));
        }
    }

    Ok(preloaded)
}
