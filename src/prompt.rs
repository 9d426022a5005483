//! Interactive prompting for Sprout.
//! The `Prompter` trait is the seam between the prompt sequence and the
//! terminal; `DialoguerPrompter` is the interactive implementation.

use crate::config::{Choice, PromptKind, PromptSpec, Validation};
use crate::error::{SproutError, SproutResult};
use dialoguer::{Confirm, Input, MultiSelect, Password, Select};
use regex::Regex;
use std::io;

/// What the user did with a single prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Answered(serde_json::Value),
    /// The user aborted the interaction (Esc, Ctrl-C)
    Cancelled,
}

/// Asks a single question and returns the answer.
pub trait Prompter {
    fn prompt(&self, spec: &PromptSpec) -> SproutResult<Response>;
}

/// Terminal prompter built on dialoguer.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

fn compile_validation(validation: &Option<Validation>) -> SproutResult<Option<(Regex, String)>> {
    let Some(validation) = validation else {
        return Ok(None);
    };
    let pattern = Regex::new(&validation.pattern).map_err(|e| {
        SproutError::ConfigError(format!("invalid validation pattern '{}': {e}", validation.pattern))
    })?;
    let message = validation
        .message
        .clone()
        .unwrap_or_else(|| format!("Value must match {}", validation.pattern));
    Ok(Some((pattern, message)))
}

/// Converts a dialoguer failure into a response, treating interrupts as cancellation.
fn interrupted(err: dialoguer::Error) -> SproutResult<Response> {
    match err {
        dialoguer::Error::IO(e) if e.kind() == io::ErrorKind::Interrupted => {
            Ok(Response::Cancelled)
        }
        err => Err(SproutError::PromptError(err.to_string())),
    }
}

fn parse_number(input: &str) -> Option<serde_json::Value> {
    let input = input.trim();
    if let Ok(int) = input.parse::<i64>() {
        return Some(int.into());
    }
    input
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(serde_json::Value::Number)
}

fn check_number_range(
    input: &str,
    min: Option<f64>,
    max: Option<f64>,
) -> std::result::Result<(), String> {
    let value = parse_number(input)
        .and_then(|value| value.as_f64())
        .ok_or_else(|| "Please enter a number".to_string())?;
    if min.is_some_and(|min| value < min) || max.is_some_and(|max| value > max) {
        return Err(format!(
            "Number must be between {} and {}",
            min.map_or("-inf".to_string(), |v| v.to_string()),
            max.map_or("inf".to_string(), |v| v.to_string())
        ));
    }
    Ok(())
}

fn choice_titles(choices: &[Choice]) -> Vec<&str> {
    choices.iter().map(Choice::title).collect()
}

impl Prompter for DialoguerPrompter {
    fn prompt(&self, spec: &PromptSpec) -> SproutResult<Response> {
        let message = spec.message.as_str();
        match &spec.kind {
            PromptKind::Text { initial, validate } => {
                let validation = compile_validation(validate)?;
                let mut input = Input::<String>::new().with_prompt(message).allow_empty(true);
                if let Some(initial) = initial {
                    input = input.default(initial.clone());
                }
                if let Some((pattern, error)) = &validation {
                    input = input.validate_with(move |value: &String| {
                        if pattern.is_match(value) {
                            Ok(())
                        } else {
                            Err(error.clone())
                        }
                    });
                }
                match input.interact_text() {
                    Ok(value) => Ok(Response::Answered(value.into())),
                    Err(e) => interrupted(e),
                }
            }
            PromptKind::Password { validate } => {
                let validation = compile_validation(validate)?;
                let mut password = Password::new().with_prompt(message).allow_empty_password(true);
                if let Some((pattern, error)) = &validation {
                    password = password.validate_with(move |value: &String| {
                        if pattern.is_match(value) {
                            Ok(())
                        } else {
                            Err(error.clone())
                        }
                    });
                }
                match password.interact() {
                    Ok(value) => Ok(Response::Answered(value.into())),
                    Err(e) => interrupted(e),
                }
            }
            PromptKind::Number { initial, min, max } => {
                let (min, max) = (*min, *max);
                let mut input = Input::<String>::new().with_prompt(message).validate_with(
                    move |value: &String| check_number_range(value, min, max),
                );
                if let Some(initial) = initial {
                    input = input.default(initial.to_string());
                }
                match input.interact_text() {
                    Ok(value) => Ok(Response::Answered(
                        parse_number(&value).unwrap_or(serde_json::Value::Null),
                    )),
                    Err(e) => interrupted(e),
                }
            }
            PromptKind::Confirm { initial } => {
                match Confirm::new().with_prompt(message).default(*initial).interact_opt() {
                    Ok(Some(value)) => Ok(Response::Answered(value.into())),
                    Ok(None) => Ok(Response::Cancelled),
                    Err(e) => interrupted(e),
                }
            }
            PromptKind::Select { choices, initial } => {
                if choices.is_empty() {
                    return Err(SproutError::ConfigError(format!(
                        "prompt '{}' has no choices",
                        spec.name
                    )));
                }
                let selection = Select::new()
                    .with_prompt(message)
                    .items(&choice_titles(choices))
                    .default((*initial).min(choices.len() - 1))
                    .interact_opt();
                match selection {
                    Ok(Some(index)) => Ok(Response::Answered(choices[index].value())),
                    Ok(None) => Ok(Response::Cancelled),
                    Err(e) => interrupted(e),
                }
            }
            PromptKind::MultiSelect { choices, selected } => {
                let defaults: Vec<bool> =
                    (0..choices.len()).map(|index| selected.contains(&index)).collect();
                let selection = MultiSelect::new()
                    .with_prompt(message)
                    .items(&choice_titles(choices))
                    .defaults(&defaults)
                    .interact_opt();
                match selection {
                    Ok(Some(indices)) => Ok(Response::Answered(serde_json::Value::Array(
                        indices.into_iter().map(|index| choices[index].value()).collect(),
                    ))),
                    Ok(None) => Ok(Response::Cancelled),
                    Err(e) => interrupted(e),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("42"), Some(json!(42)));
        assert_eq!(parse_number(" 1.5 "), Some(json!(1.5)));
        assert_eq!(parse_number("abc"), None);
    }

    #[test]
    fn test_check_number_range() {
        assert!(check_number_range("5", Some(1.0), Some(10.0)).is_ok());
        assert!(check_number_range("0", Some(1.0), None).is_err());
        assert!(check_number_range("11", None, Some(10.0)).is_err());
        assert!(check_number_range("x", None, None).is_err());
    }
}
