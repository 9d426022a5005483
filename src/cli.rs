//! Command-line interface implementation for Sprout.
//! Provides argument parsing and help text formatting using clap.

use clap::{CommandFactory, Parser};
use std::path::PathBuf;

use crate::answers::get_preloaded_answers;
use crate::error::{SproutError, SproutResult};
use crate::generator::GenerationRequest;

/// Command-line arguments structure for Sprout.
#[derive(Parser, Debug)]
#[command(author, version, about = "Sprout: bootstrap new projects from reusable templates", long_about = None)]
pub struct Args {
    /// Directory where the generated project will be created
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Path to the template directory
    #[arg(short, long, value_name = "TEMPLATE")]
    pub template: Option<PathBuf>,

    /// Do not print progress
    #[arg(short, long)]
    pub silent: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Overwrite an existing output directory without asking
    #[arg(short, long)]
    pub force: bool,

    /// Read answers as a JSON object from stdin
    #[arg(long)]
    pub stdin: bool,

    /// Skip confirmation prompts when executing hooks.
    /// This will automatically execute any hooks defined in the template
    /// without asking for confirmation first.
    #[arg(long)]
    pub skip_hooks_check: bool,

    /// Number of files rendered in parallel
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,
}

impl Args {
    /// Resolves the arguments into a generation request.
    ///
    /// # Errors
    /// * `SproutError::ConfigError` if the output or the template is missing
    pub fn into_request(self) -> SproutResult<GenerationRequest> {
        let output = self.output.ok_or_else(|| {
            SproutError::ConfigError(
                "Give your project a home and specify output directory".to_string(),
            )
        })?;
        let template = self.template.ok_or_else(|| {
            SproutError::ConfigError(
                "Where is the template? Use -t or --template flag to tell me".to_string(),
            )
        })?;

        let mut request = GenerationRequest::new(template, output);
        request.silent = self.silent;
        request.skip_hooks_check = self.skip_hooks_check;
        request.jobs = self.jobs.filter(|jobs| *jobs > 0);
        request.preloaded_answers = get_preloaded_answers(self.stdin, self.force)?;
        Ok(request)
    }
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 and the help text if no argument is given at all
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) if args.output.is_none() && args.template.is_none() => {
            print_help();
            std::process::exit(1);
        }
        Ok(args) => args,
        Err(e) => e.exit(),
    }
}

fn print_help() {
    let _ = Args::command()
        .help_template(
            r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
        )
        .print_help();
}
