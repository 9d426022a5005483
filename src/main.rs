//! Sprout's application entry point.

use sprout::{
    cli::get_args,
    error::{default_error_handler, SproutResult},
    generate,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    // Logger configuration
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Trace
        } else {
            log::LevelFilter::Off
        })
        .init();

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Resolves the arguments and runs a single generation.
///
/// A cancelled run is a normal outcome and exits with status 0.
fn run(args: sprout::cli::Args) -> SproutResult<()> {
    let request = args.into_request()?;
    let generated = generate(&request)?;
    log::debug!("Generation finished, generated: {generated}");
    Ok(())
}
