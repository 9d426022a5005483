use clap::Parser;
use sprout::cli::Args;
use sprout::error::SproutError;
use std::ffi::OsString;
use std::path::PathBuf;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("sprout")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_basic_args() {
    let args = make_args(&["./output", "--template", "./template"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.output, Some(PathBuf::from("./output")));
    assert_eq!(parsed.template, Some(PathBuf::from("./template")));
    assert!(!parsed.silent);
    assert!(!parsed.force);
    assert!(!parsed.verbose);
    assert!(!parsed.stdin);
    assert!(!parsed.skip_hooks_check);
    assert_eq!(parsed.jobs, None);
}

#[test]
fn test_all_flags() {
    let args = make_args(&[
        "--silent",
        "--force",
        "--verbose",
        "--skip-hooks-check",
        "--jobs",
        "4",
        "-t",
        "./template",
        "./output",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert!(parsed.silent);
    assert!(parsed.force);
    assert!(parsed.verbose);
    assert!(parsed.skip_hooks_check);
    assert_eq!(parsed.jobs, Some(4));
}

#[test]
fn test_short_flags() {
    let args = make_args(&["-s", "-f", "-v", "-j", "2", "-t", "./template", "./output"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert!(parsed.silent);
    assert!(parsed.force);
    assert!(parsed.verbose);
    assert_eq!(parsed.jobs, Some(2));
}

#[test]
fn test_too_many_args() {
    let args = make_args(&["./output", "extra", "-t", "./template"]);
    assert!(Args::try_parse_from(args).is_err());
}

#[test]
fn test_missing_output() {
    let parsed = Args::try_parse_from(make_args(&["-t", "./template"])).unwrap();
    match parsed.into_request() {
        Err(SproutError::ConfigError(msg)) => assert!(msg.contains("specify output directory")),
        other => panic!("Expected ConfigError, got {other:?}"),
    }
}

#[test]
fn test_missing_template() {
    let parsed = Args::try_parse_from(make_args(&["./output"])).unwrap();
    match parsed.into_request() {
        Err(SproutError::ConfigError(msg)) => assert!(msg.contains("--template")),
        other => panic!("Expected ConfigError, got {other:?}"),
    }
}

#[test]
fn test_into_request() {
    let args = make_args(&["-s", "-f", "-j", "0", "-t", "./template", "./output"]);
    let request = Args::try_parse_from(args).unwrap().into_request().unwrap();

    assert_eq!(request.template, PathBuf::from("./template"));
    assert_eq!(request.output, PathBuf::from("./output"));
    assert!(request.silent);
    assert_eq!(request.jobs, None);
    assert_eq!(request.preloaded_answers, serde_json::json!({"__overwriteOutput__": true}));
}
