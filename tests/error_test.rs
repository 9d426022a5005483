use std::io;

use sprout::error::SproutError;

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: SproutError = io_err.into();

    match err {
        SproutError::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = SproutError::ConfigError("invalid config".to_string());
    assert_eq!(err.to_string(), "Configuration error: invalid config.");

    let err = SproutError::TemplateError("rendering failed".to_string());
    assert_eq!(err.to_string(), "Template error: rendering failed.");

    let err = SproutError::TemplateDirectoryMissing { template_dir: "/tmp/tpl".to_string() };
    assert_eq!(err.to_string(), "No `template` directory found in '/tmp/tpl'.");
}
