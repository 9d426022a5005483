//! Common constants used throughout the Sprout application.

/// Supported descriptor file names, tried in order
pub const CONFIG_FILES: [&str; 3] = ["config.json", "config.yml", "config.yaml"];

/// Subdirectory of a template holding the tree that gets copied
pub const TEMPLATE_DIR: &str = "template";

/// Reserved prompt name for the overwrite confirmation
pub const OVERWRITE_PROMPT_NAME: &str = "__overwriteOutput__";

/// Reserved prompt name for the hook execution confirmation
pub const HOOKS_PROMPT_NAME: &str = "__runHooks__";

/// Files rendered when a template does not declare its own patterns
pub const DEFAULT_RENDER_FILES: [&str; 3] = [
    "**/*.{html,json,vue,js,ts,jsx,tsx}",
    "**/.env",
    "**/.env.*",
];

/// Delimiters used when a template does not declare `custom_tags`
pub const DEFAULT_OPEN_TAG: &str = "<%=";
pub const DEFAULT_CLOSE_TAG: &str = "%>";
