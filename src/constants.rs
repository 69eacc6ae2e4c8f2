// src/constants.rs

/// The name of the per-user configuration directory (inside the system config dir).
pub const CONFIG_DIR_NAME: &str = "mtc";

/// The name of the global configuration file (in ~/.config/mtc/).
pub const GLOBAL_CONFIG_FILENAME: &str = "config.toml";

/// The name of the per-project configuration file, stored in the working directory.
pub const PROJECT_CONFIG_FILENAME: &str = ".mtc.toml";

/// Environment variable overriding the API base URL of every config file.
pub const API_BASE_URL_ENV: &str = "MTC_API_BASE_URL";

pub const DEFAULT_API_BASE_URL: &str = "https://app.morethancertified.com/api/v1";

/// Platforms offered on the first submission in a directory: (label, API base URL).
pub const PLATFORMS: &[(&str, &str)] = &[
    ("New Learning Platform", "https://labs.morethancertified.com/api/v1"),
    ("Legacy Video Platform", "https://app.morethancertified.com/api/v1"),
];

/// Exit code recorded when a command could not be launched or its status is unknown.
pub const LAUNCH_FAILURE_EXIT_CODE: i32 = -69;

/// Locale forced on every lesson command so captured text does not depend on the host.
pub const COMMAND_LOCALE: &str = "en_US.UTF-8";

pub const DEFAULT_SHELL: &str = "sh";

// --- Process exit codes ---

pub const EXIT_FAILURE: i32 = 1;
/// The grading service could not be reached.
pub const EXIT_UNAVAILABLE: i32 = 69;
/// The grading service answered with an error or an unreadable body.
pub const EXIT_PROTOCOL: i32 = 76;
pub const EXIT_CONFIG: i32 = 78;
/// The user interrupted an interactive prompt.
pub const EXIT_INTERRUPTED: i32 = 130;
