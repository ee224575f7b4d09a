//! Default values for ktspec configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// Discovery Defaults
// ============================================================================

/// Kotlin source extensions scanned for specs.
pub const DEFAULT_EXTENSIONS: &[&str] = &["kt", "kts"];

/// Largest file handed to the recognizer (1 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Build files that mark a directory as a module root.
pub const DEFAULT_MODULE_MARKERS: &[&str] = &[
    "build.gradle.kts",
    "build.gradle",
    "pom.xml",
];

/// Directories never scanned.
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[
    // Version control
    ".git",
    ".svn",
    ".hg",
    // Build outputs
    "build",
    "out",
    "target",
    "bin",
    // Tooling caches
    ".gradle",
    ".kotlin",
    ".idea",
    ".vscode",
    "node_modules",
];

// ============================================================================
// Explorer Defaults
// ============================================================================

/// UI tick interval in milliseconds.
pub const DEFAULT_TICK_RATE_MS: u64 = 100;

/// How often open files are checked for changes, in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

// ============================================================================
// Run Defaults
// ============================================================================

/// Command used to launch Gradle.
pub const DEFAULT_GRADLE_COMMAND: &str = "./gradlew";

/// Gradle task that runs the tests.
pub const DEFAULT_TEST_TASK: &str = "test";

/// Gradle task appended for coverage runs.
pub const DEFAULT_COVERAGE_TASK: &str = "jacocoTestReport";

/// Flag appended for debug runs.
pub const DEFAULT_DEBUG_FLAG: &str = "--debug-jvm";

// ============================================================================
// Logging Defaults
// ============================================================================

/// Default tracing filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "warn";

// ============================================================================
// Config File Locations
// ============================================================================

/// Project-local config file name.
pub const PROJECT_CONFIG_FILE: &str = "ktspec.toml";

/// Directory under the user config dir.
pub const USER_CONFIG_DIR: &str = "ktspec";

/// File name inside the user config dir.
pub const USER_CONFIG_FILE: &str = "config.toml";
