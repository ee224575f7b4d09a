//! Run, Debug and Coverage requests.
//!
//! A request names the spec class and, optionally, a test path inside it.
//! Requests are only rendered as a Gradle command line; nothing here starts
//! a process.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::config::RunConfig;
use crate::model::{Test, TestPathEntry, PATH_SEPARATOR};

/// Kotest filter selecting spec classes.
pub const SPEC_FILTER_VAR: &str = "kotest_filter_specs";
/// Kotest filter selecting tests by path.
pub const TEST_FILTER_VAR: &str = "kotest_filter_tests";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RunMode {
    Run,
    Debug,
    Coverage,
}

impl RunMode {
    pub const ALL: [RunMode; 3] = [RunMode::Run, RunMode::Debug, RunMode::Coverage];

    /// Action name shown in the toolbar.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Run => "Run",
            Self::Debug => "Debug",
            Self::Coverage => "Coverage",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "run" => Some(Self::Run),
            "debug" => Some(Self::Debug),
            "coverage" => Some(Self::Coverage),
            _ => None,
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A request to run a spec or one of its tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunRequest {
    pub mode: RunMode,
    pub file: Option<PathBuf>,
    pub spec_fqn: String,
    /// Empty when the whole spec runs.
    pub test_path: Vec<TestPathEntry>,
    /// 1-based line of the anchored declaration.
    pub line: u32,
}

impl RunRequest {
    /// Run every test of a spec.
    pub fn for_spec(mode: RunMode, file: Option<PathBuf>, spec_fqn: &str, line: u32) -> Self {
        Self {
            mode,
            file,
            spec_fqn: spec_fqn.to_string(),
            test_path: Vec::new(),
            line,
        }
    }

    /// Run one test (and everything nested in it).
    ///
    /// Interpolated names have no stable value, so the filter stops at the
    /// nearest ancestor with a static name. With none left the whole spec
    /// runs.
    pub fn for_test(mode: RunMode, file: Option<PathBuf>, spec_fqn: &str, test: &Test) -> Self {
        Self {
            mode,
            file,
            spec_fqn: spec_fqn.to_string(),
            test_path: test.stable_path().to_vec(),
            line: test.anchor.line(),
        }
    }

    /// Test filter value, `None` for whole-spec runs.
    pub fn test_filter(&self) -> Option<String> {
        if self.test_path.is_empty() {
            return None;
        }
        Some(
            self.test_path
                .iter()
                .map(|e| e.name.as_str())
                .collect::<Vec<_>>()
                .join(PATH_SEPARATOR),
        )
    }

    /// Display name of the request, as a run configuration would show it.
    pub fn name(&self) -> String {
        let simple = self.spec_fqn.rsplit('.').next().unwrap_or(&self.spec_fqn);
        match self.test_filter() {
            Some(filter) => format!("{}: {}", simple, filter),
            None => simple.to_string(),
        }
    }

    /// The Gradle invocation that would carry out this request.
    pub fn command_line(&self, config: &RunConfig) -> CommandLine {
        let mut env = vec![(SPEC_FILTER_VAR.to_string(), self.spec_fqn.clone())];
        if let Some(filter) = self.test_filter() {
            env.push((TEST_FILTER_VAR.to_string(), filter));
        }

        let mut args = vec![
            config.test_task.clone(),
            "--tests".to_string(),
            self.spec_fqn.clone(),
        ];
        match self.mode {
            RunMode::Run => {}
            RunMode::Debug => args.push(config.debug_flag.clone()),
            RunMode::Coverage => args.push(config.coverage_task.clone()),
        }

        CommandLine {
            env,
            program: config.gradle_command.clone(),
            args,
        }
    }
}

/// A rendered command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandLine {
    pub env: Vec<(String, String)>,
    pub program: String,
    pub args: Vec<String>,
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self
            .env
            .iter()
            .map(|(k, v)| format!("{}={}", k, shell_quote(v)))
            .collect();
        parts.push(shell_quote(&self.program));
        parts.extend(self.args.iter().map(|a| shell_quote(a)));
        write!(f, "{}", parts.join(" "))
    }
}

fn shell_quote(s: &str) -> String {
    let plain = !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:".contains(c));
    if plain {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}
