//! Configuration for assertion output

use std::env;
use std::io::{self, Write};
use std::str::FromStr;
use tracing::warn;

/// Environment variable selecting where diagnostics are written
pub const DIAGNOSTICS_VAR: &str = "EXPECT_DIAGNOSTICS";

/// Environment variable capping the number of rendered differences
pub const MAX_DIFFERENCES_VAR: &str = "EXPECT_MAX_DIFFERENCES";

/// Default cap on rendered differences
pub const DEFAULT_MAX_DIFFERENCES: usize = 50;

/// Destination for diff text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagnosticSink {
    #[default]
    Stdout,
    Stderr,
    Off,
}

impl DiagnosticSink {
    /// Open a writer for this sink
    pub fn writer(self) -> Box<dyn Write + Send> {
        match self {
            DiagnosticSink::Stdout => Box::new(io::stdout()),
            DiagnosticSink::Stderr => Box::new(io::stderr()),
            DiagnosticSink::Off => Box::new(io::sink()),
        }
    }
}

impl FromStr for DiagnosticSink {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdout" => Ok(DiagnosticSink::Stdout),
            "stderr" => Ok(DiagnosticSink::Stderr),
            "off" | "none" => Ok(DiagnosticSink::Off),
            other => Err(format!("unknown diagnostic sink '{}'", other)),
        }
    }
}

/// Configuration shared by the test units of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectConfig {
    /// Where diff text goes when an equality assertion fails
    pub diagnostics: DiagnosticSink,
    /// Maximum number of differences rendered per failure
    pub max_differences: usize,
}

impl Default for ExpectConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl ExpectConfig {
    /// Load configuration from environment variables
    ///
    /// Unset variables take their defaults. Invalid values are logged and
    /// replaced by the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let diagnostics = lookup(DIAGNOSTICS_VAR)
            .map(|raw| {
                raw.parse().unwrap_or_else(|err| {
                    warn!(var = DIAGNOSTICS_VAR, value = %raw, "{}, using stdout", err);
                    DiagnosticSink::default()
                })
            })
            .unwrap_or_default();

        let max_differences = lookup(MAX_DIFFERENCES_VAR)
            .map(|raw| match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    warn!(
                        var = MAX_DIFFERENCES_VAR,
                        value = %raw,
                        "expected a positive integer, using {}",
                        DEFAULT_MAX_DIFFERENCES
                    );
                    DEFAULT_MAX_DIFFERENCES
                }
            })
            .unwrap_or(DEFAULT_MAX_DIFFERENCES);

        Self {
            diagnostics,
            max_differences,
        }
    }

    /// Configuration that discards diagnostics
    pub fn quiet() -> Self {
        Self {
            diagnostics: DiagnosticSink::Off,
            max_differences: DEFAULT_MAX_DIFFERENCES,
        }
    }
}
