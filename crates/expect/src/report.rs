//! Failure reporting for a single test unit

use crate::config::{ExpectConfig, DEFAULT_MAX_DIFFERENCES};
use crate::error::{ExpectError, ExpectResult};
use std::io::Write;
use tracing::debug;

/// The test-reporting collaborator an assertion talks to
///
/// `fail` marks the unit as failed and lets execution continue. `abort`
/// records a fatal condition; the assertion then returns `Err` so the caller
/// stops the unit with `?`.
pub trait Reporter {
    /// Mark the unit as failed with a message
    fn fail(&mut self, message: &str);

    /// Record that the unit is being aborted
    fn abort(&mut self, error: &ExpectError);

    /// Side channel for diff text
    fn diagnostics(&mut self) -> &mut dyn Write;

    /// Maximum number of differences rendered into the side channel
    fn max_differences(&self) -> usize {
        DEFAULT_MAX_DIFFERENCES
    }
}

/// Report a fatal error and hand it back for propagation
pub(crate) fn fatal<R: Reporter + ?Sized>(reporter: &mut R, error: ExpectError) -> ExpectError {
    reporter.abort(&error);
    error
}

/// A test unit that records failures and owns its diagnostic writer
///
/// Units share nothing, so each thread of a test run can drive its own unit
/// without its diagnostics interleaving with another's.
pub struct TestUnit<W = Box<dyn Write + Send>> {
    name: String,
    failures: Vec<String>,
    abort_message: Option<String>,
    max_differences: usize,
    writer: W,
}

impl TestUnit {
    /// Create a unit configured from the environment
    pub fn new(name: &str) -> Self {
        Self::from_config(name, &ExpectConfig::from_env())
    }

    /// Create a unit writing diagnostics to the configured sink
    pub fn from_config(name: &str, config: &ExpectConfig) -> Self {
        TestUnit::with_writer(name, config.diagnostics.writer())
            .with_max_differences(config.max_differences)
    }
}

impl<W: Write> TestUnit<W> {
    /// Create a unit writing diagnostics to `writer`
    pub fn with_writer(name: &str, writer: W) -> Self {
        Self {
            name: name.to_string(),
            failures: Vec::new(),
            abort_message: None,
            max_differences: DEFAULT_MAX_DIFFERENCES,
            writer,
        }
    }

    pub fn with_max_differences(mut self, max_differences: usize) -> Self {
        self.max_differences = max_differences.max(1);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether any assertion failed or the unit was aborted
    pub fn failed(&self) -> bool {
        !self.failures.is_empty() || self.abort_message.is_some()
    }

    pub fn aborted(&self) -> bool {
        self.abort_message.is_some()
    }

    /// Failure messages in the order they were reported
    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    pub fn abort_message(&self) -> Option<&str> {
        self.abort_message.as_deref()
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Run the body of the unit
    ///
    /// An `Err` returned from `body` stops the body only: the unit is marked
    /// aborted and control returns to the caller. A unit that has already
    /// been aborted does not run further bodies.
    pub fn run<F>(&mut self, body: F) -> &mut Self
    where
        F: FnOnce(&mut Self) -> ExpectResult<()>,
    {
        if self.aborted() {
            debug!(unit = %self.name, "Skipping body of aborted unit");
            return self;
        }
        if let Err(err) = body(self) {
            if !self.aborted() {
                self.abort(&err);
            }
        }
        self
    }

    /// Consume the unit, panicking with a summary if it failed
    pub fn finish(self) {
        if !self.failed() {
            return;
        }

        let mut summary = format!("test unit '{}' failed", self.name);
        for failure in &self.failures {
            summary.push_str("\n  ");
            summary.push_str(failure);
        }
        if let Some(message) = &self.abort_message {
            summary.push_str("\n  aborted: ");
            summary.push_str(message);
        }
        panic!("{}", summary);
    }
}

impl<W: Write> Reporter for TestUnit<W> {
    fn fail(&mut self, message: &str) {
        debug!(unit = %self.name, reason = message, "Test unit failed");
        self.failures.push(message.to_string());
    }

    fn abort(&mut self, error: &ExpectError) {
        debug!(unit = %self.name, error = %error, "Test unit aborted");
        // The first fatal condition is the one that stopped the unit
        if self.abort_message.is_none() {
            self.abort_message = Some(error.to_string());
        }
    }

    fn diagnostics(&mut self) -> &mut dyn Write {
        &mut self.writer
    }

    fn max_differences(&self) -> usize {
        self.max_differences
    }
}

impl<W> std::fmt::Debug for TestUnit<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestUnit")
            .field("name", &self.name)
            .field("failures", &self.failures)
            .field("abort_message", &self.abort_message)
            .finish()
    }
}
