//! Deep-equality and stream-decoding assertions for tests
//!
//! Assertions report to a [`Reporter`] instead of panicking. A structural
//! mismatch marks the unit as failed, writes a line-oriented diff to the
//! reporter's diagnostics and lets the test continue. Usage errors (a missing
//! expected value or decoder) and decode errors are fatal: they are recorded
//! through [`Reporter::abort`] and returned as `Err`, so the body of the unit
//! stops at the next `?`.
//!
//! # Architecture
//!
//! ```text
//!   got, expected ────────────────────────┐
//!                                         ▼
//!   decoder, &expected ──► materialize ──► diff ──► Reporter
//!                          (T::default)    (Options)  fail / abort
//! ```
//!
//! # Example
//!
//! ```ignore
//! use expect::{stream_equal, JsonDecoder, Options, TestUnit};
//!
//! let mut unit = TestUnit::new("greeting");
//! unit.run(|t| {
//!     let mut decoder = JsonDecoder::from_slice(&body);
//!     let expected = Greeting { greeting: "Hello, Picard".into() };
//!     stream_equal(t, Some(&mut decoder), Some(&expected), &Options::default())?;
//!     Ok(())
//! });
//! unit.finish();
//! ```

mod codec;
mod compare;
mod config;
mod diff;
mod error;
mod node;
mod options;
mod report;
mod stream;

pub use codec::{JsonDecoder, YamlDecoder};
pub use compare::{equal, not_equal, EQUAL, NOT_EQUAL};
pub use config::{
    DiagnosticSink, ExpectConfig, DEFAULT_MAX_DIFFERENCES, DIAGNOSTICS_VAR, MAX_DIFFERENCES_VAR,
};
pub use diff::{diff, diff_nodes, Diff, DiffKind, Difference};
pub use error::{BoxError, ExpectError, ExpectResult, Side};
pub use node::{to_node, Node, Number};
pub use options::{Options, Predicate, Rule};
pub use report::{Reporter, TestUnit};
pub use stream::{materialize, stream_equal, stream_not_equal, Decoder};
