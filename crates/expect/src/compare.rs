//! Equality and inequality assertions

use crate::diff::diff;
use crate::error::ExpectResult;
use crate::options::Options;
use crate::report::{fatal, Reporter};
use serde::Serialize;
use tracing::warn;

/// Failure message when two values differ
pub const NOT_EQUAL: &str = "values are not equal";

/// Failure message when two values are the same
pub const EQUAL: &str = "values are equal";

/// Assert that two values are structurally equal
///
/// If they differ, the diff is written to the reporter's diagnostics and the
/// unit is marked as failed. Execution continues either way; the return
/// value tells whether the assertion held.
pub fn equal<R, G, E>(
    reporter: &mut R,
    got: &G,
    expected: &E,
    options: &Options,
) -> ExpectResult<bool>
where
    R: Reporter + ?Sized,
    G: Serialize + ?Sized,
    E: Serialize + ?Sized,
{
    let diff = diff(got, expected, options).map_err(|err| fatal(reporter, err))?;
    if diff.is_empty() {
        return Ok(true);
    }

    let text = diff.render(reporter.max_differences());
    if let Err(err) = reporter.diagnostics().write_all(text.as_bytes()) {
        warn!(error = %err, "failed to write diff");
    }
    reporter.fail(NOT_EQUAL);
    Ok(false)
}

/// Assert that two values are not structurally equal
pub fn not_equal<R, G, E>(
    reporter: &mut R,
    got: &G,
    expected: &E,
    options: &Options,
) -> ExpectResult<bool>
where
    R: Reporter + ?Sized,
    G: Serialize + ?Sized,
    E: Serialize + ?Sized,
{
    let diff = diff(got, expected, options).map_err(|err| fatal(reporter, err))?;
    if diff.is_empty() {
        reporter.fail(EQUAL);
        return Ok(false);
    }
    Ok(true)
}

/// Assert structural equality, with optional [`Options`]
///
/// Expands to `expect::equal(reporter, &got, &expected, &options)`.
#[macro_export]
macro_rules! expect_equal {
    ($reporter:expr, $got:expr, $expected:expr $(,)?) => {
        $crate::equal($reporter, &$got, &$expected, &$crate::Options::default())
    };
    ($reporter:expr, $got:expr, $expected:expr, $options:expr $(,)?) => {
        $crate::equal($reporter, &$got, &$expected, &$options)
    };
}

/// Assert structural inequality, with optional [`Options`]
#[macro_export]
macro_rules! expect_not_equal {
    ($reporter:expr, $got:expr, $expected:expr $(,)?) => {
        $crate::not_equal($reporter, &$got, &$expected, &$crate::Options::default())
    };
    ($reporter:expr, $got:expr, $expected:expr, $options:expr $(,)?) => {
        $crate::not_equal($reporter, &$got, &$expected, &$options)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TestUnit;
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Starship {
        name: &'static str,
    }

    const ENTERPRISE: Starship = Starship { name: "enterprise" };
    const VOYAGER: Starship = Starship { name: "voyager" };

    fn unit() -> TestUnit<Vec<u8>> {
        TestUnit::with_writer("compare", Vec::new())
    }

    fn output(unit: TestUnit<Vec<u8>>) -> String {
        String::from_utf8(unit.into_writer()).unwrap()
    }

    #[test]
    fn test_equal_passes_silently() {
        let mut t = unit();
        assert!(equal(&mut t, &ENTERPRISE, &ENTERPRISE, &Options::default()).unwrap());
        assert!(!t.failed());
        assert_eq!(output(t), "");
    }

    #[test]
    fn test_equal_failure_writes_diff() {
        let mut t = unit();
        assert!(!equal(&mut t, &ENTERPRISE, &VOYAGER, &Options::default()).unwrap());
        assert!(t.failed());
        assert!(!t.aborted());
        assert_eq!(t.failures(), [NOT_EQUAL]);

        let text = output(t);
        assert!(text.contains("VALUE name"));
        assert!(text.contains("- \"enterprise\""));
        assert!(text.contains("+ \"voyager\""));
    }

    #[test]
    fn test_not_equal() {
        let mut t = unit();
        assert!(not_equal(&mut t, &ENTERPRISE, &VOYAGER, &Options::default()).unwrap());
        assert!(!t.failed());

        assert!(!not_equal(&mut t, &ENTERPRISE, &ENTERPRISE, &Options::default()).unwrap());
        assert_eq!(t.failures(), [EQUAL]);
        assert_eq!(output(t), "");
    }

    #[test]
    fn test_options_pass_through() {
        let mut t = unit();
        let opts = Options::new().ignore_field("name");
        assert!(equal(&mut t, &ENTERPRISE, &VOYAGER, &opts).unwrap());
        assert!(!not_equal(&mut t, &ENTERPRISE, &VOYAGER, &opts).unwrap());
    }

    #[test]
    fn test_macros() {
        let mut t = unit();
        assert!(expect_equal!(&mut t, 1, 1).unwrap());
        assert!(expect_not_equal!(&mut t, "a", "b").unwrap());
        assert!(expect_equal!(&mut t, 1.0, 1.05, Options::new().equate_approx(0.1)).unwrap());
        assert!(!t.failed());
    }

    #[test]
    fn test_diagnostics_respect_limit() {
        let mut t = unit().with_max_differences(1);
        equal(&mut t, &[1, 2, 3], &[4, 5, 6], &Options::default()).unwrap();
        let text = output(t);
        assert_eq!(text.matches("VALUE").count(), 1);
        assert!(text.contains("... and 2 more differences"));
    }

    #[test]
    fn test_non_finite_floats() {
        #[derive(Serialize)]
        struct Reading {
            value: f64,
        }

        let mut t = unit();
        let nan = Reading { value: f64::NAN };
        let inf = Reading {
            value: f64::INFINITY,
        };
        assert!(!equal(&mut t, &nan, &inf, &Options::default()).unwrap());
        assert!(!equal(&mut t, &f64::NEG_INFINITY, &f64::INFINITY, &Options::default()).unwrap());
        assert!(not_equal(&mut t, &Some(f64::NAN), &None::<f64>, &Options::default()).unwrap());
        assert!(equal(&mut t, &nan, &nan, &Options::default()).unwrap());
        assert_eq!(t.failures(), [NOT_EQUAL, NOT_EQUAL]);
        assert!(!t.aborted());
    }

    #[test]
    fn test_wide_integers_are_reflexive() {
        let mut t = unit();
        assert!(equal(&mut t, &u128::MAX, &u128::MAX, &Options::default()).unwrap());
        assert!(equal(&mut t, &i128::MIN, &i128::MIN, &Options::default()).unwrap());
        assert!(!not_equal(&mut t, &u128::MAX, &u128::MAX, &Options::default()).unwrap());
        assert!(!t.aborted());
        assert_eq!(t.failures(), [EQUAL]);
    }

    struct BrokenPipe;

    impl std::io::Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_broken_diagnostics_still_fails() {
        let mut t = TestUnit::with_writer("compare", BrokenPipe);
        assert!(!equal(&mut t, &ENTERPRISE, &VOYAGER, &Options::default()).unwrap());
        assert_eq!(t.failures(), [NOT_EQUAL]);
    }

    #[test]
    fn test_unserializable_value_aborts() {
        let mut got = BTreeMap::new();
        got.insert(vec![1u8], "key is not a string");

        let mut t = unit();
        let result = equal(&mut t, &got, &got, &Options::default());
        assert!(result.is_err());
        assert!(t.aborted());
        assert!(t.failures().is_empty());
    }
}
