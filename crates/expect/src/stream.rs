//! Assertions against values decoded from a byte stream
//!
//! The type of the expected value decides what gets decoded: a fresh
//! `T::default()` is handed to the decoder, and the populated value is then
//! compared with `expected`.

use crate::compare::{equal, not_equal};
use crate::error::{ExpectError, ExpectResult};
use crate::options::Options;
use crate::report::{fatal, Reporter};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::type_name;
use tracing::debug;

/// A source of structured values
///
/// Each call to `decode` reads the next logical unit from the underlying
/// stream and stores it in `dest`.
pub trait Decoder {
    type Error: std::error::Error + Send + Sync + 'static;

    fn decode<T: DeserializeOwned>(&mut self, dest: &mut T) -> Result<(), Self::Error>;
}

impl<D: Decoder> Decoder for &mut D {
    type Error = D::Error;

    fn decode<T: DeserializeOwned>(&mut self, dest: &mut T) -> Result<(), Self::Error> {
        (**self).decode(dest)
    }
}

fn validate<'d, 'e, D, T>(
    decoder: Option<&'d mut D>,
    expected: Option<&'e T>,
) -> ExpectResult<(&'d mut D, &'e T)> {
    let expected = expected.ok_or(ExpectError::NullExpected)?;
    let decoder = decoder.ok_or(ExpectError::NullDecoder)?;
    Ok((decoder, expected))
}

fn decode_fresh<T, D>(decoder: &mut D) -> ExpectResult<T>
where
    T: Default + DeserializeOwned,
    D: Decoder,
{
    debug!(target_type = type_name::<T>(), "Decoding value from stream");
    let mut got = T::default();
    decoder.decode(&mut got).map_err(ExpectError::decode)?;
    Ok(got)
}

/// Decode one value of the expected value's type
///
/// `expected` is checked before `decoder`. The decoder is called exactly
/// once; whatever follows the value in the stream is left unread.
pub fn materialize<T, D>(decoder: Option<&mut D>, expected: Option<&T>) -> ExpectResult<T>
where
    T: Default + DeserializeOwned,
    D: Decoder,
{
    let (decoder, _) = validate(decoder, expected)?;
    decode_fresh(decoder)
}

/// Decode one value from the stream and assert it equals `expected`
///
/// A missing argument or a decode error aborts the unit before any
/// comparison is made.
pub fn stream_equal<R, D, T>(
    reporter: &mut R,
    decoder: Option<&mut D>,
    expected: Option<&T>,
    options: &Options,
) -> ExpectResult<bool>
where
    R: Reporter + ?Sized,
    D: Decoder,
    T: Default + Serialize + DeserializeOwned,
{
    let (decoder, expected) = validate(decoder, expected).map_err(|err| fatal(reporter, err))?;
    let got: T = decode_fresh(decoder).map_err(|err| fatal(reporter, err))?;
    equal(reporter, &got, expected, options)
}

/// Decode one value from the stream and assert it differs from `expected`
pub fn stream_not_equal<R, D, T>(
    reporter: &mut R,
    decoder: Option<&mut D>,
    expected: Option<&T>,
    options: &Options,
) -> ExpectResult<bool>
where
    R: Reporter + ?Sized,
    D: Decoder,
    T: Default + Serialize + DeserializeOwned,
{
    let (decoder, expected) = validate(decoder, expected).map_err(|err| fatal(reporter, err))?;
    let got: T = decode_fresh(decoder).map_err(|err| fatal(reporter, err))?;
    not_equal(reporter, &got, expected, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::JsonDecoder;
    use crate::TestUnit;
    use serde::Deserialize;
    use std::fmt;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Greeting {
        greeting: String,
    }

    #[derive(Debug)]
    struct BadThing;

    impl fmt::Display for BadThing {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "bad thing happened")
        }
    }

    impl std::error::Error for BadThing {}

    /// Fails every decode and counts the attempts
    #[derive(Default)]
    struct ErrorDecoder {
        calls: usize,
    }

    impl Decoder for ErrorDecoder {
        type Error = BadThing;

        fn decode<T: DeserializeOwned>(&mut self, _dest: &mut T) -> Result<(), Self::Error> {
            self.calls += 1;
            Err(BadThing)
        }
    }

    fn picard() -> Greeting {
        Greeting {
            greeting: "Hello, Picard".to_string(),
        }
    }

    #[test]
    fn test_materialize_decodes_one_value() {
        let mut decoder = JsonDecoder::from_slice(br#"{"greeting":"Hello, Picard"} {"greeting":"x"}"#);
        let got = materialize(Some(&mut decoder), Some(&Greeting::default())).unwrap();
        assert_eq!(got, picard());
    }

    #[test]
    fn test_materialize_checks_expected_first() {
        let err = materialize::<Greeting, ErrorDecoder>(None, None).unwrap_err();
        assert!(matches!(err, ExpectError::NullExpected));

        let err = materialize::<Greeting, ErrorDecoder>(None, Some(&picard())).unwrap_err();
        assert!(matches!(err, ExpectError::NullDecoder));
    }

    #[test]
    fn test_decode_error_is_wrapped() {
        let mut decoder = ErrorDecoder::default();
        let err = materialize(Some(&mut decoder), Some(&picard())).unwrap_err();
        assert_eq!(err.to_string(), "failed to decode stream: bad thing happened");
        assert_eq!(decoder.calls, 1);
    }

    #[test]
    fn test_decode_error_short_circuits_comparison() {
        let mut t = TestUnit::with_writer("stream", Vec::new());
        let mut decoder = ErrorDecoder::default();

        let result = stream_equal(&mut t, Some(&mut decoder), Some(&picard()), &Options::default());
        assert!(result.is_err());
        assert!(t.aborted());
        assert!(t.failures().is_empty());
        assert!(t.writer().is_empty());
    }

    #[test]
    fn test_by_reference_decoder() {
        let mut decoder = JsonDecoder::from_slice(br#"{"greeting":"Hello, Picard"}"#);
        let mut by_ref = &mut decoder;
        let mut t = TestUnit::with_writer("stream", Vec::new());
        assert!(stream_equal(&mut t, Some(&mut by_ref), Some(&picard()), &Options::default()).unwrap());
    }
}
