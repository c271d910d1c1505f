//! Decoders for common serialization formats

use crate::stream::Decoder;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::io::Read;

/// Reads successive JSON values from a byte stream
///
/// Values may be separated by whitespace, as in newline-delimited JSON.
/// Each `decode` consumes exactly one value and leaves the rest unread.
pub struct JsonDecoder<R: Read> {
    de: serde_json::Deserializer<serde_json::de::IoRead<R>>,
}

impl<R: Read> JsonDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            de: serde_json::Deserializer::from_reader(reader),
        }
    }
}

impl<'a> JsonDecoder<&'a [u8]> {
    pub fn from_slice(bytes: &'a [u8]) -> Self {
        Self::new(bytes)
    }
}

impl<R: Read> Decoder for JsonDecoder<R> {
    type Error = serde_json::Error;

    fn decode<T: DeserializeOwned>(&mut self, dest: &mut T) -> Result<(), Self::Error> {
        *dest = <T as Deserialize>::deserialize(&mut self.de)?;
        Ok(())
    }
}

/// Reads successive YAML documents
///
/// Documents are separated by `---`. Decoding past the last document is an
/// error.
pub struct YamlDecoder<'de> {
    documents: serde_yaml::Deserializer<'de>,
}

impl<'de> YamlDecoder<'de> {
    pub fn from_reader<R: Read + 'de>(reader: R) -> Self {
        Self {
            documents: serde_yaml::Deserializer::from_reader(reader),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &'de str) -> Self {
        Self {
            documents: serde_yaml::Deserializer::from_str(text),
        }
    }
}

impl Decoder for YamlDecoder<'_> {
    type Error = serde_yaml::Error;

    fn decode<T: DeserializeOwned>(&mut self, dest: &mut T) -> Result<(), Self::Error> {
        let document = self.documents.next().ok_or_else(|| {
            <serde_yaml::Error as serde::de::Error>::custom("no documents left in stream")
        })?;
        *dest = <T as Deserialize>::deserialize(document)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Starship {
        name: String,
        crew: Vec<String>,
    }

    #[test]
    fn test_json_successive_values() {
        let mut decoder = JsonDecoder::from_slice(b"{\"name\":\"enterprise\",\"crew\":[]}\n{\"name\":\"voyager\",\"crew\":[\"Janeway\"]}\n");

        let mut first = Starship::default();
        decoder.decode(&mut first).unwrap();
        assert_eq!(first.name, "enterprise");

        let mut second = Starship::default();
        decoder.decode(&mut second).unwrap();
        assert_eq!(second.crew, vec!["Janeway".to_string()]);

        let mut third = Starship::default();
        assert!(decoder.decode(&mut third).is_err());
    }

    #[test]
    fn test_json_shape_mismatch_is_an_error() {
        let mut decoder = JsonDecoder::from_slice(br#"{"name": 1701}"#);
        let mut dest = Starship::default();
        assert!(decoder.decode(&mut dest).is_err());
    }

    #[test]
    fn test_json_from_reader() {
        let reader = std::io::Cursor::new(br#"[1, 2, 3]"#.to_vec());
        let mut decoder = JsonDecoder::new(reader);
        let mut dest: Vec<u32> = Vec::new();
        decoder.decode(&mut dest).unwrap();
        assert_eq!(dest, vec![1, 2, 3]);
    }

    #[test]
    fn test_yaml_documents() {
        let text = "name: enterprise\ncrew: [Picard]\n---\nname: voyager\ncrew: []\n";
        let mut decoder = YamlDecoder::from_str(text);

        let mut first = Starship::default();
        decoder.decode(&mut first).unwrap();
        assert_eq!(first.crew, vec!["Picard".to_string()]);

        let mut second = Starship::default();
        decoder.decode(&mut second).unwrap();
        assert_eq!(second.name, "voyager");

        let mut third = Starship::default();
        let err = decoder.decode(&mut third).unwrap_err();
        assert!(err.to_string().contains("no documents left"));
    }

    #[test]
    fn test_yaml_from_reader() {
        let mut decoder = YamlDecoder::from_reader("warp: 9\nimpulse: 1\n".as_bytes());
        let mut dest: BTreeMap<String, u8> = BTreeMap::new();
        decoder.decode(&mut dest).unwrap();
        assert_eq!(dest.get("warp"), Some(&9));
    }
}
