//! Lossless structural form of a serializable value
//!
//! Any `Serialize` type can be rendered into a [`Node`] tree with the same
//! shape serde_json would produce. Unlike `serde_json::Value`, the tree keeps
//! non-finite floats and 128-bit integers, so distinct values never collapse
//! into the same node.

use indexmap::IndexMap;
use serde::ser::{self, Error as _, Impossible, Serialize, Serializer as _};
use std::fmt;

type Error = serde_json::Error;

/// A number as it was serialized
///
/// Non-negative integers are always stored as `Unsigned`, so `1i32` and
/// `1u64` are the same number. Integers and floats never compare equal.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Unsigned(u128),
    Signed(i128),
    Float(f64),
}

impl Number {
    fn from_signed(value: i128) -> Self {
        if value >= 0 {
            Number::Unsigned(value as u128)
        } else {
            Number::Signed(value)
        }
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Unsigned(v) => v as f64,
            Number::Signed(v) => v as f64,
            Number::Float(v) => v,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Equal, or within `tolerance` of each other
    pub fn approx_eq(&self, other: &Number, tolerance: f64) -> bool {
        self == other || (self.as_f64() - other.as_f64()).abs() <= tolerance
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Unsigned(a), Number::Unsigned(b)) => a == b,
            (Number::Signed(a), Number::Signed(b)) => a == b,
            // NaN matches NaN so that every value equals itself
            (Number::Float(a), Number::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            _ => false,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::Unsigned(v) => write!(f, "{}", v),
            Number::Signed(v) => write!(f, "{}", v),
            Number::Float(v) => match serde_json::Number::from_f64(v) {
                Some(number) => write!(f, "{}", number),
                None => write!(f, "{}", v),
            },
        }
    }
}

/// One node of a value tree
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Node {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Node>),
    Object(IndexMap<String, Node>),
}

pub(crate) static NULL: Node = Node::Null;

impl Node {
    /// Name of the node's kind, as used in `KIND` differences
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "bool",
            Node::Number(_) => "number",
            Node::String(_) => "string",
            Node::Array(_) => "array",
            Node::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Node::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(Number::as_f64)
    }

    pub fn as_array(&self) -> Option<&[Node]> {
        match self {
            Node::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Node>> {
        match self {
            Node::Object(members) => Some(members),
            _ => None,
        }
    }

    /// Member of an object node
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_object().and_then(|members| members.get(key))
    }

    /// Null, `[]` or `{}`
    pub(crate) fn is_empty(&self) -> bool {
        match self {
            Node::Null => true,
            Node::Array(items) => items.is_empty(),
            Node::Object(members) => members.is_empty(),
            _ => false,
        }
    }
}

/// Compact JSON-like text; non-finite floats render as `NaN`, `inf`, `-inf`
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Null => f.write_str("null"),
            Node::Bool(b) => write!(f, "{}", b),
            Node::Number(n) => write!(f, "{}", n),
            Node::String(s) => write_quoted(f, s),
            Node::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Node::Object(members) => {
                f.write_str("{")?;
                for (i, (key, value)) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write_quoted(f, key)?;
                    write!(f, ":{}", value)?;
                }
                f.write_str("}")
            }
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let quoted = serde_json::to_string(s).map_err(|_| fmt::Error)?;
    f.write_str(&quoted)
}

impl From<serde_json::Value> for Node {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => {
                if let Some(v) = n.as_u64() {
                    Node::Number(Number::Unsigned(v.into()))
                } else if let Some(v) = n.as_i64() {
                    Node::Number(Number::from_signed(v.into()))
                } else {
                    Node::Number(Number::Float(n.as_f64().unwrap_or(f64::NAN)))
                }
            }
            Value::String(s) => Node::String(s),
            Value::Array(items) => Node::Array(items.into_iter().map(Node::from).collect()),
            Value::Object(members) => Node::Object(
                members
                    .into_iter()
                    .map(|(key, value)| (key, Node::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::String(s.to_string())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::String(s)
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Bool(b)
    }
}

impl From<f64> for Node {
    fn from(v: f64) -> Self {
        Node::Number(Number::Float(v))
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Node {
                fn from(v: $ty) -> Self {
                    Node::Number(Number::from_signed(v as i128))
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize);

impl From<u128> for Node {
    fn from(v: u128) -> Self {
        Node::Number(Number::Unsigned(v))
    }
}

/// Render any serializable value into a [`Node`] tree
///
/// Fails when a map key does not serialize to a string or a scalar, or when
/// the value's own `Serialize` impl reports an error.
pub fn to_node<T>(value: &T) -> Result<Node, Error>
where
    T: Serialize + ?Sized,
{
    value.serialize(NodeSerializer)
}

struct NodeSerializer;

impl ser::Serializer for NodeSerializer {
    type Ok = Node;
    type Error = Error;

    type SerializeSeq = SerializeArray;
    type SerializeTuple = SerializeArray;
    type SerializeTupleStruct = SerializeArray;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeObject;
    type SerializeStruct = SerializeObject;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Node, Error> {
        Ok(Node::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Node, Error> {
        self.serialize_i128(v.into())
    }

    fn serialize_i16(self, v: i16) -> Result<Node, Error> {
        self.serialize_i128(v.into())
    }

    fn serialize_i32(self, v: i32) -> Result<Node, Error> {
        self.serialize_i128(v.into())
    }

    fn serialize_i64(self, v: i64) -> Result<Node, Error> {
        self.serialize_i128(v.into())
    }

    fn serialize_i128(self, v: i128) -> Result<Node, Error> {
        Ok(Node::Number(Number::from_signed(v)))
    }

    fn serialize_u8(self, v: u8) -> Result<Node, Error> {
        self.serialize_u128(v.into())
    }

    fn serialize_u16(self, v: u16) -> Result<Node, Error> {
        self.serialize_u128(v.into())
    }

    fn serialize_u32(self, v: u32) -> Result<Node, Error> {
        self.serialize_u128(v.into())
    }

    fn serialize_u64(self, v: u64) -> Result<Node, Error> {
        self.serialize_u128(v.into())
    }

    fn serialize_u128(self, v: u128) -> Result<Node, Error> {
        Ok(Node::Number(Number::Unsigned(v)))
    }

    fn serialize_f32(self, v: f32) -> Result<Node, Error> {
        self.serialize_f64(v.into())
    }

    fn serialize_f64(self, v: f64) -> Result<Node, Error> {
        Ok(Node::Number(Number::Float(v)))
    }

    fn serialize_char(self, v: char) -> Result<Node, Error> {
        Ok(Node::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Node, Error> {
        Ok(Node::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Node, Error> {
        Ok(Node::Array(v.iter().map(|&b| Node::from(b)).collect()))
    }

    fn serialize_none(self) -> Result<Node, Error> {
        Ok(Node::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Node, Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Node, Error> {
        Ok(Node::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Node, Error> {
        Ok(Node::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Node, Error> {
        Ok(Node::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Node, Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Node, Error>
    where
        T: ?Sized + Serialize,
    {
        let mut members = IndexMap::new();
        members.insert(variant.to_string(), to_node(value)?);
        Ok(Node::Object(members))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeArray, Error> {
        Ok(SerializeArray {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeArray, Error> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SerializeArray, Error> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant, Error> {
        Ok(SerializeTupleVariant {
            variant: variant.to_string(),
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeObject, Error> {
        Ok(SerializeObject {
            members: IndexMap::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeObject, Error> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeStructVariant, Error> {
        Ok(SerializeStructVariant {
            variant: variant.to_string(),
            members: IndexMap::with_capacity(len),
        })
    }
}

struct SerializeArray {
    items: Vec<Node>,
}

impl ser::SerializeSeq for SerializeArray {
    type Ok = Node;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), Error>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(to_node(value)?);
        Ok(())
    }

    fn end(self) -> Result<Node, Error> {
        Ok(Node::Array(self.items))
    }
}

impl ser::SerializeTuple for SerializeArray {
    type Ok = Node;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), Error>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Node, Error> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeArray {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), Error>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Node, Error> {
        ser::SerializeSeq::end(self)
    }
}

struct SerializeTupleVariant {
    variant: String,
    items: Vec<Node>,
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), Error>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(to_node(value)?);
        Ok(())
    }

    fn end(self) -> Result<Node, Error> {
        let mut members = IndexMap::new();
        members.insert(self.variant, Node::Array(self.items));
        Ok(Node::Object(members))
    }
}

struct SerializeObject {
    members: IndexMap<String, Node>,
    next_key: Option<String>,
}

impl ser::SerializeMap for SerializeObject {
    type Ok = Node;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), Error>
    where
        T: ?Sized + Serialize,
    {
        self.next_key = Some(key.serialize(MapKeySerializer)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), Error>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called before serialize_key"))?;
        self.members.insert(key, to_node(value)?);
        Ok(())
    }

    fn end(self) -> Result<Node, Error> {
        Ok(Node::Object(self.members))
    }
}

impl ser::SerializeStruct for SerializeObject {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), Error>
    where
        T: ?Sized + Serialize,
    {
        self.members.insert(key.to_string(), to_node(value)?);
        Ok(())
    }

    fn end(self) -> Result<Node, Error> {
        ser::SerializeMap::end(self)
    }
}

struct SerializeStructVariant {
    variant: String,
    members: IndexMap<String, Node>,
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Node;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), Error>
    where
        T: ?Sized + Serialize,
    {
        self.members.insert(key.to_string(), to_node(value)?);
        Ok(())
    }

    fn end(self) -> Result<Node, Error> {
        let mut outer = IndexMap::new();
        outer.insert(self.variant, Node::Object(self.members));
        Ok(Node::Object(outer))
    }
}

/// Accepts map keys that have a natural string form
struct MapKeySerializer;

fn key_must_be_a_string() -> Error {
    Error::custom("key must be a string")
}

impl ser::Serializer for MapKeySerializer {
    type Ok = String;
    type Error = Error;

    type SerializeSeq = Impossible<String, Error>;
    type SerializeTuple = Impossible<String, Error>;
    type SerializeTupleStruct = Impossible<String, Error>;
    type SerializeTupleVariant = Impossible<String, Error>;
    type SerializeMap = Impossible<String, Error>;
    type SerializeStruct = Impossible<String, Error>;
    type SerializeStructVariant = Impossible<String, Error>;

    fn serialize_bool(self, v: bool) -> Result<String, Error> {
        Ok(v.to_string())
    }

    fn serialize_i8(self, v: i8) -> Result<String, Error> {
        Ok(v.to_string())
    }

    fn serialize_i16(self, v: i16) -> Result<String, Error> {
        Ok(v.to_string())
    }

    fn serialize_i32(self, v: i32) -> Result<String, Error> {
        Ok(v.to_string())
    }

    fn serialize_i64(self, v: i64) -> Result<String, Error> {
        Ok(v.to_string())
    }

    fn serialize_i128(self, v: i128) -> Result<String, Error> {
        Ok(v.to_string())
    }

    fn serialize_u8(self, v: u8) -> Result<String, Error> {
        Ok(v.to_string())
    }

    fn serialize_u16(self, v: u16) -> Result<String, Error> {
        Ok(v.to_string())
    }

    fn serialize_u32(self, v: u32) -> Result<String, Error> {
        Ok(v.to_string())
    }

    fn serialize_u64(self, v: u64) -> Result<String, Error> {
        Ok(v.to_string())
    }

    fn serialize_u128(self, v: u128) -> Result<String, Error> {
        Ok(v.to_string())
    }

    fn serialize_f32(self, _v: f32) -> Result<String, Error> {
        Err(key_must_be_a_string())
    }

    fn serialize_f64(self, _v: f64) -> Result<String, Error> {
        Err(key_must_be_a_string())
    }

    fn serialize_char(self, v: char) -> Result<String, Error> {
        Ok(v.to_string())
    }

    fn serialize_str(self, v: &str) -> Result<String, Error> {
        Ok(v.to_string())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String, Error> {
        Err(key_must_be_a_string())
    }

    fn serialize_none(self) -> Result<String, Error> {
        Err(key_must_be_a_string())
    }

    fn serialize_some<T>(self, _value: &T) -> Result<String, Error>
    where
        T: ?Sized + Serialize,
    {
        Err(key_must_be_a_string())
    }

    fn serialize_unit(self) -> Result<String, Error> {
        Err(key_must_be_a_string())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String, Error> {
        Err(key_must_be_a_string())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String, Error> {
        Ok(variant.to_string())
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<String, Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String, Error>
    where
        T: ?Sized + Serialize,
    {
        Err(key_must_be_a_string())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Error> {
        Err(key_must_be_a_string())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Error> {
        Err(key_must_be_a_string())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, Error> {
        Err(key_must_be_a_string())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Error> {
        Err(key_must_be_a_string())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Error> {
        Err(key_must_be_a_string())
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, Error> {
        Err(key_must_be_a_string())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Error> {
        Err(key_must_be_a_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Reading {
        sensor: &'static str,
        value: f64,
    }

    #[derive(Serialize)]
    enum Order {
        Stop,
        Warp(u8),
        Course { heading: u16, mark: u16 },
    }

    #[test]
    fn test_struct_keeps_member_order() {
        let node = to_node(&Reading {
            sensor: "warp core",
            value: 9.5,
        })
        .unwrap();
        let keys: Vec<_> = node.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["sensor", "value"]);
        assert_eq!(node.to_string(), r#"{"sensor":"warp core","value":9.5}"#);
    }

    #[test]
    fn test_non_finite_floats_stay_distinct() {
        let nan = to_node(&f64::NAN).unwrap();
        let inf = to_node(&f64::INFINITY).unwrap();
        let neg_inf = to_node(&f64::NEG_INFINITY).unwrap();

        assert_ne!(nan, inf);
        assert_ne!(inf, neg_inf);
        assert_ne!(nan, Node::Null);
        assert_eq!(nan, to_node(&f64::NAN).unwrap());
        assert_eq!(nan.to_string(), "NaN");
        assert_eq!(neg_inf.to_string(), "-inf");
    }

    #[test]
    fn test_wide_integers() {
        assert_eq!(to_node(&u128::MAX).unwrap().to_string(), u128::MAX.to_string());
        assert_eq!(to_node(&i128::MIN).unwrap().to_string(), i128::MIN.to_string());
        assert_eq!(to_node(&1i8).unwrap(), to_node(&1u64).unwrap());
        assert_ne!(to_node(&1u8).unwrap(), to_node(&1.0f64).unwrap());
    }

    #[test]
    fn test_enum_shapes_follow_serde_json() {
        let orders = vec![
            Order::Stop,
            Order::Warp(9),
            Order::Course {
                heading: 270,
                mark: 4,
            },
        ];
        assert_eq!(
            to_node(&orders).unwrap(),
            Node::from(json!(["Stop", {"Warp": 9}, {"Course": {"heading": 270, "mark": 4}}]))
        );
    }

    #[test]
    fn test_option_and_unit() {
        assert_eq!(to_node(&None::<u8>).unwrap(), Node::Null);
        assert_eq!(to_node(&Some(3u8)).unwrap(), Node::from(3u8));
        assert_eq!(to_node(&()).unwrap(), Node::Null);
    }

    #[test]
    fn test_map_keys() {
        let mut decks = BTreeMap::new();
        decks.insert(10u32, "ten forward");
        assert_eq!(
            to_node(&decks).unwrap().get("10"),
            Some(&Node::from("ten forward"))
        );

        let mut bad = BTreeMap::new();
        bad.insert(vec![1u8], 1);
        let err = to_node(&bad).unwrap_err();
        assert!(err.to_string().contains("key must be a string"));
    }

    #[test]
    fn test_from_json_value() {
        let node = Node::from(json!({"crew": [1, -2, 0.5], "name": "defiant", "cloak": null}));
        assert_eq!(node.get("name").and_then(Node::as_str), Some("defiant"));
        assert_eq!(
            node.get("crew").and_then(Node::as_array).map(<[Node]>::len),
            Some(3)
        );
        assert!(node.get("cloak").unwrap().is_null());
    }
}
