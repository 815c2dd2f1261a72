//! Read-only view over one JSON Schema node.
//!
//! The compiler never looks at raw `serde_json::Value`s directly; it goes
//! through [`SchemaNode`] so that shape errors in keywords are reported the
//! same way everywhere.
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::{Error, Result};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// The seven built-in schema kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Null,
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
}

/// One entry of `type`: a built-in kind or a caller-registered name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeName {
    Kind(PrimitiveKind),
    Custom(String),
}

/// What the `type` keyword says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeField {
    Absent,
    One(TypeName),
    Many(Vec<TypeName>),
}

/// Shape of the `items` keyword.
#[derive(Debug, Clone, Copy)]
pub enum Items<'a> {
    Single(&'a Value),
    Tuple(&'a [Value]),
}

#[derive(Debug, Clone, Copy)]
pub struct SchemaNode<'a> {
    raw: &'a Value,
    map: &'a Map<String, Value>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 7] = [
        PrimitiveKind::Null,
        PrimitiveKind::String,
        PrimitiveKind::Number,
        PrimitiveKind::Integer,
        PrimitiveKind::Boolean,
        PrimitiveKind::Object,
        PrimitiveKind::Array,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveKind::Null => "null",
            PrimitiveKind::String => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Object => "object",
            PrimitiveKind::Array => "array",
        }
    }

    pub fn is_reserved(name: &str) -> bool {
        name.parse::<PrimitiveKind>().is_ok()
    }
}

impl FromStr for PrimitiveKind {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        PrimitiveKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or(())
    }
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TypeName {
    fn parse(name: &str) -> Self {
        match name.parse::<PrimitiveKind>() {
            Ok(kind) => TypeName::Kind(kind),
            Err(()) => TypeName::Custom(name.to_string()),
        }
    }
}

impl<'a> SchemaNode<'a> {
    pub fn new(raw: &'a Value) -> Result<Self> {
        match raw {
            Value::Object(map) => Ok(Self { raw, map }),
            other => Err(Error::InvalidSchemaNode { found: other.clone() }),
        }
    }

    pub fn raw(&self) -> &'a Value {
        self.raw
    }

    pub fn get(&self, keyword: &str) -> Option<&'a Value> {
        self.map.get(keyword)
    }

    pub fn type_field(&self) -> Result<TypeField> {
        match self.get("type") {
            None => Ok(TypeField::Absent),
            Some(Value::String(name)) => Ok(TypeField::One(TypeName::parse(name))),
            Some(Value::Array(names)) => names
                .iter()
                .map(|name| match name {
                    Value::String(name) => Ok(TypeName::parse(name)),
                    _ => Err(self.unsupported()),
                })
                .collect::<Result<Vec<_>>>()
                .map(TypeField::Many),
            Some(_) => Err(self.unsupported()),
        }
    }

    pub fn unsupported(&self) -> Error {
        Error::UnsupportedSchema { node: self.raw.clone() }
    }

    /// Non-negative integral keyword such as `minLength` or `maxItems`.
    /// `2.0` is accepted as `2`.
    pub fn count(&self, keyword: &'static str) -> Result<Option<usize>> {
        let Some(value) = self.get(keyword) else { return Ok(None) };
        let invalid = Error::InvalidKeyword { keyword, expected: "a non-negative integer" };
        if let Some(n) = value.as_u64() {
            return usize::try_from(n).map(Some).map_err(|_| invalid);
        }
        match value.as_f64() {
            Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= usize::MAX as f64 => Ok(Some(f as usize)),
            _ => Err(invalid),
        }
    }

    pub fn number(&self, keyword: &'static str) -> Result<Option<f64>> {
        match self.get(keyword) {
            None => Ok(None),
            Some(value) => value
                .as_f64()
                .map(Some)
                .ok_or(Error::InvalidKeyword { keyword, expected: "a number" }),
        }
    }

    pub fn string(&self, keyword: &'static str) -> Result<Option<&'a str>> {
        match self.get(keyword) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .map(Some)
                .ok_or(Error::InvalidKeyword { keyword, expected: "a string" }),
        }
    }

    /// Loose truthiness: present and not `false`, `null`, `0` or `""`.
    pub fn flag(&self, keyword: &str) -> bool {
        match self.get(keyword) {
            None | Some(Value::Null) | Some(Value::Bool(false)) => false,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
            Some(Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }

    pub fn properties(&self) -> Result<Option<&'a Map<String, Value>>> {
        match self.get("properties") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(props)) => Ok(Some(props)),
            Some(_) => Err(Error::InvalidKeyword { keyword: "properties", expected: "an object" }),
        }
    }

    pub fn required(&self) -> Result<Vec<&'a str>> {
        match self.get("required") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(names)) => names
                .iter()
                .map(|name| {
                    name.as_str().ok_or(Error::InvalidKeyword {
                        keyword: "required",
                        expected: "an array of strings",
                    })
                })
                .collect(),
            Some(_) => Err(Error::InvalidKeyword { keyword: "required", expected: "an array of strings" }),
        }
    }

    pub fn items(&self) -> Result<Option<Items<'a>>> {
        match self.get("items") {
            None => Ok(None),
            Some(single @ Value::Object(_)) => Ok(Some(Items::Single(single))),
            Some(Value::Array(nodes)) => Ok(Some(Items::Tuple(nodes))),
            Some(_) => Err(Error::InvalidKeyword { keyword: "items", expected: "an object or an array" }),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
