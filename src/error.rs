use serde_json::Value;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Which table a registration was aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryKind {
    Format,
    Type,
}

impl std::fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryKind::Format => f.write_str("format"),
            RegistryKind::Type => f.write_str("type"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// The node handed to the compiler is not a JSON object.
    #[error("invalid schema node: expected an object, found {found}")]
    InvalidSchemaNode { found: Value },

    /// `type` is neither a string nor an array of strings.
    #[error("unsupported json schema {node}")]
    UnsupportedSchema { node: Value },

    #[error("unknown type `{name}` in schema {node}")]
    UnknownType { name: String, node: Value },

    #[error("missing format `{name}`, register it before compiling")]
    UnknownFormat { name: String },

    #[error("keyword `{keyword}` must be {expected}")]
    InvalidKeyword {
        keyword: &'static str,
        expected: &'static str,
    },

    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("duplicated {kind} `{name}`")]
    DuplicateRegistration { kind: RegistryKind, name: String },

    #[error("reserved type `{name}`")]
    ReservedName { name: String },
}
