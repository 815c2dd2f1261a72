//! Compile JSON Schema documents into composable, in-memory type descriptors.
//!
//! ```
//! use schematype::{Compiler, Registry};
//! use serde_json::json;
//!
//! let mut registry = Registry::new();
//! registry.register_format("slug", |s: &str| s.chars().all(|c| c.is_ascii_lowercase() || c == '-')).unwrap();
//!
//! let ty = Compiler::new(&registry).compile(&json!({
//!     "type": "object",
//!     "properties": {
//!         "id": {"type": "string", "format": "slug"},
//!         "tags": {"type": "array", "items": {"type": "string"}}
//!     },
//!     "required": ["id"]
//! })).unwrap();
//!
//! assert!(ty.accepts(&json!({"id": "hello-world"})));
//! assert!(!ty.accepts(&json!({"id": "Hello World"})));
//! ```
pub mod error;
pub mod schema;
pub mod pattern;
pub mod predicate;
pub mod formats;
pub mod ir;
pub mod registry;
pub mod compiler;

pub use compiler::{Compiler, compile};
pub use error::{Error, RegistryKind, Result};
pub use ir::{Field, Kind, Primitive, TypeDescriptor, Violation};
pub use registry::Registry;
