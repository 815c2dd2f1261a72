//! Schema → type descriptor compiler.
//!
//! One node in, one descriptor out. Nested nodes (properties, items, tuple
//! positions) are compiled first and the composite is built from the
//! results. The compiler is pure: it reads the node and the borrowed
//! [`Registry`] and nothing else.
pub mod str;
pub mod num;
pub mod arr;
pub mod obj;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::ir::{Primitive, TypeDescriptor};
use crate::registry::Registry;
use crate::schema::{PrimitiveKind, SchemaNode, TypeField, TypeName};

#[derive(Debug, Clone, Copy)]
pub struct Compiler<'r> {
    registry: &'r Registry,
}

impl<'r> Compiler<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn compile(&self, node: &Value) -> Result<TypeDescriptor> {
        let node = SchemaNode::new(node)?;
        match node.type_field()? {
            TypeField::Absent => Ok(TypeDescriptor::ANY),
            TypeField::One(name) => self.dispatch(&node, &name),
            TypeField::Many(names) => {
                tracing::debug!(arms = names.len(), "compiling union");
                names
                    .iter()
                    .map(|name| self.dispatch(&node, name))
                    .collect::<Result<Vec<_>>>()
                    .map(TypeDescriptor::Union)
            }
        }
    }

    fn dispatch(&self, node: &SchemaNode, name: &TypeName) -> Result<TypeDescriptor> {
        match name {
            TypeName::Kind(kind) => {
                tracing::debug!(%kind, "compiling node");
                self.primitive(node, *kind)
            }
            TypeName::Custom(name) => match self.registry.custom_type(name) {
                Some(target) => {
                    tracing::debug!(type_name = %name, "resolved custom type");
                    Ok(TypeDescriptor::Custom {
                        name: name.clone(),
                        target: Box::new(target.clone()),
                    })
                }
                None => Err(Error::UnknownType {
                    name: name.clone(),
                    node: node.raw().clone(),
                }),
            },
        }
    }

    fn primitive(&self, node: &SchemaNode, kind: PrimitiveKind) -> Result<TypeDescriptor> {
        match kind {
            PrimitiveKind::Null => Ok(TypeDescriptor::Primitive(Primitive::Null)),
            PrimitiveKind::Boolean => Ok(TypeDescriptor::Primitive(Primitive::Boolean)),
            PrimitiveKind::String => str::string_type(node, self.registry),
            PrimitiveKind::Number => num::number_type(node),
            PrimitiveKind::Integer => num::integer_type(node),
            PrimitiveKind::Object => obj::object_type(self, node),
            PrimitiveKind::Array => arr::array_type(self, node),
        }
    }
}

/// Compile against an empty registry.
pub fn compile(node: &Value) -> Result<TypeDescriptor> {
    let registry = Registry::new();
    Compiler::new(&registry).compile(node)
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
