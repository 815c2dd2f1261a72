use std::collections::HashSet;

use indexmap::IndexMap;

use crate::error::Result;
use crate::ir::{Field, Primitive, Struct, TypeDescriptor};
use crate::schema::SchemaNode;

use super::Compiler;

pub(super) fn object_type(compiler: &Compiler, node: &SchemaNode) -> Result<TypeDescriptor> {
    let props = match node.properties()? {
        Some(props) if !props.is_empty() => props,
        _ => return Ok(TypeDescriptor::Primitive(Primitive::Object)),
    };
    let required: HashSet<&str> = node.required()?.into_iter().collect();

    let mut fields = IndexMap::with_capacity(props.len());
    for (name, child) in props {
        let ty = compiler.compile(child)?;
        // booleans always carry a value (false), so they are never optional
        let optional = !required.contains(name.as_str()) && !ty.is_primitive(Primitive::Boolean);
        fields.insert(name.clone(), Field { ty, optional });
    }

    let label = node.string("description")?.map(str::to_string);
    Ok(TypeDescriptor::Struct(Struct { label, fields }))
}
