use crate::error::Result;
use crate::ir::{Primitive, TypeDescriptor};
use crate::predicate::{Predicate, Refinements};
use crate::schema::{Items, SchemaNode};

use super::Compiler;
use super::num::refine;

pub(super) fn array_type(compiler: &Compiler, node: &SchemaNode) -> Result<TypeDescriptor> {
    let base = match node.items()? {
        // positions are exact; minItems/maxItems do not apply
        Some(Items::Tuple(nodes)) => {
            return nodes
                .iter()
                .map(|n| compiler.compile(n))
                .collect::<Result<Vec<_>>>()
                .map(TypeDescriptor::Tuple);
        }
        Some(Items::Single(item)) => TypeDescriptor::List(Box::new(compiler.compile(item)?)),
        None => TypeDescriptor::Primitive(Primitive::Array),
    };

    let mut preds = Refinements::builder();
    if let Some(n) = node.count("minItems")? {
        preds.push(Predicate::MinItems(n));
    }
    if let Some(n) = node.count("maxItems")? {
        preds.push(Predicate::MaxItems(n));
    }
    Ok(refine(base, preds))
}
