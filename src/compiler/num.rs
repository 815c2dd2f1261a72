use crate::error::Result;
use crate::ir::{Primitive, Refinement, TypeDescriptor};
use crate::predicate::{Predicate, RefinementsBuilder, Refinements};
use crate::schema::SchemaNode;

/// Wrap `base` when at least one predicate was collected.
pub(super) fn refine(base: TypeDescriptor, preds: RefinementsBuilder) -> TypeDescriptor {
    match preds.finish() {
        Some(predicate) => TypeDescriptor::Refinement(Refinement {
            base: Box::new(base),
            predicate,
        }),
        None => base,
    }
}

/// `minimum`/`maximum`, with boolean `exclusiveMinimum`/`exclusiveMaximum`
/// switching the bound to strict. A numeric `exclusiveMinimum`/
/// `exclusiveMaximum` is a bound of its own.
fn bounds(node: &SchemaNode, preds: &mut RefinementsBuilder) -> Result<()> {
    let numeric = |keyword: &str| node.get(keyword).and_then(serde_json::Value::as_f64);
    let (excl_min, excl_max) = (numeric("exclusiveMinimum"), numeric("exclusiveMaximum"));

    if let Some(min) = node.number("minimum")? {
        preds.push(if excl_min.is_none() && node.flag("exclusiveMinimum") {
            Predicate::ExclusiveMinimum(min)
        } else {
            Predicate::Minimum(min)
        });
    }
    if let Some(min) = excl_min {
        preds.push(Predicate::ExclusiveMinimum(min));
    }
    if let Some(max) = node.number("maximum")? {
        preds.push(if excl_max.is_none() && node.flag("exclusiveMaximum") {
            Predicate::ExclusiveMaximum(max)
        } else {
            Predicate::Maximum(max)
        });
    }
    if let Some(max) = excl_max {
        preds.push(Predicate::ExclusiveMaximum(max));
    }
    Ok(())
}

pub(super) fn number_type(node: &SchemaNode) -> Result<TypeDescriptor> {
    let mut preds = Refinements::builder();
    bounds(node, &mut preds)?;
    if node.flag("integer") {
        preds.push(Predicate::Integral);
    }
    Ok(refine(TypeDescriptor::Primitive(Primitive::Number), preds))
}

pub(super) fn integer_type(node: &SchemaNode) -> Result<TypeDescriptor> {
    let mut preds = Refinements::builder();
    bounds(node, &mut preds)?;
    Ok(refine(TypeDescriptor::Primitive(Primitive::Integer), preds))
}
