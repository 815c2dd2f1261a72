// Compiled type descriptors. Immutable once built; composites own their members.
use indexmap::IndexMap;
use serde_json::{Value, json};

use crate::predicate::{Refinements, Temporal};

static NULL: Value = Value::Null;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Null,
    String,
    Number,
    Integer,             // number with no fractional part
    Boolean,
    Object,              // any JSON object
    Array,               // any JSON array
    Any,
}

/// Kind tag for consumers walking a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Primitive,
    Enumeration,
    Refinement,
    Struct,
    List,
    Tuple,
    Union,
    Custom,
}

#[derive(Debug, Clone)]
pub enum TypeDescriptor {
    Primitive(Primitive),
    Enumeration(Enumeration),
    Refinement(Refinement),
    Struct(Struct),
    List(Box<TypeDescriptor>),
    Tuple(Vec<TypeDescriptor>),
    Union(Vec<TypeDescriptor>),
    Custom { name: String, target: Box<TypeDescriptor> },
}

#[derive(Debug, Clone)]
pub struct Refinement {
    pub base: Box<TypeDescriptor>,
    pub predicate: Refinements,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub value: Value,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enumeration {
    pub members: Vec<EnumMember>,
}

#[derive(Debug, Clone)]
pub struct Struct {
    /// Display label taken from `description`.
    pub label: Option<String>,
    pub fields: IndexMap<String, Field>,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub ty: TypeDescriptor,
    pub optional: bool,  // absent or null is accepted
}

/// One failed membership check.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// JSON Pointer into the instance; empty for the root.
    pub path: String,
    pub expected: String,
    pub actual: Value,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Primitive {
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Null => "Null",
            Primitive::String => "String",
            Primitive::Number => "Number",
            Primitive::Integer => "Integer",
            Primitive::Boolean => "Boolean",
            Primitive::Object => "Object",
            Primitive::Array => "Array",
            Primitive::Any => "Any",
        }
    }

    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Primitive::Null => value.is_null(),
            Primitive::String => value.is_string(),
            Primitive::Number => value.is_number(),
            Primitive::Integer => crate::predicate::Predicate::Integral.test(value),
            Primitive::Boolean => value.is_boolean(),
            Primitive::Object => value.is_object(),
            Primitive::Array => value.is_array(),
            Primitive::Any => true,
        }
    }
}

impl Enumeration {
    /// `enum` as an array lists the values; as an object its keys are the
    /// values and its entries are the labels.
    pub fn from_keyword(keyword: &Value) -> Option<Self> {
        let members = match keyword {
            Value::Array(values) => values
                .iter()
                .map(|value| EnumMember { value: value.clone(), label: label_of(value) })
                .collect(),
            Value::Object(entries) => entries
                .iter()
                .map(|(key, label)| EnumMember {
                    value: Value::String(key.clone()),
                    label: label_of(label),
                })
                .collect(),
            _ => return None,
        };
        Some(Self { members })
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.members.iter().any(|m| m.value == *value)
    }
}

fn label_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Field {
    fn accepts(&self, value: Option<&Value>) -> bool {
        let value = value.unwrap_or(&NULL);
        (self.optional && value.is_null()) || self.ty.accepts(value)
    }
}

impl TypeDescriptor {
    pub const ANY: TypeDescriptor = TypeDescriptor::Primitive(Primitive::Any);

    pub fn kind(&self) -> Kind {
        match self {
            TypeDescriptor::Primitive(_) => Kind::Primitive,
            TypeDescriptor::Enumeration(_) => Kind::Enumeration,
            TypeDescriptor::Refinement(_) => Kind::Refinement,
            TypeDescriptor::Struct(_) => Kind::Struct,
            TypeDescriptor::List(_) => Kind::List,
            TypeDescriptor::Tuple(_) => Kind::Tuple,
            TypeDescriptor::Union(_) => Kind::Union,
            TypeDescriptor::Custom { .. } => Kind::Custom,
        }
    }

    pub fn primitive(&self) -> Option<Primitive> {
        match self {
            TypeDescriptor::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    pub fn is_primitive(&self, p: Primitive) -> bool {
        self.primitive() == Some(p)
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, TypeDescriptor::Struct(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, TypeDescriptor::List(_))
    }

    /// Wrapped type of a refinement or custom reference.
    pub fn base(&self) -> Option<&TypeDescriptor> {
        match self {
            TypeDescriptor::Refinement(r) => Some(&r.base),
            TypeDescriptor::Custom { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn refinements(&self) -> Option<&Refinements> {
        match self {
            TypeDescriptor::Refinement(r) => Some(&r.predicate),
            _ => None,
        }
    }

    pub fn fields(&self) -> Option<&IndexMap<String, Field>> {
        match self {
            TypeDescriptor::Struct(s) => Some(&s.fields),
            _ => None,
        }
    }

    pub fn element(&self) -> Option<&TypeDescriptor> {
        match self {
            TypeDescriptor::List(item) => Some(item),
            _ => None,
        }
    }

    /// Tuple positions or union alternatives.
    pub fn members(&self) -> Option<&[TypeDescriptor]> {
        match self {
            TypeDescriptor::Tuple(xs) | TypeDescriptor::Union(xs) => Some(xs),
            _ => None,
        }
    }

    pub fn enumeration(&self) -> Option<&Enumeration> {
        match self {
            TypeDescriptor::Enumeration(e) => Some(e),
            _ => None,
        }
    }

    /// Date/time widget hint, set when a refinement uses a temporal format.
    pub fn temporal(&self) -> Option<Temporal> {
        self.refinements().and_then(Refinements::temporal)
    }

    pub fn name(&self) -> String {
        self.to_string()
    }

    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            TypeDescriptor::Primitive(p) => p.accepts(value),
            TypeDescriptor::Enumeration(e) => e.contains(value),
            TypeDescriptor::Refinement(r) => r.base.accepts(value) && r.predicate.test(value),
            TypeDescriptor::Struct(s) => match value.as_object() {
                Some(map) => s.fields.iter().all(|(k, f)| f.accepts(map.get(k))),
                None => false,
            },
            TypeDescriptor::List(item) => value
                .as_array()
                .is_some_and(|xs| xs.iter().all(|x| item.accepts(x))),
            TypeDescriptor::Tuple(elems) => value.as_array().is_some_and(|xs| {
                xs.len() == elems.len() && elems.iter().zip(xs).all(|(t, x)| t.accepts(x))
            }),
            TypeDescriptor::Union(arms) => arms.iter().any(|t| t.accepts(value)),
            TypeDescriptor::Custom { target, .. } => target.accepts(value),
        }
    }

    /// Like [`accepts`](Self::accepts) but reports every failing location.
    pub fn validate(&self, value: &Value) -> Result<(), Vec<Violation>> {
        let mut out = Vec::new();
        self.collect(value, "", &mut out);
        if out.is_empty() { Ok(()) } else { Err(out) }
    }

    fn collect(&self, value: &Value, path: &str, out: &mut Vec<Violation>) {
        let fail = |out: &mut Vec<Violation>| out.push(Violation {
            path: path.to_string(),
            expected: self.name(),
            actual: value.clone(),
        });
        match self {
            TypeDescriptor::Primitive(_)
            | TypeDescriptor::Enumeration(_)
            | TypeDescriptor::Union(_) => {
                if !self.accepts(value) {
                    fail(out);
                }
            }
            TypeDescriptor::Refinement(r) => {
                if !r.base.accepts(value) {
                    r.base.collect(value, path, out);
                } else if !r.predicate.test(value) {
                    fail(out);
                }
            }
            TypeDescriptor::Struct(s) => {
                let Some(map) = value.as_object() else { return fail(out) };
                for (key, field) in &s.fields {
                    let child = map.get(key).unwrap_or(&NULL);
                    if field.optional && child.is_null() {
                        continue;
                    }
                    field.ty.collect(child, &child_path(path, key), out);
                }
            }
            TypeDescriptor::List(item) => {
                let Some(xs) = value.as_array() else { return fail(out) };
                for (i, x) in xs.iter().enumerate() {
                    item.collect(x, &child_path(path, &i.to_string()), out);
                }
            }
            TypeDescriptor::Tuple(elems) => match value.as_array() {
                Some(xs) if xs.len() == elems.len() => {
                    for (i, (t, x)) in elems.iter().zip(xs).enumerate() {
                        t.collect(x, &child_path(path, &i.to_string()), out);
                    }
                }
                _ => fail(out),
            },
            TypeDescriptor::Custom { target, .. } => target.collect(value, path, out),
        }
    }

    /// JSON view of the descriptor tree, for tooling and debugging.
    pub fn describe(&self) -> Value {
        match self {
            TypeDescriptor::Primitive(p) => json!({ "kind": "primitive", "name": p.name() }),
            TypeDescriptor::Enumeration(e) => json!({
                "kind": "enumeration",
                "members": e.members.iter()
                    .map(|m| json!({ "value": m.value, "label": m.label }))
                    .collect::<Vec<_>>(),
            }),
            TypeDescriptor::Refinement(r) => {
                let mut o = json!({
                    "kind": "refinement",
                    "base": r.base.describe(),
                    "predicates": r.predicate.predicates().iter()
                        .map(|p| p.to_string())
                        .collect::<Vec<_>>(),
                });
                if let Some(t) = r.predicate.temporal() {
                    o["temporal"] = Value::from(format!("{t:?}").to_lowercase());
                }
                o
            }
            TypeDescriptor::Struct(s) => {
                let fields: serde_json::Map<String, Value> = s.fields.iter()
                    .map(|(k, f)| (k.clone(), json!({ "optional": f.optional, "type": f.ty.describe() })))
                    .collect();
                let mut o = json!({ "kind": "struct", "fields": fields });
                if let Some(label) = &s.label {
                    o["label"] = Value::from(label.clone());
                }
                o
            }
            TypeDescriptor::List(item) => json!({ "kind": "list", "element": item.describe() }),
            TypeDescriptor::Tuple(xs) => json!({
                "kind": "tuple",
                "elements": xs.iter().map(TypeDescriptor::describe).collect::<Vec<_>>(),
            }),
            TypeDescriptor::Union(xs) => json!({
                "kind": "union",
                "alternatives": xs.iter().map(TypeDescriptor::describe).collect::<Vec<_>>(),
            }),
            TypeDescriptor::Custom { name, target } => json!({
                "kind": "custom",
                "name": name,
                "target": target.describe(),
            }),
        }
    }
}

fn child_path(parent: &str, segment: &str) -> String {
    format!("{parent}/{}", segment.replace('~', "~0").replace('/', "~1"))
}

impl std::fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn list(f: &mut std::fmt::Formatter<'_>, xs: &[TypeDescriptor], sep: &str) -> std::fmt::Result {
            for (i, x) in xs.iter().enumerate() {
                if i > 0 { f.write_str(sep)?; }
                write!(f, "{x}")?;
            }
            Ok(())
        }
        match self {
            TypeDescriptor::Primitive(p) => f.write_str(p.name()),
            TypeDescriptor::Enumeration(e) => {
                for (i, m) in e.members.iter().enumerate() {
                    if i > 0 { f.write_str(" | ")?; }
                    write!(f, "{}", m.value)?;
                }
                Ok(())
            }
            TypeDescriptor::Refinement(r) => write!(f, "{{{} | {}}}", r.base, r.predicate),
            TypeDescriptor::Struct(s) => {
                if let Some(label) = &s.label {
                    return f.write_str(label);
                }
                f.write_str("{")?;
                for (i, (k, field)) in s.fields.iter().enumerate() {
                    if i > 0 { f.write_str(", ")?; }
                    let q = if field.optional { "?" } else { "" };
                    write!(f, "{k}: {q}{}", field.ty)?;
                }
                f.write_str("}")
            }
            TypeDescriptor::List(item) => write!(f, "Array<{item}>"),
            TypeDescriptor::Tuple(xs) => {
                f.write_str("[")?;
                list(f, xs, ", ")?;
                f.write_str("]")
            }
            TypeDescriptor::Union(xs) => list(f, xs, " | "),
            TypeDescriptor::Custom { name, .. } => f.write_str(name),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let path = if self.path.is_empty() { "(root)" } else { &self.path };
        write!(f, "{path}: expected {}, got {}", self.expected, self.actual)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
