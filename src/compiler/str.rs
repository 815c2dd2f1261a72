use crate::error::{Error, Result};
use crate::ir::{Enumeration, Primitive, TypeDescriptor};
use crate::pattern::Pattern;
use crate::predicate::{Predicate, Refinements};
use crate::registry::Registry;
use crate::schema::SchemaNode;

use super::num::refine;

pub(super) fn string_type(node: &SchemaNode, registry: &Registry) -> Result<TypeDescriptor> {
    // a closed set wins over every other string keyword
    if let Some(keyword) = node.get("enum") {
        return Enumeration::from_keyword(keyword)
            .map(TypeDescriptor::Enumeration)
            .ok_or(Error::InvalidKeyword { keyword: "enum", expected: "an array or an object" });
    }

    let mut preds = Refinements::builder();
    if let Some(n) = node.count("minLength")? {
        preds.push(Predicate::MinLength(n));
    }
    if let Some(n) = node.count("maxLength")? {
        preds.push(Predicate::MaxLength(n));
    }
    if let Some(source) = node.string("pattern")? {
        preds.push(Predicate::Pattern(Pattern::parse(source)?));
    }
    if let Some(name) = node.string("format")? {
        let format = registry
            .format(name)
            .ok_or_else(|| Error::UnknownFormat { name: name.to_string() })?;
        preds.push(Predicate::Format(format.clone()));
    }
    Ok(refine(TypeDescriptor::Primitive(Primitive::String), preds))
}

#[cfg(test)]
mod tests {
    use crate::compiler::{Compiler, compile};
    use crate::error::Error;
    use crate::ir::{Kind, Primitive};
    use crate::predicate::{Predicate, Temporal};
    use crate::registry::Registry;
    use serde_json::json;

    #[test]
    fn plain_string() {
        let t = compile(&json!({"type": "string"})).unwrap();
        assert!(t.is_primitive(Primitive::String));
    }

    #[test]
    fn enum_accepts_exactly_its_members() {
        let t = compile(&json!({
            "type": "string",
            "enum": ["Street", "Avenue", "Boulevard"],
            "minLength": 100
        }))
        .unwrap();
        assert_eq!(t.kind(), Kind::Enumeration);
        assert!(t.accepts(&json!("Street")));
        assert!(t.accepts(&json!("Boulevard")));
        assert!(!t.accepts(&json!("a")));
        assert!(!t.accepts(&json!("street")));
    }

    #[test]
    fn enum_members_keep_their_json_type() {
        let t = compile(&json!({"type": "string", "enum": [1]})).unwrap();
        assert!(t.accepts(&json!(1)));
        assert!(!t.accepts(&json!("1")));
    }

    #[test]
    fn pattern_classes_are_ascii() {
        let t = compile(&json!({"type": "string", "pattern": r"^\d{3}$"})).unwrap();
        assert!(t.accepts(&json!("123")));
        assert!(!t.accepts(&json!("١٢٣")));
        let t = compile(&json!({"type": "string", "pattern": "^(?!admin$).+"})).unwrap();
        assert!(t.accepts(&json!("bob")));
        assert!(!t.accepts(&json!("admin")));
    }

    #[test]
    fn min_and_max_length() {
        let t = compile(&json!({"type": "string", "minLength": 2})).unwrap();
        assert_eq!(t.kind(), Kind::Refinement);
        assert!(t.base().unwrap().is_primitive(Primitive::String));
        assert!(t.accepts(&json!("aa")));
        assert!(!t.accepts(&json!("a")));

        let t = compile(&json!({"type": "string", "maxLength": 2})).unwrap();
        assert!(t.accepts(&json!("aa")));
        assert!(!t.accepts(&json!("aaa")));
    }

    #[test]
    fn predicates_are_added_in_keyword_order() {
        let mut registry = Registry::new();
        registry.register_format("lower", |s: &str| s.chars().all(|c| c.is_lowercase())).unwrap();
        let t = Compiler::new(&registry)
            .compile(&json!({
                "format": "lower",
                "pattern": "/^H/i",
                "maxLength": 5,
                "minLength": 1,
                "type": "string"
            }))
            .unwrap();
        let preds = t.refinements().unwrap().predicates();
        assert!(matches!(preds[0], Predicate::MinLength(1)));
        assert!(matches!(preds[1], Predicate::MaxLength(5)));
        assert!(matches!(preds[2], Predicate::Pattern(_)));
        assert!(matches!(preds[3], Predicate::Format(_)));
        assert!(t.accepts(&json!("hello")));
        assert!(!t.accepts(&json!("Hello")));
        assert!(!t.accepts(&json!("helloo")));
    }

    #[test]
    fn pattern() {
        let t = compile(&json!({"type": "string", "pattern": "^h"})).unwrap();
        assert!(t.accepts(&json!("hello")));
        assert!(!t.accepts(&json!("aaa")));
    }

    #[test]
    fn unregistered_format_fails() {
        let err = compile(&json!({"type": "string", "format": "email"})).unwrap_err();
        assert!(matches!(err, Error::UnknownFormat { ref name } if name == "email"));
    }

    #[test]
    fn temporal_formats_are_flagged() {
        let registry = Registry::with_standard_formats();
        let t = Compiler::new(&registry)
            .compile(&json!({"type": "string", "format": "date"}))
            .unwrap();
        assert_eq!(t.temporal(), Some(Temporal::Date));
        assert!(t.accepts(&json!("2020-01-31")));
        assert!(!t.accepts(&json!("2020-01-32")));
    }

    #[test]
    fn malformed_keywords_fail() {
        assert!(matches!(
            compile(&json!({"type": "string", "minLength": "2"})),
            Err(Error::InvalidKeyword { keyword: "minLength", .. })
        ));
        assert!(matches!(
            compile(&json!({"type": "string", "enum": "a"})),
            Err(Error::InvalidKeyword { keyword: "enum", .. })
        ));
    }
}
