//! Validation predicates attached to refinements.
use std::sync::Arc;

use serde_json::Value;

use crate::pattern::Pattern;

pub type FormatFn = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// A named string check taken from the registry.
#[derive(Clone)]
pub struct Format {
    name: String,
    check: FormatFn,
}

/// Formats whose values are calendar/clock values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temporal {
    Date,
    DateTime,
    Time,
}

#[derive(Debug, Clone)]
pub enum Predicate {
    MinLength(usize),
    MaxLength(usize),
    Pattern(Pattern),
    Format(Format),
    Minimum(f64),
    ExclusiveMinimum(f64),
    Maximum(f64),
    ExclusiveMaximum(f64),
    Integral,
    MinItems(usize),
    MaxItems(usize),
}

/// Non-empty conjunction of predicates, evaluated in order.
#[derive(Debug, Clone)]
pub struct Refinements(Vec<Predicate>);

#[derive(Debug, Default)]
pub struct RefinementsBuilder(Vec<Predicate>);

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Format {
    pub fn new(name: impl Into<String>, check: FormatFn) -> Self {
        Self { name: name.into(), check }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn check(&self, s: &str) -> bool {
        (self.check)(s)
    }

    pub fn temporal(&self) -> Option<Temporal> {
        match self.name.as_str() {
            "date" => Some(Temporal::Date),
            "date-time" => Some(Temporal::DateTime),
            "time" => Some(Temporal::Time),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Format").field(&self.name).finish()
    }
}

fn is_integral(n: &serde_json::Number) -> bool {
    n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
}

impl Predicate {
    pub fn test(&self, value: &Value) -> bool {
        match self {
            Predicate::MinLength(n) => value.as_str().is_some_and(|s| s.chars().count() >= *n),
            Predicate::MaxLength(n) => value.as_str().is_some_and(|s| s.chars().count() <= *n),
            Predicate::Pattern(p) => value.as_str().is_some_and(|s| p.is_match(s)),
            Predicate::Format(f) => value.as_str().is_some_and(|s| f.check(s)),
            Predicate::Minimum(b) => value.as_f64().is_some_and(|x| x >= *b),
            Predicate::ExclusiveMinimum(b) => value.as_f64().is_some_and(|x| x > *b),
            Predicate::Maximum(b) => value.as_f64().is_some_and(|x| x <= *b),
            Predicate::ExclusiveMaximum(b) => value.as_f64().is_some_and(|x| x < *b),
            Predicate::Integral => matches!(value, Value::Number(n) if is_integral(n)),
            Predicate::MinItems(n) => value.as_array().is_some_and(|xs| xs.len() >= *n),
            Predicate::MaxItems(n) => value.as_array().is_some_and(|xs| xs.len() <= *n),
        }
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Predicate::MinLength(n) => write!(f, "minLength({n})"),
            Predicate::MaxLength(n) => write!(f, "maxLength({n})"),
            Predicate::Pattern(p) => write!(f, "pattern({p})"),
            Predicate::Format(x) => write!(f, "format({})", x.name()),
            Predicate::Minimum(b) => write!(f, ">= {b}"),
            Predicate::ExclusiveMinimum(b) => write!(f, "> {b}"),
            Predicate::Maximum(b) => write!(f, "<= {b}"),
            Predicate::ExclusiveMaximum(b) => write!(f, "< {b}"),
            Predicate::Integral => f.write_str("integral"),
            Predicate::MinItems(n) => write!(f, "minItems({n})"),
            Predicate::MaxItems(n) => write!(f, "maxItems({n})"),
        }
    }
}

impl Refinements {
    pub fn builder() -> RefinementsBuilder {
        RefinementsBuilder::default()
    }

    pub fn test(&self, value: &Value) -> bool {
        self.0.iter().all(|p| p.test(value))
    }

    pub fn first_failing(&self, value: &Value) -> Option<&Predicate> {
        self.0.iter().find(|p| !p.test(value))
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.0
    }

    pub fn temporal(&self) -> Option<Temporal> {
        self.0.iter().find_map(|p| match p {
            Predicate::Format(f) => f.temporal(),
            _ => None,
        })
    }
}

impl std::fmt::Display for Refinements {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, p) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" && ")?;
            }
            write!(f, "{p}")?;
        }
        Ok(())
    }
}

impl RefinementsBuilder {
    pub fn push(&mut self, predicate: Predicate) {
        tracing::trace!(%predicate, "adding predicate");
        self.0.push(predicate);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn finish(self) -> Option<Refinements> {
        if self.0.is_empty() { None } else { Some(Refinements(self.0)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lengths_count_chars() {
        assert!(Predicate::MinLength(2).test(&json!("αβ")));
        assert!(!Predicate::MaxLength(1).test(&json!("αβ")));
        assert!(!Predicate::MinLength(0).test(&json!(3)));
    }

    #[test]
    fn integral_accepts_whole_floats() {
        assert!(Predicate::Integral.test(&json!(1)));
        assert!(Predicate::Integral.test(&json!(1.0)));
        assert!(!Predicate::Integral.test(&json!(1.1)));
        assert!(!Predicate::Integral.test(&json!("1")));
    }

    #[test]
    fn empty_builder_yields_nothing() {
        assert!(Refinements::builder().finish().is_none());
    }

    #[test]
    fn conjunction_reports_first_failure() {
        let mut b = Refinements::builder();
        b.push(Predicate::Minimum(2.0));
        b.push(Predicate::ExclusiveMaximum(5.0));
        let r = b.finish().unwrap();
        assert!(r.test(&json!(3)));
        assert!(matches!(r.first_failing(&json!(1)), Some(Predicate::Minimum(_))));
        assert!(matches!(r.first_failing(&json!(5)), Some(Predicate::ExclusiveMaximum(_))));
        assert_eq!(r.to_string(), ">= 2 && < 5");
    }

    #[test]
    fn format_temporal_hint() {
        let f = Format::new("date-time", Arc::new(|_: &str| true));
        assert_eq!(f.temporal(), Some(Temporal::DateTime));
        let f = Format::new("email", Arc::new(|s: &str| s.contains('@')));
        assert_eq!(f.temporal(), None);
        assert!(Predicate::Format(f.clone()).test(&json!("a@b")));
        assert!(!Predicate::Format(f).test(&json!("ab")));
    }
}
