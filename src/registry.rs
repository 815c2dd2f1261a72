//! Caller-owned tables of named formats and custom types.
//!
//! Registration takes `&mut self`, compilation only borrows, so a registry
//! that has been shared with compiling threads can no longer change.
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{Error, RegistryKind, Result};
use crate::ir::TypeDescriptor;
use crate::predicate::Format;
use crate::schema::PrimitiveKind;

#[derive(Clone, Default)]
pub struct Registry {
    formats: IndexMap<String, Format>,
    types: IndexMap<String, TypeDescriptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the formats in [`crate::formats`].
    pub fn with_standard_formats() -> Self {
        let mut registry = Self::new();
        for (name, check) in crate::formats::STANDARD {
            registry
                .register_format(*name, *check)
                .expect("standard format names are unique");
        }
        registry
    }

    pub fn register_format<F>(&mut self, name: impl Into<String>, check: F) -> Result<()>
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        if self.formats.contains_key(&name) {
            return Err(Error::DuplicateRegistration { kind: RegistryKind::Format, name });
        }
        tracing::debug!(format = %name, "registered format");
        self.formats.insert(name.clone(), Format::new(name, Arc::new(check)));
        Ok(())
    }

    pub fn reset_formats(&mut self) {
        self.formats.clear();
    }

    pub fn register_type(&mut self, name: impl Into<String>, ty: TypeDescriptor) -> Result<()> {
        let name = name.into();
        if self.types.contains_key(&name) {
            return Err(Error::DuplicateRegistration { kind: RegistryKind::Type, name });
        }
        if PrimitiveKind::is_reserved(&name) {
            return Err(Error::ReservedName { name });
        }
        tracing::debug!(type_name = %name, descriptor = %ty, "registered type");
        self.types.insert(name, ty);
        Ok(())
    }

    pub fn reset_types(&mut self) {
        self.types.clear();
    }

    pub fn format(&self, name: &str) -> Option<&Format> {
        self.formats.get(name)
    }

    pub fn custom_type(&self, name: &str) -> Option<&TypeDescriptor> {
        self.types.get(name)
    }

    pub fn format_names(&self) -> impl Iterator<Item = &str> {
        self.formats.keys().map(String::as_str)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("formats", &self.formats.keys().collect::<Vec<_>>())
            .field("types", &self.types)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Primitive;

    #[test]
    fn duplicate_format_fails() {
        let mut r = Registry::new();
        r.register_format("email", |s: &str| s.contains('@')).unwrap();
        let err = r.register_format("email", |_: &str| true).unwrap_err();
        assert!(matches!(err, Error::DuplicateRegistration { kind: RegistryKind::Format, .. }));
        assert!(r.format("email").unwrap().check("a@b"));
    }

    #[test]
    fn format_names_are_not_reserved() {
        let mut r = Registry::new();
        assert!(r.register_format("string", |_: &str| true).is_ok());
    }

    #[test]
    fn duplicate_and_reserved_types_fail() {
        let mut r = Registry::new();
        let ty = TypeDescriptor::Primitive(Primitive::String);
        r.register_type("Money", ty.clone()).unwrap();
        assert!(matches!(
            r.register_type("Money", ty.clone()),
            Err(Error::DuplicateRegistration { kind: RegistryKind::Type, .. })
        ));
        assert!(matches!(r.register_type("array", ty), Err(Error::ReservedName { .. })));
    }

    #[test]
    fn reset_clears_entries() {
        let mut r = Registry::with_standard_formats();
        r.register_type("Money", TypeDescriptor::ANY).unwrap();
        assert!(r.format("date").is_some());
        r.reset_formats();
        r.reset_types();
        assert_eq!(r.format_names().count(), 0);
        assert_eq!(r.type_names().count(), 0);
        r.register_type("Money", TypeDescriptor::ANY).unwrap();
    }

    #[test]
    fn standard_formats_are_all_loaded() {
        let r = Registry::with_standard_formats();
        let names: Vec<_> = r.format_names().collect();
        assert_eq!(names.len(), crate::formats::STANDARD.len());
        for (name, _) in crate::formats::STANDARD {
            assert!(r.format(name).is_some(), "{name} missing");
        }
    }
}
