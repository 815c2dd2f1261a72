//! `--registry` file: which formats and custom types to load before compiling.
use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use schematype::{Compiler, Registry};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// preload date, date-time, time, email, uri, ipv4, ipv6, uuid
    #[serde(default)]
    pub standard_formats: bool,

    /// custom types, compiled in file order; later ones may use earlier ones
    #[serde(default)]
    pub types: IndexMap<String, Value>,
}

impl RegistryConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read registry file {}", path.display()))?;
        from_slice_with_path(&bytes)
            .with_context(|| format!("invalid registry file {}", path.display()))
    }

    pub fn build(&self) -> Result<Registry> {
        let mut registry = if self.standard_formats {
            Registry::with_standard_formats()
        } else {
            Registry::new()
        };
        for (name, schema) in &self.types {
            let ty = Compiler::new(&registry)
                .compile(schema)
                .with_context(|| format!("failed to compile custom type `{name}`"))?;
            registry.register_type(name.clone(), ty)?;
        }
        Ok(registry)
    }
}

/// Deserialize with the JSON path of the failure in the error message.
pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| {
        let path = err.path().to_string();
        anyhow::anyhow!("at JSON path {path} → {}", err.into_inner())
    })
}
