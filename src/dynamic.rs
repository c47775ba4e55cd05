//! Records whose fields are declared at runtime.
//!
//! Every field of a [`DynamicRecord`] holds the raw cell text, which makes
//! it useful for inspecting a file before a typed record exists for it.

use std::any::Any;

use indexmap::IndexMap;
use serde::Serialize;

use crate::record::{FieldDecl, Record};

/// A record of string fields declared by name and tag.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DynamicRecord {
    #[serde(skip)]
    decls: Vec<FieldDecl>,
    #[serde(flatten)]
    values: IndexMap<String, String>,
}

impl DynamicRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an exported string field bound by `tag`.
    pub fn with_field(mut self, name: impl Into<String>, tag: impl Into<String>) -> Self {
        let name = name.into();
        self.decls.push(FieldDecl::owned(name.clone(), Some(tag.into()), true));
        self.values.insert(name, String::new());
        self
    }

    /// Parse a `NAME=TAG` field declaration, as accepted on the command line.
    pub fn parse_field_spec(spec: &str) -> Option<(String, String)> {
        let (name, tag) = spec.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some((name.to_string(), tag.to_string()))
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(|s| s.as_str())
    }

    /// Empty every field, keeping the declarations.
    pub fn clear(&mut self) {
        for value in self.values.values_mut() {
            value.clear();
        }
    }
}

impl Record for DynamicRecord {
    fn fields(&self) -> &[FieldDecl] {
        &self.decls
    }

    fn field(&self, name: &str) -> Option<&dyn Any> {
        self.values.get(name).map(|v| v as &dyn Any)
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Any> {
        self.values.get_mut(name).map(|v| v as &mut dyn Any)
    }
}
