//! Field bindings: which column feeds which field, and how.
//!
//! Bindings are built from field tags by the [`extractor`], then header
//! addressed bindings get their column positions from the [`resolver`].

pub mod extractor;
pub mod resolver;
pub mod tag;

use indexmap::IndexMap;
use serde::Serialize;

use crate::coerce::FieldKind;

pub use extractor::extract_bindings;
pub use resolver::resolve_columns;
pub use tag::{Addressing, FieldTag};

/// Resolved association of one record field to a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldBinding {
    pub field_name: String,
    /// Header label to match; `None` for index addressing.
    pub header_name: Option<String>,
    /// Column read when decoding. Rewritten by header resolution.
    pub column_index: usize,
    pub use_custom_setter: bool,
    /// Built-in coercion kind, `None` when the record decodes the field itself.
    pub kind: Option<FieldKind>,
}

impl FieldBinding {
    pub fn from_tag(field_name: impl Into<String>, tag: FieldTag, kind: Option<FieldKind>) -> Self {
        let (header_name, column_index) = match tag.addressing {
            Addressing::Header(label) => (Some(label), 0),
            Addressing::Index(position) => (None, position),
        };

        Self {
            field_name: field_name.into(),
            header_name,
            column_index,
            use_custom_setter: tag.use_custom_setter,
            kind,
        }
    }

    pub fn is_header_addressed(&self) -> bool {
        self.header_name.is_some()
    }
}

/// Field name to binding, in field declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BindingTable {
    bindings: IndexMap<String, FieldBinding>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, binding: FieldBinding) {
        self.bindings.insert(binding.field_name.clone(), binding);
    }

    pub fn get(&self, field_name: &str) -> Option<&FieldBinding> {
        self.bindings.get(field_name)
    }

    pub fn get_mut(&mut self, field_name: &str) -> Option<&mut FieldBinding> {
        self.bindings.get_mut(field_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldBinding> {
        self.bindings.values()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// True when any binding needs a header row to find its column.
    pub fn needs_header(&self) -> bool {
        self.iter().any(FieldBinding::is_header_addressed)
    }
}
