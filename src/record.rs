//! Record metadata: the per-field declarations a reader binds columns to.
//!
//! A record type describes its fields through [`Record`], usually generated by
//! [`csv_record!`](crate::csv_record). Values are reached through `dyn Any`
//! accessors so the coercion engine can store typed values without the type
//! knowing anything about CSV.

use std::any::Any;
use std::borrow::Cow;

/// Declaration of a single field on a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    /// Field identifier, used as the binding key.
    pub name: Cow<'static, str>,
    /// Raw tag text. `None` or empty means the field is not bound.
    pub tag: Option<Cow<'static, str>>,
    /// Whether the field is visible outside its defining module.
    pub exported: bool,
}

impl FieldDecl {
    pub const fn new(name: &'static str, tag: Option<&'static str>, exported: bool) -> Self {
        let tag = match tag {
            Some(tag) => Some(Cow::Borrowed(tag)),
            None => None,
        };
        Self {
            name: Cow::Borrowed(name),
            tag,
            exported,
        }
    }

    /// Build a declaration from owned strings, for records declared at runtime.
    pub fn owned(name: impl Into<String>, tag: Option<String>, exported: bool) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            tag: tag.map(Cow::Owned),
            exported,
        }
    }

    /// The tag text, treating an empty tag the same as a missing one.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref().filter(|tag| !tag.is_empty())
    }
}

/// Optional capability letting a record decode cells itself.
///
/// Fields tagged with `useCustomSetter` are handed to [`set_field`](Self::set_field)
/// instead of the built-in coercion. Implementing this also allows fields of
/// types the built-in coercion does not support.
///
/// # Example
///
/// ```ignore
/// impl CustomSetter for Person {
///     fn set_field(&mut self, field: &str, value: &str) -> Result<(), String> {
///         match field {
///             "name" => {
///                 self.name = value.trim().to_uppercase();
///                 Ok(())
///             }
///             other => Err(format!("unexpected field {}", other)),
///         }
///     }
/// }
/// ```
pub trait CustomSetter {
    /// Set `field` from the raw cell `value`, or describe why it cannot be set.
    fn set_field(&mut self, field: &str, value: &str) -> Result<(), String>;
}

/// A record type that rows can be decoded into.
pub trait Record: 'static {
    /// Field declarations in declaration order.
    fn fields(&self) -> &[FieldDecl];

    /// Read access to a field's storage.
    fn field(&self, name: &str) -> Option<&dyn Any>;

    /// Write access to a field's storage.
    fn field_mut(&mut self, name: &str) -> Option<&mut dyn Any>;

    /// The record's custom decoding capability, if it has one.
    fn custom_setter(&mut self) -> Option<&mut dyn CustomSetter> {
        None
    }
}
