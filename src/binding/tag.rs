//! Field tag grammar.
//!
//! A tag is a `;`-separated list of clauses, each either `key` or
//! `key:value`:
//!
//! ```text
//! header:First Name
//! index:3;useCustomSetter
//! ```
//!
//! Exactly one of `header` or `index` addresses the column. Unknown keys are
//! ignored so newer tags still parse.

use crate::error::TagError;

pub const ATTR_DELIMITER: char = ';';
pub const VALUE_DELIMITER: char = ':';

pub const HEADER_ATTR: &str = "header";
pub const INDEX_ATTR: &str = "index";
pub const USE_CUSTOM_SETTER_ATTR: &str = "useCustomSetter";

/// How a field finds its column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Addressing {
    /// Match this label against the header row.
    Header(String),
    /// Fixed zero-based column position.
    Index(usize),
}

/// Attributes parsed from a single field tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTag {
    pub addressing: Addressing,
    pub use_custom_setter: bool,
}

impl FieldTag {
    /// Parse a tag string.
    ///
    /// # Errors
    ///
    /// * [`TagError::InvalidIndex`] if `index` is not a non-negative integer
    /// * [`TagError::MalformedTag`] if neither or both of `header` and `index` appear
    pub fn parse(tag: &str) -> Result<Self, TagError> {
        let mut header = None;
        let mut index = None;
        let mut use_custom_setter = false;

        for clause in tag.split(ATTR_DELIMITER) {
            let (key, value) = clause.split_once(VALUE_DELIMITER).unwrap_or((clause, ""));

            match key {
                HEADER_ATTR => header = Some(value.to_string()),
                INDEX_ATTR => index = Some(parse_index(value)?),
                USE_CUSTOM_SETTER_ATTR => use_custom_setter = true,
                _ => {}
            }
        }

        let addressing = match (header, index) {
            (Some(label), None) => Addressing::Header(label),
            (None, Some(position)) => Addressing::Index(position),
            _ => return Err(TagError::MalformedTag),
        };

        Ok(Self {
            addressing,
            use_custom_setter,
        })
    }
}

fn parse_index(value: &str) -> Result<usize, TagError> {
    let invalid = || TagError::InvalidIndex(value.to_string());
    let position = value.parse::<i64>().map_err(|_| invalid())?;
    usize::try_from(position).map_err(|_| invalid())
}
