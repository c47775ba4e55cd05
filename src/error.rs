//! Error types for tag definitions, header resolution and row decoding.

use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

/// Result type alias using CsvError.
pub type Result<T> = std::result::Result<T, CsvError>;

/// Top-level error returned by [`RecordReader`](crate::RecordReader) operations.
///
/// End-of-input is not an error; it is reported as `Ok(false)`.
#[derive(Error, Debug)]
pub enum CsvError {
    /// A field's tag could not be turned into a binding.
    #[error("problem with csv tag definition '{tag}' on field {field}: {cause}")]
    TagDefinition {
        tag: String,
        field: String,
        #[source]
        cause: TagError,
    },

    /// A header-addressed field's label is absent from the header row.
    #[error("field {field} not found in header with label '{header}'")]
    FieldNotFound { field: String, header: String },

    /// A cell could not be stored on its field.
    #[error("record {row}: problem setting value '{value}' on field {field}: {cause}")]
    SetValue {
        row: u64,
        value: String,
        field: String,
        #[source]
        cause: ValueError,
    },

    /// The underlying row source failed.
    #[error("row source error: {0}")]
    Source(#[from] csv::Error),

    /// Failed to read a configuration or input file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unusable reader options or an unparsable configuration file.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl CsvError {
    /// Create a TagDefinition error.
    pub fn tag_definition(tag: impl Into<String>, field: impl Into<String>, cause: TagError) -> Self {
        Self::TagDefinition {
            tag: tag.into(),
            field: field.into(),
            cause,
        }
    }

    /// The definition-time cause, if this is a TagDefinition error.
    pub fn tag_error(&self) -> Option<&TagError> {
        match self {
            CsvError::TagDefinition { cause, .. } => Some(cause),
            _ => None,
        }
    }

    /// The per-cell cause, if this is a SetValue error.
    pub fn value_error(&self) -> Option<&ValueError> {
        match self {
            CsvError::SetValue { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

/// Reasons a field's tag or declaration is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    #[error("you need to specify either the header or index")]
    MalformedTag,

    #[error("index must be a non negative integer, got '{0}'")]
    InvalidIndex(String),

    #[error("csv tags may not be set on unexported fields")]
    UnexportedField,

    #[error("cannot use custom data type without implementing CustomSetter")]
    MissingCustomSetter,

    #[error("must implement CustomSetter when using unsupported data types")]
    UnsupportedDataType,
}

/// Reasons a single cell fails to decode.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValueError {
    #[error("column {index} is out of range for a row of {len} cells")]
    MissingColumn { index: usize, len: usize },

    #[error("invalid boolean literal")]
    InvalidBool,

    #[error(transparent)]
    Int(#[from] ParseIntError),

    #[error(transparent)]
    Float(#[from] ParseFloatError),

    #[error("invalid complex number: {0}")]
    Complex(String),

    /// Error text reported by a record's CustomSetter.
    #[error("{0}")]
    Custom(String),

    #[error("must implement CustomSetter when using unsupported data types")]
    UnsupportedDataType,

    /// The record's accessor disagreed with the kind resolved at extraction.
    #[error("field is not settable as {0}")]
    TypeMismatch(&'static str),
}
