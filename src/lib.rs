//! # csvtag: Tag-Driven CSV Record Binding
//!
//! csvtag decodes rows of delimited text into statically declared record
//! types. Each field declares where its column comes from with a short tag,
//! and the reader converts the raw cell into the field's type.
//!
//! ## Features
//!
//! - **Header or index addressing**: `header:Name` matches a header label,
//!   `index:3` reads a fixed column
//! - **Primitive coercion**: strings, booleans, integers and floats of every
//!   width, and complex numbers
//! - **Custom decoding**: `useCustomSetter` hands a cell to the record's own
//!   [`CustomSetter`] for anything beyond literal parsing
//! - **Validated up front**: malformed tags, unsupported field types and
//!   missing capabilities are reported before any data row is decoded
//!
//! ## Tag syntax
//!
//! ```text
//! attr[:value](;attr[:value])*      attr ∈ { header, index, useCustomSetter }
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use csvtag::{csv_record, ReaderOptions, RecordReader};
//!
//! csv_record! {
//!     #[derive(Debug, Default)]
//!     pub struct Order {
//!         pub id: u64 => "header:order_id",
//!         pub total: f64 => "header:total",
//!         pub note: String,
//!     }
//! }
//!
//! let data = "total,order_id\n9.50,1001\n";
//! let mut reader = RecordReader::from_reader(data.as_bytes(), &ReaderOptions::default())?;
//! let mut order = Order::default();
//!
//! reader.parse_header(&mut order)?;
//! while reader.read_record(&mut order)? {
//!     println!("{} -> {}", order.id, order.total);
//! }
//! ```

#[macro_use]
mod macros;

// Core modules
pub mod binding;
pub mod coerce;
pub mod error;
pub mod record;

// Reading
pub mod options;
pub mod reader;
pub mod source;

// Runtime-declared records and JSON output
pub mod dynamic;
pub mod serialization;

// Re-export key types
pub use binding::{BindingTable, FieldBinding, FieldTag};
pub use coerce::FieldKind;
pub use error::{CsvError, Result, TagError, ValueError};
pub use record::{CustomSetter, FieldDecl, Record};

pub use options::ReaderOptions;
pub use reader::{ReaderState, RecordReader, Records};
pub use source::{CsvRowSource, IterRowSource, RowSource};

pub use dynamic::DynamicRecord;
pub use serialization::{OutputFormat, RecordWriter};

pub use num_complex::{Complex32, Complex64};
