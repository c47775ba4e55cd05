//! Builds a [`BindingTable`] from a record's field declarations.

use tracing::debug;

use super::{BindingTable, FieldBinding, FieldTag};
use crate::coerce::FieldKind;
use crate::error::{CsvError, Result, TagError};
use crate::record::Record;

/// Extract bindings for every tagged field of `record`.
///
/// Fields are visited in declaration order and the first invalid field
/// stops extraction. Untagged fields are skipped. For each tagged field:
///
/// 1. it must be exported
/// 2. its tag must parse
/// 3. `useCustomSetter` requires the record to have a [`CustomSetter`](crate::CustomSetter)
/// 4. its type must be a supported [`FieldKind`], unless the record has a
///    `CustomSetter` at all
///
/// # Errors
///
/// Returns [`CsvError::TagDefinition`] naming the field and tag.
pub fn extract_bindings<R: Record>(record: &mut R) -> Result<BindingTable> {
    let supports_custom_setter = record.custom_setter().is_some();
    let mut table = BindingTable::new();

    for decl in record.fields() {
        let Some(tag) = decl.tag() else {
            continue;
        };
        let fail = |cause: TagError| CsvError::tag_definition(tag, &*decl.name, cause);

        if !decl.exported {
            return Err(fail(TagError::UnexportedField));
        }

        let field_tag = FieldTag::parse(tag).map_err(fail)?;

        if field_tag.use_custom_setter && !supports_custom_setter {
            return Err(fail(TagError::MissingCustomSetter));
        }

        let kind = record.field(&decl.name).and_then(FieldKind::of);
        if kind.is_none() && !supports_custom_setter {
            return Err(fail(TagError::UnsupportedDataType));
        }

        table.insert(FieldBinding::from_tag(&*decl.name, field_tag, kind));
    }

    debug!(
        "Extracted {} bindings for {}",
        table.len(),
        std::any::type_name::<R>()
    );

    Ok(table)
}
