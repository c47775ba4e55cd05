//! Resolves header-addressed bindings against an observed header row.

use tracing::debug;

use super::BindingTable;
use crate::error::{CsvError, Result};

/// Point every header-addressed binding at the column carrying its label.
///
/// Labels match exactly and the leftmost match wins. Index-addressed
/// bindings are left alone. Positions are only written back once every
/// label has been found, so a failure leaves `table` unchanged.
///
/// # Errors
///
/// Returns [`CsvError::FieldNotFound`] for the first binding whose label is
/// missing from `header`.
pub fn resolve_columns<'a, H>(table: &mut BindingTable, header: H) -> Result<()>
where
    H: IntoIterator<Item = &'a str>,
{
    let labels: Vec<&str> = header.into_iter().collect();
    let mut resolved = Vec::new();

    for binding in table.iter() {
        let Some(label) = binding.header_name.as_deref() else {
            continue;
        };

        let position = labels
            .iter()
            .position(|candidate| *candidate == label)
            .ok_or_else(|| CsvError::FieldNotFound {
                field: binding.field_name.clone(),
                header: label.to_string(),
            })?;

        resolved.push((binding.field_name.clone(), position));
    }

    for (field_name, position) in resolved {
        if let Some(binding) = table.get_mut(&field_name) {
            binding.column_index = position;
        }
    }

    debug!("Resolved header with {} columns", labels.len());

    Ok(())
}
