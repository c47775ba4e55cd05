//! Type coercion from raw cell text into typed field storage.
//!
//! The kind of every bound field is resolved once, when bindings are
//! extracted, so decoding a row only dispatches on [`FieldKind`].

use std::any::Any;
use std::fmt;

use num_complex::{Complex32, Complex64};
use serde::{Deserialize, Serialize};

use crate::error::ValueError;

macro_rules! field_kinds {
    ($($kind:ident => $ty:ty),* $(,)?) => {
        /// Field types the built-in coercion can populate.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum FieldKind {
            $($kind,)*
        }

        impl FieldKind {
            /// Classify a field by its concrete type, `None` if unsupported.
            pub fn of(value: &dyn Any) -> Option<FieldKind> {
                $(
                    if value.is::<$ty>() {
                        return Some(FieldKind::$kind);
                    }
                )*
                None
            }

            /// Rust type name stored by this kind.
            pub fn type_name(self) -> &'static str {
                match self {
                    $(FieldKind::$kind => stringify!($ty),)*
                }
            }
        }

        /// Format a field's current value with the inverse of [`assign`].
        ///
        /// Returns `None` when the value is not of `kind`.
        pub fn render(kind: FieldKind, value: &dyn Any) -> Option<String> {
            match kind {
                $(FieldKind::$kind => value.downcast_ref::<$ty>().map(|v| v.to_string()),)*
            }
        }
    };
}

field_kinds! {
    String => String,
    Bool => bool,
    I8 => i8,
    I16 => i16,
    I32 => i32,
    I64 => i64,
    I128 => i128,
    Isize => isize,
    U8 => u8,
    U16 => u16,
    U32 => u32,
    U64 => u64,
    U128 => u128,
    Usize => usize,
    F32 => f32,
    F64 => f64,
    Complex32 => Complex32,
    Complex64 => Complex64,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Parse a boolean literal.
///
/// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` and their false
/// counterparts `0`, `f`, `F`, `FALSE`, `false`, `False`.
pub fn parse_bool(raw: &str) -> Result<bool, ValueError> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ValueError::InvalidBool),
    }
}

/// Parse an `a+bi` complex literal, optionally wrapped in parentheses.
fn parse_complex<T>(raw: &str) -> Result<T, ValueError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    let inner = raw
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(raw);
    inner
        .parse::<T>()
        .map_err(|e| ValueError::Complex(e.to_string()))
}

fn store<T: 'static>(slot: &mut dyn Any, value: T) -> Result<(), ValueError> {
    let target = slot
        .downcast_mut::<T>()
        .ok_or(ValueError::TypeMismatch(std::any::type_name::<T>()))?;
    *target = value;
    Ok(())
}

/// Parse `raw` as `kind` and store it in `slot`.
///
/// Strings are stored verbatim. Integers are parsed directly at the field's
/// width, so values outside its range fail rather than wrap. Nothing is
/// written when parsing fails.
pub fn assign(kind: FieldKind, slot: &mut dyn Any, raw: &str) -> Result<(), ValueError> {
    match kind {
        FieldKind::String => store(slot, raw.to_string()),
        FieldKind::Bool => store(slot, parse_bool(raw)?),
        FieldKind::I8 => store(slot, raw.parse::<i8>()?),
        FieldKind::I16 => store(slot, raw.parse::<i16>()?),
        FieldKind::I32 => store(slot, raw.parse::<i32>()?),
        FieldKind::I64 => store(slot, raw.parse::<i64>()?),
        FieldKind::I128 => store(slot, raw.parse::<i128>()?),
        FieldKind::Isize => store(slot, raw.parse::<isize>()?),
        FieldKind::U8 => store(slot, raw.parse::<u8>()?),
        FieldKind::U16 => store(slot, raw.parse::<u16>()?),
        FieldKind::U32 => store(slot, raw.parse::<u32>()?),
        FieldKind::U64 => store(slot, raw.parse::<u64>()?),
        FieldKind::U128 => store(slot, raw.parse::<u128>()?),
        FieldKind::Usize => store(slot, raw.parse::<usize>()?),
        FieldKind::F32 => store(slot, raw.parse::<f32>()?),
        FieldKind::F64 => store(slot, raw.parse::<f64>()?),
        FieldKind::Complex32 => store(slot, parse_complex::<Complex32>(raw)?),
        FieldKind::Complex64 => store(slot, parse_complex::<Complex64>(raw)?),
    }
}
