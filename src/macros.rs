//! # csv_record!
//!
//! Declares a struct and implements [`Record`](crate::Record) for it.
//!
//! Each field may carry a tag after `=>`. Untagged fields are left alone by
//! readers. A field's visibility is recorded, so tagging a private field is
//! reported as an unexported field when bindings are extracted.
//!
//! Writing `struct Name: CustomSetter` opts the type into the custom
//! decoding capability; the `CustomSetter` impl itself is written by hand.
//!
//! ```ignore
//! use csvtag::{csv_record, CustomSetter};
//!
//! csv_record! {
//!     #[derive(Debug, Default)]
//!     pub struct Reading: CustomSetter {
//!         pub sensor: String => "header:sensor",
//!         pub value: f64 => "index:2",
//!         pub unit: String => "header:unit;useCustomSetter",
//!         pub seen: u64,
//!     }
//! }
//!
//! impl CustomSetter for Reading {
//!     fn set_field(&mut self, field: &str, value: &str) -> Result<(), String> {
//!         match field {
//!             "unit" => {
//!                 self.unit = value.to_lowercase();
//!                 Ok(())
//!             }
//!             other => Err(format!("no custom decoding for {}", other)),
//!         }
//!     }
//! }
//! ```

/// Declares a struct whose fields can be bound to CSV columns.
#[macro_export]
macro_rules! csv_record {
    (@tag) => {
        ::core::option::Option::None
    };
    (@tag $tag:literal) => {
        ::core::option::Option::Some($tag)
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident $(: $capability:ident)? {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty $(=> $tag:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $name {
            const CSV_FIELDS: &'static [$crate::FieldDecl] = &[
                $(
                    $crate::FieldDecl::new(
                        stringify!($field),
                        $crate::csv_record!(@tag $($tag)?),
                        !stringify!($field_vis).is_empty(),
                    ),
                )*
            ];
        }

        impl $crate::Record for $name {
            fn fields(&self) -> &[$crate::FieldDecl] {
                Self::CSV_FIELDS
            }

            fn field(&self, name: &str) -> ::core::option::Option<&dyn ::core::any::Any> {
                $(
                    if name == stringify!($field) {
                        return ::core::option::Option::Some(&self.$field as &dyn ::core::any::Any);
                    }
                )*
                ::core::option::Option::None
            }

            fn field_mut(&mut self, name: &str) -> ::core::option::Option<&mut dyn ::core::any::Any> {
                $(
                    if name == stringify!($field) {
                        return ::core::option::Option::Some(&mut self.$field as &mut dyn ::core::any::Any);
                    }
                )*
                ::core::option::Option::None
            }

            $(
                fn custom_setter(&mut self) -> ::core::option::Option<&mut dyn $crate::$capability> {
                    ::core::option::Option::Some(self)
                }
            )?
        }
    };
}
