//! The Model capability: per-type, compile-time field metadata plus indexed field access.
//!
//! Entity types normally get their implementation from `#[derive(Model)]`:
//!
//! ```
//! use modeldao::Model;
//!
//! #[derive(Debug, Default, Model)]
//! struct Bus {
//!     #[primary_key]
//!     register: String,
//!     licence: String,
//!     r#type: String,
//! }
//!
//! assert_eq!(Bus::table_name(), "bus");
//! assert_eq!(Bus::fields().len(), 3);
//! assert!(Bus::fields()[0].primary_key);
//! ```

pub mod field;
pub mod metadata;
pub mod primary_key;

pub use field::FieldType;
pub use metadata::{EntityMetadata, primary_key_set, resolve, same_row};
pub use primary_key::PrimaryKeySet;

use crate::core::{DataType, Result, Value};

/// Static description of one entity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Column name, used verbatim in generated SQL.
    pub name: &'static str,
    pub kind: DataType,
    pub primary_key: bool,
    /// Whether the field accepts NULL (`Option<T>` fields).
    pub nullable: bool,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, kind: DataType, primary_key: bool) -> Self {
        Self {
            name,
            kind,
            primary_key,
            nullable: false,
        }
    }

    pub const fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }
}

/// Contract every persisted entity type satisfies.
///
/// `fields()` must always return the same descriptors in the same order: that order fixes the
/// placeholder order of generated INSERT and UPDATE statements, and the indices accepted by
/// [`Model::get`] and [`Model::set`].
pub trait Model: Default {
    /// Bare type name, e.g. `"Bus"`.
    fn model_name() -> &'static str;

    fn table_name() -> String {
        default_table_name(Self::model_name())
    }

    fn fields() -> &'static [FieldDescriptor];

    /// Current value of the field at `index`, `None` when the index is out of range.
    fn get(&self, index: usize) -> Option<Value>;

    /// Assigns the field at `index`. Fails with `InputError` when the index is unknown or the
    /// value does not fit the field's type.
    fn set(&mut self, index: usize, value: Value) -> Result<()>;

    fn values(&self) -> Vec<Value> {
        (0..Self::fields().len())
            .map(|idx| self.get(idx).unwrap_or(Value::Null))
            .collect()
    }
}

/// Table name derived from a type name: the name lowercased.
pub fn default_table_name(model_name: &str) -> String {
    model_name.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_name_lowercases() {
        assert_eq!(default_table_name("Place"), "place");
        assert_eq!(default_table_name("Routes"), "routes");
        assert_eq!(default_table_name("BusDriver"), "busdriver");
    }
}
