//! SQL synthesis and parameter binding derived from entity metadata.
//!
//! The builder and the binder are independent, pure functions of the same metadata; both follow
//! one placeholder order per [`StatementKind`]:
//!
//! | kind | placeholders |
//! |---|---|
//! | `Insert` | every field, declared order |
//! | `Update` | every field (SET), then every key field (WHERE) |
//! | `Delete`, `SelectByKey` | every key field (WHERE) |
//! | `DeleteAll`, `SelectAll` | none |

pub mod binder;
pub mod builder;

pub use binder::{bind_model, bind_order};
pub use builder::{
    build, build_delete, build_delete_all, build_insert, build_select_all, build_select_by_key,
    build_update,
};

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Insert,
    Update,
    Delete,
    DeleteAll,
    SelectByKey,
    SelectAll,
}

impl StatementKind {
    /// Whether the statement filters rows by primary key.
    pub fn needs_primary_key(&self) -> bool {
        matches!(self, Self::Update | Self::Delete | Self::SelectByKey)
    }

    pub fn returns_rows(&self) -> bool {
        matches!(self, Self::SelectByKey | Self::SelectAll)
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Insert => "Insert",
            Self::Update => "Update",
            Self::Delete => "Delete",
            Self::DeleteAll => "Delete All",
            Self::SelectByKey => "Select By Key",
            Self::SelectAll => "Select All",
        };
        write!(f, "{}", label)
    }
}

/// What a placeholder stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderRole {
    /// A column value (INSERT values, UPDATE SET list).
    Assign,
    /// A primary-key filter in the WHERE clause.
    Filter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    pub field: &'static str,
    /// Position of the field in the model's declared field list.
    pub field_index: usize,
    pub role: PlaceholderRole,
}

/// Generated SQL text plus the role of each `?`, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    kind: StatementKind,
    sql: String,
    placeholders: Vec<Placeholder>,
}

impl Statement {
    pub(crate) fn new(kind: StatementKind, sql: String, placeholders: Vec<Placeholder>) -> Self {
        Self {
            kind,
            sql,
            placeholders,
        }
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    pub fn placeholder_count(&self) -> usize {
        self.placeholders.len()
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql)
    }
}
