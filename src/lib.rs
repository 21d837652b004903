// ============================================================================
// modeldao Library
// ============================================================================

//! Metadata-driven data access: derive [`Model`] on a plain struct and get INSERT, UPDATE,
//! DELETE and SELECT-by-key statements, their bind order, a generic DAO and an interactive
//! populator, with no per-entity SQL.
//!
//! ```
//! use modeldao::{GenericDao, MemorySession, Model, Session};
//!
//! #[derive(Debug, Default, Model)]
//! struct Driver {
//!     #[primary_key]
//!     #[model(column = "numDriver")]
//!     num_driver: i32,
//!     name: String,
//!     surname: String,
//! }
//!
//! # fn main() -> modeldao::Result<()> {
//! let session = MemorySession::new();
//! session.create_table_for::<Driver>()?;
//!
//! let dao = GenericDao::new(&session);
//! let ana = Driver { num_driver: 7, name: "Ana".into(), surname: "Lopez".into() };
//! assert_eq!(dao.insert(&ana)?.row_count(), 1);
//!
//! let found = dao.select_by_key(&Driver { num_driver: 7, ..Default::default() })?;
//! assert_eq!(found.to_lines(), vec!["7\tAna\tLopez"]);
//! session.close()?;
//! # Ok(())
//! # }
//! ```

extern crate self as modeldao;

pub mod connection;
pub mod core;
pub mod dao;
pub mod model;
pub mod populate;
pub mod result;
pub mod statement;
mod executor;
mod parser;
mod storage;

pub use connection::config::SessionConfig;
pub use connection::memory::MemorySession;
pub use connection::{PreparedStatement, ScopedStatement, Session};
pub use crate::core::{Column, DaoError, DataType, ErrorClass, Result, Row, Value};
pub use dao::{DmlOutcome, GenericDao};
pub use model::{EntityMetadata, FieldDescriptor, FieldType, Model, PrimaryKeySet, same_row};
pub use modeldao_derive::Model;
pub use populate::{ConsoleSource, LineSource, Populator, ScriptedSource};
pub use result::QueryResult;
pub use statement::{Statement, StatementKind};
pub use storage::TableSchema;
