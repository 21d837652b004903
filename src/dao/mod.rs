//! Generic data access over any [`Model`].
//!
//! Every operation resolves metadata, builds its SQL, prepares a scoped statement, binds in
//! placeholder order and executes it: one round trip, no caching. Row-count operations fold
//! execution failures into [`DmlOutcome::Failed`] (numeric sentinel `-1`); configuration and input
//! errors always come back as `Err`, whoever raised them. Query operations propagate every error.

use crate::connection::{ScopedStatement, Session};
use crate::core::{DaoError, ErrorClass, Result, Value};
use crate::model::{EntityMetadata, Model};
use crate::result::QueryResult;
use crate::statement::{self, Statement, StatementKind};
use tracing::{error, info};

/// Result of a row-count operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DmlOutcome {
    Applied(u64),
    Failed(DaoError),
}

impl DmlOutcome {
    /// Affected rows, or `-1` when execution failed.
    pub fn row_count(&self) -> i64 {
        match self {
            Self::Applied(count) => i64::try_from(*count).unwrap_or(i64::MAX),
            Self::Failed(_) => -1,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn error(&self) -> Option<&DaoError> {
        match self {
            Self::Applied(_) => None,
            Self::Failed(err) => Some(err),
        }
    }

    pub fn into_result(self) -> Result<u64> {
        match self {
            Self::Applied(count) => Ok(count),
            Self::Failed(err) => Err(err),
        }
    }
}

pub struct GenericDao<'a, S: Session + ?Sized> {
    session: &'a S,
}

impl<'a, S: Session + ?Sized> GenericDao<'a, S> {
    pub fn new(session: &'a S) -> Self {
        Self { session }
    }

    pub fn insert<M: Model>(&self, instance: &M) -> Result<DmlOutcome> {
        self.modify(StatementKind::Insert, instance)
    }

    /// Rewrites every column of the row identified by the instance's key fields.
    pub fn update<M: Model>(&self, instance: &M) -> Result<DmlOutcome> {
        self.modify(StatementKind::Update, instance)
    }

    /// Only the key fields of `instance` need to be set.
    pub fn delete<M: Model>(&self, instance: &M) -> Result<DmlOutcome> {
        self.modify(StatementKind::Delete, instance)
    }

    pub fn delete_all<M: Model>(&self) -> Result<DmlOutcome> {
        let meta = EntityMetadata::of::<M>();
        let stmt = statement::build_delete_all(meta.table());
        self.execute_dml(&stmt, meta.table(), &[])
    }

    /// Rows whose key columns equal the instance's key fields.
    pub fn select_by_key<M: Model>(&self, instance: &M) -> Result<QueryResult> {
        let meta = EntityMetadata::of::<M>();
        let stmt = statement::build_select_by_key(&meta)?;
        let params = statement::bind_order(StatementKind::SelectByKey, &meta, &instance.values())?;
        self.execute_query(&stmt, &params)
    }

    pub fn select_all<M: Model>(&self) -> Result<QueryResult> {
        let meta = EntityMetadata::of::<M>();
        let stmt = statement::build_select_all(meta.table());
        self.execute_query(&stmt, &[])
    }

    fn modify<M: Model>(&self, kind: StatementKind, instance: &M) -> Result<DmlOutcome> {
        let meta = EntityMetadata::of::<M>();
        let stmt = statement::build(kind, &meta)?;
        let params = statement::bind_order(kind, &meta, &instance.values())?;
        self.execute_dml(&stmt, meta.table(), &params)
    }

    /// Only execution-class failures become [`DmlOutcome::Failed`]; any other error is returned.
    fn execute_dml(&self, stmt: &Statement, table: &str, params: &[Value]) -> Result<DmlOutcome> {
        info!("Generated {} statement: {}", stmt.kind(), stmt.sql());

        let result = ScopedStatement::prepare(self.session, stmt.sql()).and_then(|mut scoped| {
            scoped.bind_all(params)?;
            scoped.execute_update()
        });

        match result {
            Ok(count) => {
                info!("{} {}: {} row(s) affected.", stmt.kind(), table, count);
                Ok(DmlOutcome::Applied(count))
            }
            Err(err) => {
                error!(sql = stmt.sql(), error = %err, "{} {} failed", stmt.kind(), table);
                match err.class() {
                    ErrorClass::Execution => Ok(DmlOutcome::Failed(err)),
                    ErrorClass::Configuration | ErrorClass::Input => Err(err),
                }
            }
        }
    }

    fn execute_query(&self, stmt: &Statement, params: &[Value]) -> Result<QueryResult> {
        info!("Generated {} statement: {}", stmt.kind(), stmt.sql());

        let mut scoped = ScopedStatement::prepare(self.session, stmt.sql())?;
        scoped.bind_all(params)?;
        let result = scoped.execute_query().inspect_err(|err| {
            error!(sql = stmt.sql(), error = %err, "query failed");
        })?;

        info!("{}: {} row(s) returned.", stmt.kind(), result.row_count());
        Ok(result)
    }
}
