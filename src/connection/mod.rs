pub mod config;
pub mod memory;

use crate::core::{Result, Value};
use crate::result::QueryResult;
use tracing::{debug, warn};

/// Database session
///
/// Opened once by process setup, shared by reference with every DAO and closed explicitly at
/// shutdown. Implementations own whatever synchronization they need.
pub trait Session {
    /// Prepares a parameterized statement (`?` placeholders).
    fn prepare(&self, sql: &str) -> Result<Box<dyn PreparedStatement + '_>>;

    /// Closes the session. Further `prepare` calls fail. Idempotent.
    fn close(&self) -> Result<()>;

    fn is_closed(&self) -> bool;
}

/// Prepared statement handle
pub trait PreparedStatement {
    fn sql(&self) -> &str;

    /// Binds `value` to the placeholder at 1-based `index`.
    fn bind(&mut self, index: usize, value: &Value) -> Result<()>;

    fn execute_update(&mut self) -> Result<u64>;

    fn execute_query(&mut self) -> Result<QueryResult>;

    /// Frees the handle. Calling it again is a no-op.
    fn release(&mut self) -> Result<()>;
}

/// Statement handle released when it goes out of scope, whatever the exit path.
pub struct ScopedStatement<'s> {
    inner: Box<dyn PreparedStatement + 's>,
}

impl<'s> ScopedStatement<'s> {
    pub fn prepare<S: Session + ?Sized>(session: &'s S, sql: &str) -> Result<Self> {
        let inner = session.prepare(sql)?;
        Ok(Self { inner })
    }

    pub fn sql(&self) -> &str {
        self.inner.sql()
    }

    /// Binds `params` to positions `1..=params.len()`.
    pub fn bind_all(&mut self, params: &[Value]) -> Result<()> {
        for (idx, value) in params.iter().enumerate() {
            debug!(position = idx + 1, value = %value, "bind");
            self.inner.bind(idx + 1, value)?;
        }
        Ok(())
    }

    pub fn execute_update(&mut self) -> Result<u64> {
        self.inner.execute_update()
    }

    pub fn execute_query(&mut self) -> Result<QueryResult> {
        self.inner.execute_query()
    }
}

impl Drop for ScopedStatement<'_> {
    fn drop(&mut self) {
        match self.inner.release() {
            Ok(()) => debug!(sql = self.inner.sql(), "statement released"),
            Err(e) => warn!(sql = self.inner.sql(), error = %e, "failed to release statement"),
        }
    }
}
