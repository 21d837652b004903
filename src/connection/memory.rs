use super::config::SessionConfig;
use super::{PreparedStatement, Session};
use crate::core::{DaoError, Result, Value};
use crate::executor;
use crate::model::Model;
use crate::parser::{SqlParserAdapter, Statement};
use crate::result::QueryResult;
use crate::storage::{InMemoryStorage, TableSchema};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

/// Self-contained session over in-process tables.
///
/// Tables must be registered before use, either from model metadata with
/// [`MemorySession::create_table_for`] or from an explicit [`TableSchema`].
pub struct MemorySession {
    config: SessionConfig,
    storage: Arc<RwLock<InMemoryStorage>>,
    parser: SqlParserAdapter,
    open_statements: AtomicUsize,
    closed: AtomicBool,
}

impl MemorySession {
    pub fn open(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        info!(url = %config.to_url(), "session opened");
        Ok(Self {
            config,
            storage: Arc::new(RwLock::new(InMemoryStorage::new())),
            parser: SqlParserAdapter::new(),
            open_statements: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
        })
    }

    /// Session with the default configuration.
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            storage: Arc::new(RwLock::new(InMemoryStorage::new())),
            parser: SqlParserAdapter::new(),
            open_statements: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn create_table(&self, schema: TableSchema) -> Result<()> {
        let name = schema.name().to_string();
        self.storage.write()?.create_table(schema)?;
        debug!(table = %name, "table registered");
        Ok(())
    }

    pub fn create_table_for<M: Model>(&self) -> Result<()> {
        self.create_table(TableSchema::for_model::<M>())
    }

    pub fn table_names(&self) -> Result<Vec<String>> {
        Ok(self.storage.read()?.table_names())
    }

    /// Statements prepared and not yet released.
    pub fn open_statements(&self) -> usize {
        self.open_statements.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(DaoError::ExecutionError("Session is closed".into()));
        }
        Ok(())
    }
}

impl Default for MemorySession {
    fn default() -> Self {
        Self::new()
    }
}

impl Session for MemorySession {
    fn prepare(&self, sql: &str) -> Result<Box<dyn PreparedStatement + '_>> {
        self.ensure_open()?;

        let statement = self.parser.parse(sql)?;
        let params = vec![None; statement.param_count()];
        self.open_statements.fetch_add(1, Ordering::SeqCst);
        debug!(table = statement.table_name(), params = params.len(), "statement prepared");

        Ok(Box::new(MemoryStatement {
            session: self,
            sql: sql.to_string(),
            statement,
            params,
            released: false,
        }))
    }

    fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let open = self.open_statements();
        if open > 0 {
            warn!(open, "session closed with unreleased statements");
        }
        info!(database = %self.config.database, "session closed");
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

struct MemoryStatement<'s> {
    session: &'s MemorySession,
    sql: String,
    statement: Statement,
    params: Vec<Option<Value>>,
    released: bool,
}

impl MemoryStatement<'_> {
    fn ensure_usable(&self) -> Result<()> {
        if self.released {
            return Err(DaoError::ExecutionError(
                "Statement has been released".into(),
            ));
        }
        self.session.ensure_open()
    }
}

impl PreparedStatement for MemoryStatement<'_> {
    fn sql(&self) -> &str {
        &self.sql
    }

    fn bind(&mut self, index: usize, value: &Value) -> Result<()> {
        self.ensure_usable()?;
        let count = self.params.len();
        let Some(slot) = index.checked_sub(1).and_then(|idx| self.params.get_mut(idx)) else {
            return Err(DaoError::ExecutionError(format!(
                "Parameter index {} out of range (1..={})",
                index, count
            )));
        };
        *slot = Some(value.clone());
        Ok(())
    }

    fn execute_update(&mut self) -> Result<u64> {
        self.ensure_usable()?;
        let mut storage = self.session.storage.write()?;
        executor::execute_update(&mut storage, &self.statement, &self.params)
    }

    fn execute_query(&mut self) -> Result<QueryResult> {
        self.ensure_usable()?;
        let storage = self.session.storage.read()?;
        executor::execute_query(&storage, &self.statement, &self.params)
    }

    fn release(&mut self) -> Result<()> {
        if !self.released {
            self.released = true;
            self.session.open_statements.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
