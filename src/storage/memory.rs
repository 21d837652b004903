use super::{Table, TableSchema};
use crate::core::{DaoError, Result};
use std::collections::HashMap;

/// Named tables held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    tables: HashMap<String, Table>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_table(&mut self, schema: TableSchema) -> Result<()> {
        let name = schema.name().to_string();

        if self.tables.contains_key(&name) {
            return Err(DaoError::TableExists(name));
        }

        self.tables.insert(name, Table::new(schema));
        Ok(())
    }

    pub fn get_table(&self, name: &str) -> Result<&Table> {
        self.tables
            .get(name)
            .ok_or_else(|| DaoError::TableNotFound(name.to_string()))
    }

    pub fn get_table_mut(&mut self, name: &str) -> Result<&mut Table> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| DaoError::TableNotFound(name.to_string()))
    }

    /// Table names, sorted.
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.keys().cloned().collect();
        names.sort();
        names
    }
}
