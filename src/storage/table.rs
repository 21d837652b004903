use crate::core::{Column, DaoError, DataType, Result, Row, Schema, Value};
use crate::model::{EntityMetadata, Model};

/// Resolved equality filter: column index and the value it must equal.
pub type Filter = (usize, Value);

#[derive(Debug, Clone)]
pub struct TableSchema {
    name: String,
    schema: Schema,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            schema: Schema::new(columns),
        }
    }

    /// One column per model field; key fields become NOT NULL primary-key columns.
    pub fn from_metadata(meta: &EntityMetadata) -> Self {
        let columns = meta
            .fields()
            .iter()
            .map(|field| {
                let column = Column::new(field.name, field.kind);
                if field.primary_key {
                    column.primary_key()
                } else {
                    column
                }
            })
            .collect();
        Self::new(meta.table(), columns)
    }

    pub fn for_model<M: Model>() -> Self {
        Self::from_metadata(&EntityMetadata::of::<M>())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.schema
            .find_column_index(column)
            .ok_or_else(|| DaoError::ColumnNotFound(column.to_string(), self.name.clone()))
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    schema: TableSchema,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(schema: TableSchema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    #[cfg(test)]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[cfg(test)]
    pub fn insert(&mut self, row: Row) -> Result<()> {
        self.insert_all(vec![row]).map(|_| ())
    }

    /// Appends `rows` in order. All-or-nothing: a row that fails validation or collides with an
    /// existing or earlier new key leaves the table untouched.
    pub fn insert_all(&mut self, rows: Vec<Row>) -> Result<u64> {
        let mut staged = Vec::with_capacity(rows.len());
        for row in rows {
            let row = self.normalize_row(row)?;
            self.check_uniqueness(&self.rows, &row, None)?;
            self.check_uniqueness(&staged, &row, None)?;
            staged.push(row);
        }

        let inserted = staged.len() as u64;
        self.rows.extend(staged);
        Ok(inserted)
    }

    /// Applies `assignments` to every row matching `filters`. All-or-nothing: if any
    /// rewritten row is invalid the table is left untouched.
    pub fn update(&mut self, assignments: &[(usize, Value)], filters: &[Filter]) -> Result<u64> {
        let mut staged = self.rows.clone();
        let mut affected = 0;

        for idx in 0..staged.len() {
            if !Self::matches(&staged[idx], filters) {
                continue;
            }
            let mut new_row = staged[idx].clone();
            for (col_idx, value) in assignments {
                new_row[*col_idx] = value.clone();
            }
            let new_row = self.normalize_row(new_row)?;
            self.check_uniqueness(&staged, &new_row, Some(idx))?;
            staged[idx] = new_row;
            affected += 1;
        }

        self.rows = staged;
        Ok(affected)
    }

    pub fn delete(&mut self, filters: &[Filter]) -> u64 {
        let before = self.rows.len();
        self.rows.retain(|row| !Self::matches(row, filters));
        (before - self.rows.len()) as u64
    }

    pub fn scan(&self, filters: &[Filter]) -> Vec<Row> {
        self.rows
            .iter()
            .filter(|row| Self::matches(row, filters))
            .cloned()
            .collect()
    }

    /// NULL never compares equal, as in SQL.
    fn matches(row: &Row, filters: &[Filter]) -> bool {
        filters
            .iter()
            .all(|(idx, value)| !value.is_null() && &row[*idx] == value)
    }

    /// Validates a full row against the schema, widening integers stored in FLOAT columns.
    fn normalize_row(&self, mut row: Row) -> Result<Row> {
        let columns = self.schema.schema().columns();
        if row.len() != columns.len() {
            return Err(DaoError::ExecutionError(format!(
                "Expected {} columns, got {}",
                columns.len(),
                row.len()
            )));
        }
        for (column, value) in columns.iter().zip(row.iter_mut()) {
            column.validate(value)?;
            if column.data_type == DataType::Float
                && let Value::Integer(i) = *value
            {
                *value = Value::Float(i as f64);
            }
        }
        Ok(row)
    }

    /// The primary key is the tuple of all key columns.
    fn check_uniqueness(&self, rows: &[Row], row: &Row, ignore: Option<usize>) -> Result<()> {
        let key_indices = self.schema.schema().primary_key_indices();
        if key_indices.is_empty() {
            return Ok(());
        }

        for (idx, existing) in rows.iter().enumerate() {
            if Some(idx) == ignore {
                continue;
            }
            if key_indices.iter().all(|k| existing[*k] == row[*k]) {
                let key: Vec<String> = key_indices
                    .iter()
                    .map(|k| {
                        format!(
                            "{}={}",
                            self.schema.schema().columns()[*k].name,
                            row[*k]
                        )
                    })
                    .collect();
                return Err(DaoError::ConstraintViolation(format!(
                    "Duplicate primary key ({}) in table '{}'",
                    key.join(", "),
                    self.schema.name()
                )));
            }
        }
        Ok(())
    }
}
