//! Runs parsed statements against [`InMemoryStorage`].

use crate::core::{DaoError, Result, Value};
use crate::parser::ast::{
    Condition, DeleteStmt, InsertStmt, Projection, QueryStmt, Statement, UpdateStmt,
};
use crate::result::QueryResult;
use crate::storage::{Filter, InMemoryStorage, TableSchema};

/// Executes a data-modifying statement, returning the affected-row count.
pub fn execute_update(
    storage: &mut InMemoryStorage,
    stmt: &Statement,
    params: &[Option<Value>],
) -> Result<u64> {
    match stmt {
        Statement::Insert(insert) => execute_insert(storage, insert, params),
        Statement::Update(update) => execute_assignments(storage, update, params),
        Statement::Delete(delete) => execute_delete(storage, delete, params),
        Statement::Query(_) => Err(DaoError::UnsupportedOperation(
            "SELECT does not produce a row count".into(),
        )),
    }
}

pub fn execute_query(
    storage: &InMemoryStorage,
    stmt: &Statement,
    params: &[Option<Value>],
) -> Result<QueryResult> {
    let Statement::Query(query) = stmt else {
        return Err(DaoError::UnsupportedOperation(
            "Only SELECT produces a result set".into(),
        ));
    };
    execute_select(storage, query, params)
}

fn execute_insert(
    storage: &mut InMemoryStorage,
    insert: &InsertStmt,
    params: &[Option<Value>],
) -> Result<u64> {
    let table = storage.get_table_mut(&insert.table_name)?;
    let schema = table.schema().clone();
    let width = schema.schema().column_count();

    let targets: Vec<usize> = match &insert.columns {
        Some(columns) => columns
            .iter()
            .map(|name| schema.column_index(name))
            .collect::<Result<Vec<_>>>()?,
        None => (0..width).collect(),
    };

    let mut rows = Vec::with_capacity(insert.values.len());
    for operands in &insert.values {
        if operands.len() != targets.len() {
            return Err(DaoError::ExecutionError(format!(
                "INSERT lists {} columns but {} values",
                targets.len(),
                operands.len()
            )));
        }
        let mut row = vec![Value::Null; width];
        for (col_idx, operand) in targets.iter().zip(operands) {
            row[*col_idx] = operand.resolve(params)?;
        }
        rows.push(row);
    }

    table.insert_all(rows)
}

fn execute_assignments(
    storage: &mut InMemoryStorage,
    update: &UpdateStmt,
    params: &[Option<Value>],
) -> Result<u64> {
    let table = storage.get_table_mut(&update.table_name)?;
    let schema = table.schema().clone();

    let assignments = update
        .assignments
        .iter()
        .map(|assign| Ok((schema.column_index(&assign.column)?, assign.value.resolve(params)?)))
        .collect::<Result<Vec<_>>>()?;
    let filters = resolve_filters(&schema, &update.selection, params)?;

    table.update(&assignments, &filters)
}

fn execute_delete(
    storage: &mut InMemoryStorage,
    delete: &DeleteStmt,
    params: &[Option<Value>],
) -> Result<u64> {
    let table = storage.get_table_mut(&delete.table_name)?;
    let filters = resolve_filters(table.schema(), &delete.selection, params)?;
    Ok(table.delete(&filters))
}

fn execute_select(
    storage: &InMemoryStorage,
    query: &QueryStmt,
    params: &[Option<Value>],
) -> Result<QueryResult> {
    let table = storage.get_table(&query.table_name)?;
    let schema = table.schema();
    let filters = resolve_filters(schema, &query.selection, params)?;

    let projected: Vec<usize> = match &query.projection {
        Projection::Wildcard => (0..schema.schema().column_count()).collect(),
        Projection::Columns(columns) => columns
            .iter()
            .map(|name| schema.column_index(name))
            .collect::<Result<Vec<_>>>()?,
    };

    let columns = projected
        .iter()
        .map(|idx| schema.schema().columns()[*idx].name.clone())
        .collect();
    let rows = table
        .scan(&filters)
        .into_iter()
        .map(|row| projected.iter().map(|idx| row[*idx].clone()).collect())
        .collect();

    Ok(QueryResult::new(columns, rows))
}

fn resolve_filters(
    schema: &TableSchema,
    conditions: &[Condition],
    params: &[Option<Value>],
) -> Result<Vec<Filter>> {
    conditions
        .iter()
        .map(|cond| Ok((schema.column_index(&cond.column)?, cond.operand.resolve(params)?)))
        .collect()
}
