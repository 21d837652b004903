use super::{Placeholder, PlaceholderRole, Statement, StatementKind};
use crate::core::{DaoError, Result};
use crate::model::EntityMetadata;

pub fn build(kind: StatementKind, meta: &EntityMetadata) -> Result<Statement> {
    match kind {
        StatementKind::Insert => build_insert(meta),
        StatementKind::Update => build_update(meta),
        StatementKind::Delete => build_delete(meta),
        StatementKind::DeleteAll => Ok(build_delete_all(meta.table())),
        StatementKind::SelectByKey => build_select_by_key(meta),
        StatementKind::SelectAll => Ok(build_select_all(meta.table())),
    }
}

/// `INSERT INTO <table> (<f1>,<f2>,...) VALUES (?,?,...)`
pub fn build_insert(meta: &EntityMetadata) -> Result<Statement> {
    if meta.fields().is_empty() {
        return Err(DaoError::ConfigurationError(format!(
            "Model '{}' declares no fields to insert",
            meta.table()
        )));
    }

    let columns: Vec<&str> = meta.fields().iter().map(|field| field.name).collect();
    let marks = vec!["?"; columns.len()];
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        meta.table(),
        columns.join(","),
        marks.join(",")
    );

    Ok(Statement::new(
        StatementKind::Insert,
        sql,
        assign_placeholders(meta),
    ))
}

/// `UPDATE <table> SET <f1> = ?, ... WHERE <pk1> = ? AND ...`
///
/// The SET list covers every field, key fields included.
pub fn build_update(meta: &EntityMetadata) -> Result<Statement> {
    let (where_clause, filters) = key_filter(meta)?;

    if meta.value_fields().is_empty() {
        return Err(DaoError::ConfigurationError(format!(
            "Model '{}' has no non-key fields to update",
            meta.table()
        )));
    }

    let set_clause: Vec<String> = meta
        .fields()
        .iter()
        .map(|field| format!("{} = ?", field.name))
        .collect();
    let sql = format!(
        "UPDATE {} SET {} WHERE {}",
        meta.table(),
        set_clause.join(", "),
        where_clause
    );

    let mut placeholders = assign_placeholders(meta);
    placeholders.extend(filters);
    Ok(Statement::new(StatementKind::Update, sql, placeholders))
}

/// `DELETE FROM <table> WHERE <pk1> = ? AND ...`
pub fn build_delete(meta: &EntityMetadata) -> Result<Statement> {
    let (where_clause, filters) = key_filter(meta)?;
    let sql = format!("DELETE FROM {} WHERE {}", meta.table(), where_clause);
    Ok(Statement::new(StatementKind::Delete, sql, filters))
}

/// `DELETE FROM <table>`, unconditional.
pub fn build_delete_all(table: &str) -> Statement {
    Statement::new(
        StatementKind::DeleteAll,
        format!("DELETE FROM {}", table),
        Vec::new(),
    )
}

/// `SELECT * FROM <table> WHERE <pk1> = ? AND ...`
pub fn build_select_by_key(meta: &EntityMetadata) -> Result<Statement> {
    let (where_clause, filters) = key_filter(meta)?;
    let sql = format!("SELECT * FROM {} WHERE {}", meta.table(), where_clause);
    Ok(Statement::new(StatementKind::SelectByKey, sql, filters))
}

pub fn build_select_all(table: &str) -> Statement {
    Statement::new(
        StatementKind::SelectAll,
        format!("SELECT * FROM {}", table),
        Vec::new(),
    )
}

fn assign_placeholders(meta: &EntityMetadata) -> Vec<Placeholder> {
    meta.fields()
        .iter()
        .enumerate()
        .map(|(field_index, field)| Placeholder {
            field: field.name,
            field_index,
            role: PlaceholderRole::Assign,
        })
        .collect()
}

fn key_filter(meta: &EntityMetadata) -> Result<(String, Vec<Placeholder>)> {
    let indices = meta.primary_key_indices()?;
    let fields = meta.fields();

    let conditions: Vec<String> = indices
        .iter()
        .map(|idx| format!("{} = ?", fields[*idx].name))
        .collect();
    let placeholders = indices
        .into_iter()
        .map(|field_index| Placeholder {
            field: fields[field_index].name,
            field_index,
            role: PlaceholderRole::Filter,
        })
        .collect();

    Ok((conditions.join(" AND "), placeholders))
}
