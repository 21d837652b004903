use crate::core::{DaoError, Result, Value};

/// Right-hand side of an assignment or equality filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// `?` placeholder, 0-based in textual order.
    Param(usize),
    Literal(Value),
}

impl Operand {
    /// Resolves the operand against bound parameters (`params[n]` holds the value of `?` number n).
    pub fn resolve(&self, params: &[Option<Value>]) -> Result<Value> {
        match self {
            Self::Literal(value) => Ok(value.clone()),
            Self::Param(idx) => params
                .get(*idx)
                .and_then(|slot| slot.clone())
                .ok_or_else(|| {
                    DaoError::ExecutionError(format!("No value bound for parameter {}", idx + 1))
                }),
        }
    }
}

/// `column = operand`; a WHERE clause is a conjunction of these.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub column: String,
    pub operand: Operand,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: String,
    pub value: Operand,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertStmt {
    pub table_name: String,
    pub columns: Option<Vec<String>>,
    pub values: Vec<Vec<Operand>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStmt {
    pub table_name: String,
    pub assignments: Vec<Assignment>,
    pub selection: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStmt {
    pub table_name: String,
    pub selection: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    Wildcard,
    Columns(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryStmt {
    pub table_name: String,
    pub projection: Projection,
    pub selection: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Insert(InsertStmt),
    Update(UpdateStmt),
    Delete(DeleteStmt),
    Query(QueryStmt),
}

impl Statement {
    pub fn table_name(&self) -> &str {
        match self {
            Self::Insert(stmt) => &stmt.table_name,
            Self::Update(stmt) => &stmt.table_name,
            Self::Delete(stmt) => &stmt.table_name,
            Self::Query(stmt) => &stmt.table_name,
        }
    }

    /// Number of `?` placeholders in the statement.
    pub fn param_count(&self) -> usize {
        let operands: Vec<&Operand> = match self {
            Self::Insert(stmt) => stmt.values.iter().flatten().collect(),
            Self::Update(stmt) => stmt
                .assignments
                .iter()
                .map(|a| &a.value)
                .chain(stmt.selection.iter().map(|c| &c.operand))
                .collect(),
            Self::Delete(stmt) => stmt.selection.iter().map(|c| &c.operand).collect(),
            Self::Query(stmt) => stmt.selection.iter().map(|c| &c.operand).collect(),
        };
        operands
            .into_iter()
            .filter(|op| matches!(op, Operand::Param(_)))
            .count()
    }
}
