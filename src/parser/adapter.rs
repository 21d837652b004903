use super::ast::*;
use crate::core::{DaoError, Result, Value};
use sqlparser::ast as sql_ast;
use sqlparser::dialect::MySqlDialect;
use sqlparser::parser::Parser;

/// Converts SQL text into the small statement subset the in-memory session executes.
///
/// MySQL dialect: `?` tokenizes as a placeholder there.
pub struct SqlParserAdapter {
    dialect: MySqlDialect,
}

impl SqlParserAdapter {
    pub fn new() -> Self {
        Self {
            dialect: MySqlDialect {},
        }
    }

    /// Parses exactly one statement.
    pub fn parse(&self, sql: &str) -> Result<Statement> {
        let mut external_stmts = Parser::parse_sql(&self.dialect, sql)
            .map_err(|e| DaoError::ParseError(e.to_string()))?;

        if external_stmts.len() != 1 {
            return Err(DaoError::ParseError(format!(
                "Expected exactly one statement, got {}",
                external_stmts.len()
            )));
        }

        let mut params = ParamCounter::default();
        self.convert_statement(external_stmts.remove(0), &mut params)
    }

    fn convert_statement(
        &self,
        stmt: sql_ast::Statement,
        params: &mut ParamCounter,
    ) -> Result<Statement> {
        match stmt {
            sql_ast::Statement::Insert(insert) => {
                Ok(Statement::Insert(self.convert_insert(insert, params)?))
            }
            sql_ast::Statement::Query(query) => {
                Ok(Statement::Query(self.convert_query(*query, params)?))
            }
            sql_ast::Statement::Delete(delete) => {
                Ok(Statement::Delete(self.convert_delete(delete, params)?))
            }
            sql_ast::Statement::Update {
                table,
                assignments,
                selection,
                ..
            } => Ok(Statement::Update(self.convert_update(
                table,
                assignments,
                selection,
                params,
            )?)),
            other => Err(DaoError::UnsupportedOperation(format!(
                "Statement not supported: {}",
                other
            ))),
        }
    }

    fn convert_insert(
        &self,
        insert: sql_ast::Insert,
        params: &mut ParamCounter,
    ) -> Result<InsertStmt> {
        let table_name = insert.table.to_string();

        let columns = if insert.columns.is_empty() {
            None
        } else {
            Some(insert.columns.into_iter().map(|id| id.value).collect())
        };

        let Some(source) = insert.source else {
            return Err(DaoError::ParseError("INSERT requires a VALUES clause".into()));
        };
        let sql_ast::SetExpr::Values(vals) = *source.body else {
            return Err(DaoError::UnsupportedOperation(
                "Only VALUES clause supported".into(),
            ));
        };

        let values = vals
            .rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|expr| convert_operand(expr, params))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(InsertStmt {
            table_name,
            columns,
            values,
        })
    }

    fn convert_update(
        &self,
        table: sql_ast::TableWithJoins,
        assignments: Vec<sql_ast::Assignment>,
        selection: Option<sql_ast::Expr>,
        params: &mut ParamCounter,
    ) -> Result<UpdateStmt> {
        let table_name = match table.relation {
            sql_ast::TableFactor::Table { name, .. } => extract_table_name(&name)?,
            _ => {
                return Err(DaoError::UnsupportedOperation(
                    "Complex table references not supported in UPDATE".into(),
                ));
            }
        };

        let assignments = assignments
            .into_iter()
            .map(|assign| {
                let column = match assign.target {
                    sql_ast::AssignmentTarget::ColumnName(col_name) => {
                        if col_name.0.len() == 1 {
                            col_name.0[0].to_string()
                        } else {
                            return Err(DaoError::UnsupportedOperation(
                                "Qualified column names not supported in UPDATE".into(),
                            ));
                        }
                    }
                    _ => {
                        return Err(DaoError::UnsupportedOperation(
                            "Only simple column names supported in UPDATE".into(),
                        ));
                    }
                };

                let value = convert_operand(assign.value, params)?;
                Ok(Assignment { column, value })
            })
            .collect::<Result<Vec<_>>>()?;

        let selection = convert_selection(selection, params)?;

        Ok(UpdateStmt {
            table_name,
            assignments,
            selection,
        })
    }

    fn convert_delete(
        &self,
        delete: sql_ast::Delete,
        params: &mut ParamCounter,
    ) -> Result<DeleteStmt> {
        let tables = match delete.from {
            sql_ast::FromTable::WithFromKeyword(tables) => tables,
            sql_ast::FromTable::WithoutKeyword(tables) => tables,
        };

        let Some(first) = tables.into_iter().next() else {
            return Err(DaoError::ParseError("DELETE requires a table name".into()));
        };
        let table_name = match first.relation {
            sql_ast::TableFactor::Table { name, .. } => extract_table_name(&name)?,
            _ => {
                return Err(DaoError::UnsupportedOperation(
                    "Complex table references not supported in DELETE".into(),
                ));
            }
        };

        let selection = convert_selection(delete.selection, params)?;

        Ok(DeleteStmt {
            table_name,
            selection,
        })
    }

    fn convert_query(&self, query: sql_ast::Query, params: &mut ParamCounter) -> Result<QueryStmt> {
        let sql_ast::SetExpr::Select(select) = *query.body else {
            return Err(DaoError::UnsupportedOperation(
                "Only SELECT queries supported".into(),
            ));
        };
        let select = *select;

        if select.from.len() != 1 {
            return Err(DaoError::UnsupportedOperation(
                "SELECT must read exactly one table".into(),
            ));
        }
        let Some(from) = select.from.into_iter().next() else {
            return Err(DaoError::ParseError("SELECT requires FROM clause".into()));
        };
        if !from.joins.is_empty() {
            return Err(DaoError::UnsupportedOperation("Joins not supported".into()));
        }
        let table_name = match from.relation {
            sql_ast::TableFactor::Table { name, .. } => extract_table_name(&name)?,
            _ => {
                return Err(DaoError::UnsupportedOperation(
                    "Complex table references not supported in SELECT".into(),
                ));
            }
        };

        let projection = convert_projection(select.projection)?;
        let selection = convert_selection(select.selection, params)?;

        Ok(QueryStmt {
            table_name,
            projection,
            selection,
        })
    }
}

impl Default for SqlParserAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Hands out placeholder numbers in the order the converter meets them, which is textual order.
#[derive(Default)]
struct ParamCounter {
    next: usize,
}

impl ParamCounter {
    fn next(&mut self) -> usize {
        let idx = self.next;
        self.next += 1;
        idx
    }
}

fn convert_projection(items: Vec<sql_ast::SelectItem>) -> Result<Projection> {
    let mut columns = Vec::new();
    for item in items {
        match item {
            sql_ast::SelectItem::Wildcard(_) => return Ok(Projection::Wildcard),
            sql_ast::SelectItem::UnnamedExpr(sql_ast::Expr::Identifier(ident)) => {
                columns.push(ident.value)
            }
            _ => {
                return Err(DaoError::UnsupportedOperation(
                    "Only * or plain column names can be selected".into(),
                ));
            }
        }
    }
    Ok(Projection::Columns(columns))
}

fn convert_selection(
    selection: Option<sql_ast::Expr>,
    params: &mut ParamCounter,
) -> Result<Vec<Condition>> {
    let mut conditions = Vec::new();
    if let Some(expr) = selection {
        collect_conditions(expr, params, &mut conditions)?;
    }
    Ok(conditions)
}

fn collect_conditions(
    expr: sql_ast::Expr,
    params: &mut ParamCounter,
    out: &mut Vec<Condition>,
) -> Result<()> {
    match expr {
        sql_ast::Expr::Nested(inner) => collect_conditions(*inner, params, out),
        sql_ast::Expr::BinaryOp {
            left,
            op: sql_ast::BinaryOperator::And,
            right,
        } => {
            collect_conditions(*left, params, out)?;
            collect_conditions(*right, params, out)
        }
        sql_ast::Expr::BinaryOp {
            left,
            op: sql_ast::BinaryOperator::Eq,
            right,
        } => {
            let sql_ast::Expr::Identifier(ident) = *left else {
                return Err(DaoError::UnsupportedOperation(
                    "Filters must compare a column to a value".into(),
                ));
            };
            let operand = convert_operand(*right, params)?;
            out.push(Condition {
                column: ident.value,
                operand,
            });
            Ok(())
        }
        other => Err(DaoError::UnsupportedOperation(format!(
            "Only conjunctions of equality filters are supported, got: {}",
            other
        ))),
    }
}

fn convert_operand(expr: sql_ast::Expr, params: &mut ParamCounter) -> Result<Operand> {
    match expr {
        sql_ast::Expr::Value(value_with_span) => match value_with_span.value {
            sql_ast::Value::Placeholder(_) => Ok(Operand::Param(params.next())),
            sql_ast::Value::Number(text, _) => parse_number(&text).map(Operand::Literal),
            sql_ast::Value::SingleQuotedString(text) | sql_ast::Value::DoubleQuotedString(text) => {
                Ok(Operand::Literal(Value::Text(text)))
            }
            sql_ast::Value::Boolean(b) => Ok(Operand::Literal(Value::Boolean(b))),
            sql_ast::Value::Null => Ok(Operand::Literal(Value::Null)),
            other => Err(DaoError::UnsupportedOperation(format!(
                "Unsupported literal: {}",
                other
            ))),
        },
        sql_ast::Expr::UnaryOp {
            op: sql_ast::UnaryOperator::Minus,
            expr,
        } => match convert_operand(*expr, params)? {
            Operand::Literal(Value::Integer(i)) => Ok(Operand::Literal(Value::Integer(-i))),
            Operand::Literal(Value::Float(f)) => Ok(Operand::Literal(Value::Float(-f))),
            _ => Err(DaoError::UnsupportedOperation(
                "Unary minus applies to numeric literals only".into(),
            )),
        },
        other => Err(DaoError::UnsupportedOperation(format!(
            "Unsupported expression: {}",
            other
        ))),
    }
}

fn parse_number(text: &str) -> Result<Value> {
    if let Ok(i) = text.parse::<i64>() {
        return Ok(Value::Integer(i));
    }
    text.parse::<f64>()
        .map(Value::Float)
        .map_err(|_| DaoError::ParseError(format!("Invalid number: {}", text)))
}

fn extract_table_name(name: &sql_ast::ObjectName) -> Result<String> {
    name.0
        .last()
        .map(|ident| ident.to_string())
        .ok_or_else(|| DaoError::ParseError("Invalid table name".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(sql: &str) -> Statement {
        SqlParserAdapter::new().parse(sql).unwrap()
    }

    #[test]
    fn test_parse_insert_with_placeholders() {
        let Statement::Insert(insert) = parse("INSERT INTO bus (register,licence,type) VALUES (?,?,?)")
        else {
            panic!("Expected INSERT");
        };
        assert_eq!(insert.table_name, "bus");
        assert_eq!(
            insert.columns,
            Some(vec!["register".into(), "licence".into(), "type".into()])
        );
        assert_eq!(
            insert.values[0],
            vec![Operand::Param(0), Operand::Param(1), Operand::Param(2)]
        );
    }

    #[test]
    fn test_parse_update_numbers_set_before_where() {
        let stmt = parse("UPDATE routes SET register = ?, day_week = ? WHERE register = ? AND num_driver = ?");
        assert_eq!(stmt.param_count(), 4);
        let Statement::Update(update) = stmt else {
            panic!("Expected UPDATE");
        };
        assert_eq!(update.assignments[1].column, "day_week");
        assert_eq!(update.assignments[1].value, Operand::Param(1));
        assert_eq!(update.selection.len(), 2);
        assert_eq!(update.selection[1].column, "num_driver");
        assert_eq!(update.selection[1].operand, Operand::Param(3));
    }

    #[test]
    fn test_parse_delete_without_filter() {
        let Statement::Delete(delete) = parse("DELETE FROM place") else {
            panic!("Expected DELETE");
        };
        assert_eq!(delete.table_name, "place");
        assert!(delete.selection.is_empty());
    }

    #[test]
    fn test_parse_select_with_literals() {
        let Statement::Query(query) = parse("SELECT * FROM place WHERE cp = -28001 AND city = 'Madrid'")
        else {
            panic!("Expected SELECT");
        };
        assert_eq!(query.projection, Projection::Wildcard);
        assert_eq!(
            query.selection[0].operand,
            Operand::Literal(Value::Integer(-28001))
        );
        assert_eq!(
            query.selection[1].operand,
            Operand::Literal(Value::from("Madrid"))
        );
    }

    #[test]
    fn test_rejects_non_equality_filters() {
        let err = SqlParserAdapter::new()
            .parse("SELECT * FROM driver WHERE num_driver > 3")
            .unwrap_err();
        assert!(matches!(err, DaoError::UnsupportedOperation(_)));
    }

    #[test]
    fn test_rejects_garbage() {
        let err = SqlParserAdapter::new().parse("SELEC * FROM").unwrap_err();
        assert!(matches!(err, DaoError::ParseError(_)));
    }

    #[test]
    fn test_unbound_param_reports_position() {
        let err = Operand::Param(2).resolve(&[None, None, None]).unwrap_err();
        assert_eq!(
            err,
            DaoError::ExecutionError("No value bound for parameter 3".into())
        );
    }
}
