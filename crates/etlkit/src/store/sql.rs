//! A small SQL executor over named tables, used by the file- and
//! memory-backed extractors to answer `execute_query`.
//!
//! Supported: a single `SELECT` from one table with `*`, column lists,
//! aliases and computed expressions, plus an optional `WHERE` using
//! comparisons, arithmetic, `AND`/`OR`/`NOT`, `IS [NOT] NULL`, `IN (...)`,
//! `BETWEEN` and `LIKE`. Conditions use three-valued logic: a row is kept
//! only when its condition is true. Anything else is a `Query` error.

// dependencies
use sqlparser::ast::{BinaryOperator, Expr, SelectItem, SetExpr, Statement, TableFactor, UnaryOperator};
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;
use crate::table::{Column, Row, Table, Value};
use crate::error::{EtlError, Result};

fn query_error(msg: impl Into<String>) -> EtlError {
    EtlError::Query(msg.into())
}

/// Parse and execute one SELECT statement, fetching its source table by name.
pub fn execute(sql: &str, fetch: impl Fn(&str) -> Result<Table>) -> Result<Table> {
    let statements = Parser::parse_sql(&GenericDialect {}, sql)
        .map_err(|e| query_error(format!("malformed SQL: {e}")))?;
    let [statement] = statements.as_slice() else {
        return Err(query_error(format!("expected one statement, got {}", statements.len())));
    };
    let Statement::Query(query) = statement else {
        return Err(query_error("only SELECT statements are supported"));
    };
    // WITH, ORDER BY, LIMIT and similar clauses render outside the query body
    if query.to_string() != query.body.to_string() {
        return Err(query_error("only plain SELECT queries are supported"));
    }
    let SetExpr::Select(select) = query.body.as_ref() else {
        return Err(query_error("only simple SELECT statements are supported"));
    };
    if select.distinct.is_some() || select.having.is_some() ||
       select.to_string().to_ascii_uppercase().contains(" GROUP BY ") {
        return Err(query_error("DISTINCT, GROUP BY and HAVING are not supported"));
    }
    let [from] = select.from.as_slice() else {
        return Err(query_error("queries must select from exactly one table"));
    };
    if !from.joins.is_empty() {
        return Err(query_error("joins are not supported in SQL; use ops::join"));
    }
    let TableFactor::Table { name, .. } = &from.relation else {
        return Err(query_error("only simple table references are supported"));
    };
    let table_name = name.to_string().replace(['"', '`'], "");
    let source = fetch(&table_name)?;

    // apply the WHERE clause to filter table rows
    let filtered = match &select.selection {
        None => source,
        Some(condition) => {
            let mut rows = Vec::new();
            for row in source.rows() {
                if eval(condition, &row)? == Value::Logical(true) {
                    rows.push(row.index());
                }
            }
            source.take_rows(&rows)
        },
    };
    project(&filtered, &select.projection)
}

// resolve SELECT items into output columns
fn project(table: &Table, items: &[SelectItem]) -> Result<Table> {
    let mut projected = Table::new();
    for item in items {
        match item {
            SelectItem::Wildcard(_) => {
                for name in table.col_names() {
                    projected.add_col(name.as_str(), table.column(name)?.clone())?;
                }
            },
            SelectItem::UnnamedExpr(expr) => {
                let name = match expr {
                    Expr::Identifier(ident) => ident.value.clone(),
                    Expr::CompoundIdentifier(idents) => idents.last().map(|i| i.value.clone()).unwrap_or_default(),
                    expr => expr.to_string(),
                };
                projected.add_col(name, eval_column(table, expr)?)?;
            },
            SelectItem::ExprWithAlias { expr, alias } => {
                projected.add_col(alias.value.clone(), eval_column(table, expr)?)?;
            },
            _ => return Err(query_error(format!("unsupported SELECT item: {item}"))),
        }
    }
    Ok(projected)
}

// evaluate an expression over every row; plain column references keep their column
fn eval_column(table: &Table, expr: &Expr) -> Result<Column> {
    if let Some(name) = column_name(expr) {
        return table.column(&name).cloned();
    }
    let values = table.rows().map(|row| eval(expr, &row)).collect::<Result<Vec<_>>>()?;
    Ok(Column::from_values(values))
}

fn column_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Identifier(ident) => Some(ident.value.clone()),
        Expr::CompoundIdentifier(idents) => idents.last().map(|i| i.value.clone()),
        _ => None,
    }
}

/* -----------------------------------------------------------------------------
expression evaluation with three-valued logic
----------------------------------------------------------------------------- */
fn logical(b: Option<bool>) -> Value {
    b.map_or(Value::Missing, Value::Logical)
}
fn truth(value: &Value) -> Result<Option<bool>> {
    match value {
        Value::Missing    => Ok(None),
        Value::Logical(b) => Ok(Some(*b)),
        v => Err(query_error(format!("expected a boolean condition, got {v}"))),
    }
}

fn eval(expr: &Expr, row: &Row) -> Result<Value> {
    if let Some(name) = column_name(expr) {
        return row.get(&name);
    }
    match expr {
        Expr::Value(_) => literal(&expr.to_string()),
        Expr::Nested(inner) => eval(inner, row),
        Expr::IsNull(inner) => Ok(Value::Logical(eval(inner, row)?.is_missing())),
        Expr::IsNotNull(inner) => Ok(Value::Logical(!eval(inner, row)?.is_missing())),
        Expr::UnaryOp { op, expr } => {
            let value = eval(expr, row)?;
            match op {
                UnaryOperator::Not   => Ok(logical(truth(&value)?.map(|b| !b))),
                UnaryOperator::Minus => Ok(&Value::Integer(0) - &value),
                UnaryOperator::Plus  => Ok(value),
                op => Err(query_error(format!("unsupported unary operator: {op}"))),
            }
        },
        Expr::BinaryOp { left, op, right } => {
            let (l, r) = (eval(left, row)?, eval(right, row)?);
            binary(&l, op, &r)
        },
        Expr::InList { expr, list, negated } => {
            let value = eval(expr, row)?;
            if value.is_missing() {
                return Ok(Value::Missing);
            }
            let mut unknown = false;
            for item in list {
                match value.equals(&eval(item, row)?) {
                    Some(true) => return Ok(Value::Logical(!*negated)),
                    None => unknown = true,
                    Some(false) => {},
                }
            }
            Ok(if unknown { Value::Missing } else { Value::Logical(*negated) })
        },
        Expr::Between { expr, negated, low, high } => {
            let value = eval(expr, row)?;
            let above = value.compare(&eval(low, row)?).map(|o| o.is_ge());
            let below = value.compare(&eval(high, row)?).map(|o| o.is_le());
            let between = and(above, below);
            Ok(logical(between.map(|b| b != *negated)))
        },
        Expr::Like { negated, expr, pattern, .. } => {
            let value = eval(expr, row)?;
            let pattern = eval(pattern, row)?;
            let matched = match (value.to_text(), pattern.to_text()) {
                (Some(text), Some(pattern)) => Some(like_match(&text, &pattern) != *negated),
                _ => None,
            };
            Ok(logical(matched))
        },
        expr => Err(query_error(format!("unsupported expression: {expr}"))),
    }
}

fn and(a: Option<bool>, b: Option<bool>) -> Option<bool> {
    match (a, b) {
        (Some(false), _) | (_, Some(false)) => Some(false),
        (Some(true), Some(true)) => Some(true),
        _ => None,
    }
}
fn or(a: Option<bool>, b: Option<bool>) -> Option<bool> {
    match (a, b) {
        (Some(true), _) | (_, Some(true)) => Some(true),
        (Some(false), Some(false)) => Some(false),
        _ => None,
    }
}

fn binary(l: &Value, op: &BinaryOperator, r: &Value) -> Result<Value> {
    let cmp = l.compare(r);
    let value = match op {
        BinaryOperator::Eq    => logical(l.equals(r)),
        BinaryOperator::NotEq => logical(l.equals(r).map(|b| !b)),
        BinaryOperator::Lt    => logical(cmp.map(|o| o.is_lt())),
        BinaryOperator::LtEq  => logical(cmp.map(|o| o.is_le())),
        BinaryOperator::Gt    => logical(cmp.map(|o| o.is_gt())),
        BinaryOperator::GtEq  => logical(cmp.map(|o| o.is_ge())),
        BinaryOperator::And   => logical(and(truth(l)?, truth(r)?)),
        BinaryOperator::Or    => logical(or(truth(l)?, truth(r)?)),
        BinaryOperator::Plus     => l + r,
        BinaryOperator::Minus    => l - r,
        BinaryOperator::Multiply => l * r,
        BinaryOperator::Divide   => l / r,
        op => return Err(query_error(format!("unsupported operator: {op}"))),
    };
    Ok(value)
}

// parse a rendered SQL literal
fn literal(text: &str) -> Result<Value> {
    if text.len() >= 2 && text.starts_with('\'') && text.ends_with('\'') {
        return Ok(Value::Text(text[1..text.len() - 1].replace("''", "'")));
    }
    match text.to_ascii_uppercase().as_str() {
        "NULL"  => return Ok(Value::Missing),
        "TRUE"  => return Ok(Value::Logical(true)),
        "FALSE" => return Ok(Value::Logical(false)),
        _ => {},
    }
    if let Ok(x) = text.parse::<i64>() {
        return Ok(Value::Integer(x));
    }
    text.parse::<f64>()
        .map(Value::Numeric)
        .map_err(|_| query_error(format!("unsupported literal: {text}")))
}

/// Match text against a SQL LIKE pattern, where `%` matches any run of
/// characters and `_` matches exactly one.
pub fn like_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();
    // matches[j] is true when the text prefix so far matches pattern[..j]
    let mut matches = vec![false; pattern.len() + 1];
    matches[0] = true;
    for j in 0..pattern.len() {
        matches[j + 1] = matches[j] && pattern[j] == '%';
    }
    for c in text {
        let mut next = vec![false; pattern.len() + 1];
        for (j, p) in pattern.iter().enumerate() {
            next[j + 1] = match p {
                '%' => next[j] || matches[j + 1],
                '_' => matches[j],
                p   => matches[j] && *p == c,
            };
        }
        matches = next;
    }
    matches[pattern.len()]
}
