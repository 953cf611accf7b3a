//! Reads a generated script back with `sqlparser` and checks that the three
//! statements agree with each other.

use rustc_hash::FxHashSet;
use sqlparser::ast::{
    ColumnDef, ColumnOption, Expr, ObjectType, SetExpr, Statement, TableConstraint, Value,
    Values,
};
use sqlparser::dialect::MySqlDialect;
use sqlparser::parser::Parser;

use crate::error::ConvertError;

/// What the script declares, as seen by a MySQL parser.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptShape {
    pub table: String,
    /// Created columns with their SQL types, surrogate key included.
    pub columns: Vec<(String, String)>,
    pub not_null: Vec<String>,
    pub primary_key: Vec<String>,
    pub insert_columns: Vec<String>,
    pub rows: usize,
}

pub fn verify_script(sql: &str) -> Result<ScriptShape, ConvertError> {
    let statements = Parser::parse_sql(&MySqlDialect {}, sql)?;
    let [drop, create, insert] = statements.as_slice() else {
        return Err(inconsistent(format!(
            "expected 3 statements, found {}",
            statements.len()
        )));
    };

    let dropped = match drop {
        Statement::Drop {
            object_type: ObjectType::Table,
            names,
            ..
        } if names.len() == 1 => names[0].to_string(),
        _ => return Err(inconsistent("first statement is not DROP TABLE")),
    };

    let (table, columns, constraints) = match create {
        Statement::CreateTable {
            name,
            columns,
            constraints,
            ..
        } => (name.to_string(), columns, constraints),
        _ => return Err(inconsistent("second statement is not CREATE TABLE")),
    };

    let (inserted, insert_columns, source) = match insert {
        Statement::Insert {
            table_name,
            columns,
            source,
            ..
        } => (table_name.to_string(), columns, source),
        _ => return Err(inconsistent("third statement is not INSERT")),
    };

    if dropped != table || inserted != table {
        return Err(inconsistent(format!(
            "statements name different tables: '{dropped}', '{table}', '{inserted}'"
        )));
    }

    let mut seen = FxHashSet::default();
    for column in columns {
        if !seen.insert(column.name.value.to_ascii_lowercase()) {
            return Err(inconsistent(format!(
                "column '{}' is declared twice",
                column.name.value
            )));
        }
    }

    let data_columns: Vec<&ColumnDef> = columns
        .iter()
        .filter(|column| !is_surrogate(column))
        .collect();
    let insert_columns: Vec<String> = insert_columns
        .iter()
        .map(|ident| ident.value.clone())
        .collect();
    let data_names: Vec<&str> = data_columns
        .iter()
        .map(|column| column.name.value.as_str())
        .collect();
    if data_names != insert_columns {
        return Err(inconsistent(format!(
            "insert lists {insert_columns:?} but the table declares {data_names:?}"
        )));
    }

    let primary_key = declared_primary_key(constraints);
    if primary_key.is_empty() {
        return Err(inconsistent("no PRIMARY KEY declared"));
    }
    for key in &primary_key {
        if !columns.iter().any(|column| &column.name.value == key) {
            return Err(inconsistent(format!("primary key '{key}' is not a column")));
        }
    }

    let rows = match source.body.as_ref() {
        SetExpr::Values(Values { rows, .. }) => rows,
        _ => return Err(inconsistent("INSERT has no VALUES list")),
    };
    let not_null: Vec<usize> = data_columns
        .iter()
        .enumerate()
        .filter(|(_, column)| is_not_null(column))
        .map(|(i, _)| i)
        .collect();
    for (i, row) in rows.iter().enumerate() {
        if row.len() != insert_columns.len() {
            return Err(inconsistent(format!(
                "VALUES row {} has {} values for {} columns",
                i + 1,
                row.len(),
                insert_columns.len()
            )));
        }

        if let Some(&position) = not_null
            .iter()
            .find(|&&position| matches!(row[position], Expr::Value(Value::Null)))
        {
            return Err(inconsistent(format!(
                "VALUES row {} puts NULL into NOT NULL column '{}'",
                i + 1,
                insert_columns[position]
            )));
        }
    }

    Ok(ScriptShape {
        table,
        columns: columns
            .iter()
            .map(|column| (column.name.value.clone(), column.data_type.to_string()))
            .collect(),
        not_null: columns
            .iter()
            .filter(|column| is_not_null(column))
            .map(|column| column.name.value.clone())
            .collect(),
        primary_key,
        insert_columns,
        rows: rows.len(),
    })
}

/// The unquoted `id` column added when no natural key is used.
fn is_surrogate(column: &ColumnDef) -> bool {
    column.name.quote_style.is_none() && column.name.value.eq_ignore_ascii_case("id")
}

fn is_not_null(column: &ColumnDef) -> bool {
    column
        .options
        .iter()
        .any(|option| matches!(option.option, ColumnOption::NotNull))
}

fn declared_primary_key(constraints: &[TableConstraint]) -> Vec<String> {
    constraints
        .iter()
        .find_map(|constraint| match constraint {
            TableConstraint::Unique {
                columns,
                is_primary: true,
                ..
            } => Some(columns.iter().map(|ident| ident.value.clone()).collect()),
            _ => None,
        })
        .unwrap_or_default()
}

fn inconsistent(message: impl Into<String>) -> ConvertError {
    ConvertError::Verification(message.into())
}
