use std::fmt::Write;

use crate::config::{PrimaryKey, Quoting};
use crate::error::ConvertError;
use crate::infer::{Column, ColumnType, SURROGATE_KEY};
use crate::tsv::Row;

/// The `VALUES` block of the insert statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Values {
    pub text: String,
    pub rows: usize,
}

#[derive(Debug)]
pub struct TableSpec<'a> {
    pub name: &'a str,
    pub columns: &'a [Column],
    pub primary_key: PrimaryKey,
}

pub fn quote_identifier(name: &str, quoting: Quoting) -> String {
    match quoting {
        Quoting::Raw => format!("`{name}`"),
        Quoting::Escaped => format!("`{}`", name.replace('`', "``")),
    }
}

pub fn quote_string(value: &str, quoting: Quoting) -> String {
    match quoting {
        Quoting::Raw => format!("'{value}'"),
        Quoting::Escaped => format!("'{}'", value.replace('\\', "\\\\").replace('\'', "''")),
    }
}

/// Backtick-quotes every name and joins them with commas.
pub fn transform_header<'a>(names: impl IntoIterator<Item = &'a str>, quoting: Quoting) -> String {
    names
        .into_iter()
        .map(|name| quote_identifier(name, quoting))
        .collect::<Vec<_>>()
        .join(",")
}

/// Renders one field for `column`. `None` means the column is numeric but
/// the field is not a number.
fn literal(value: &str, column: &Column, quoting: Quoting) -> Option<String> {
    if !column.sql_type.is_numeric() {
        return Some(quote_string(value, quoting));
    }

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(String::from("NULL"));
    }

    crate::infer::parse_number(trimmed).map(|_| trimmed.to_string())
}

/// Turns rows into `(a,'b'),\n(c,'d')`. Numeric columns stay bare, strings
/// are single quoted. Fields that cannot be written as their column's type,
/// and empty cells in a first-column key, are collected and reported together.
pub fn values_payload(
    rows: &[Row],
    columns: &[Column],
    primary_key: PrimaryKey,
    quoting: Quoting,
) -> Result<Values, ConvertError> {
    let mut tuples = Vec::with_capacity(rows.len());
    let mut errors = Vec::new();
    let mut unescaped_quotes = 0usize;

    for row in rows {
        let mut literals = Vec::with_capacity(columns.len());
        for column in columns {
            let value = row
                .fields
                .get(column.position)
                .ok_or_else(|| ConvertError::RowWidth {
                    line: row.line,
                    expected: columns.len(),
                    found: row.fields.len(),
                })?;

            if primary_key == PrimaryKey::FirstColumn
                && column.position == 0
                && value.trim().is_empty()
            {
                errors.push(ConvertError::EmptyKey {
                    line: row.line,
                    column: column.name.clone(),
                });
                continue;
            }

            if quoting == Quoting::Raw
                && column.sql_type == ColumnType::Varchar
                && value.contains('\'')
            {
                unescaped_quotes += 1;
            }

            match literal(value, column, quoting) {
                Some(literal) => literals.push(literal),
                None => errors.push(ConvertError::NonNumeric {
                    line: row.line,
                    column: column.name.clone(),
                    value: value.clone(),
                }),
            }
        }
        tuples.push(literals.join(","));
    }

    if let Some(err) = ConvertError::from_many(errors) {
        return Err(err);
    }

    if unescaped_quotes > 0 {
        tracing::warn!(
            count = unescaped_quotes,
            "string values contain single quotes and are not escaped; the script will not load (use --escape)"
        );
    }

    Ok(Values {
        text: format!("({})", tuples.join("),\n(")),
        rows: tuples.len(),
    })
}

/// Writes the `DROP TABLE`, `CREATE TABLE` and `INSERT INTO` statements.
pub fn render_script(table: &TableSpec, values: &Values, quoting: Quoting) -> String {
    let header = transform_header(
        table.columns.iter().map(|column| column.name.as_str()),
        quoting,
    );

    let mut script = String::new();
    // writing into a String cannot fail
    let _ = write_script(&mut script, table, &header, values, quoting);
    script
}

fn write_script(
    out: &mut String,
    table: &TableSpec,
    header: &str,
    values: &Values,
    quoting: Quoting,
) -> std::fmt::Result {
    writeln!(out, "DROP TABLE IF EXISTS {};", table.name)?;
    writeln!(out, "CREATE TABLE {}(", table.name)?;
    if table.primary_key == PrimaryKey::Surrogate {
        writeln!(out, "{SURROGATE_KEY} INT NOT NULL AUTO_INCREMENT,")?;
    }

    for (i, column) in table.columns.iter().enumerate() {
        let not_null = if i == 0 && table.primary_key == PrimaryKey::FirstColumn {
            " NOT NULL"
        } else {
            ""
        };
        writeln!(
            out,
            "{} {}{},",
            quote_identifier(&column.name, quoting),
            column.sql_type,
            not_null
        )?;
    }

    match (table.primary_key, table.columns.first()) {
        (PrimaryKey::FirstColumn, Some(first)) => write!(
            out,
            "PRIMARY KEY ( {} )",
            quote_identifier(&first.name, quoting)
        )?,
        _ => write!(out, "PRIMARY KEY ( {SURROGATE_KEY} )")?,
    }
    write!(out, ");")?;

    write!(out, "\n\nINSERT INTO {}\n(", table.name)?;
    write!(out, "{header}")?;
    write!(out, ")\nVALUES\n")?;
    write!(out, "{}", values.text)?;
    write!(out, ";")
}
