use std::io::Write;

use crate::config::Config;
use crate::error::ConvertError;
use crate::infer::{self, ColumnList};
use crate::sql::{self, TableSpec};
use crate::tsv::{self, Document};
use crate::verify;

/// Result of converting one document.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub script: String,
    pub table_name: String,
    pub columns: ColumnList,
    pub rows: usize,
    /// Positions of the columns widened from INT to FLOAT.
    pub corrected: Vec<usize>,
}

/// Converts input text to a script without touching the filesystem.
pub fn render(text: &str, config: &Config) -> Result<Rendered, ConvertError> {
    let document = tsv::parse_document(text, config.format.delimiter())?;
    let columns = columns(&document, config)?;
    finish(document, columns, config)
}

/// Reads `config.input`, writes `config.output` and reports progress to
/// `progress` as it goes.
pub fn convert(config: &Config, progress: &mut impl Write) -> Result<Rendered, ConvertError> {
    let document = tsv::read_document(&config.input, config.format.delimiter())?;
    tracing::debug!(
        input = %config.input.display(),
        columns = document.width(),
        rows = document.rows.len(),
        "read document"
    );

    let columns = columns(&document, config)?;
    report(progress, "Column names imported")?;

    let rendered = finish(document, columns, config)?;
    report(progress, "Writing")?;
    std::fs::write(&config.output, &rendered.script).map_err(|source| ConvertError::Write {
        path: config.output.clone(),
        source,
    })?;

    tracing::info!(
        output = %config.output.display(),
        table = %rendered.table_name,
        rows = rendered.rows,
        "wrote sql script"
    );
    Ok(rendered)
}

fn columns(document: &Document, config: &Config) -> Result<ColumnList, ConvertError> {
    let sample = document.sample().ok_or(ConvertError::NoDataRows)?;
    let header: Vec<String> = document
        .header
        .iter()
        .map(|name| config.identifier(name))
        .collect();
    let columns = infer::infer_columns(&header, sample, config.primary_key)?;
    tracing::debug!(
        types = ?columns.iter().map(|column| column.sql_type).collect::<Vec<_>>(),
        "inferred column types from line {}",
        sample.line
    );
    Ok(columns)
}

fn finish(
    document: Document,
    mut columns: ColumnList,
    config: &Config,
) -> Result<Rendered, ConvertError> {
    let corrected = infer::correct_types(&mut columns, &document.rows);
    let values = sql::values_payload(&document.rows, &columns, config.primary_key, config.quoting)?;

    let table_name = config.identifier(&config.table_name);
    let table = TableSpec {
        name: &table_name,
        columns: &columns,
        primary_key: config.primary_key,
    };
    let script = sql::render_script(&table, &values, config.quoting);

    if config.verify {
        let shape = verify::verify_script(&script)?;
        tracing::debug!(table = %shape.table, rows = shape.rows, "script verified");
    }

    Ok(Rendered {
        script,
        table_name,
        columns,
        rows: values.rows,
        corrected,
    })
}

fn report(progress: &mut impl Write, message: &str) -> Result<(), ConvertError> {
    writeln!(progress, "{message}").map_err(ConvertError::Progress)
}
