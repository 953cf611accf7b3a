//! Two-phase column typing: guess from the first data row, then widen INT
//! columns to FLOAT after looking at every row.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::config::PrimaryKey;
use crate::error::ConvertError;
use crate::tsv::Row;

/// Width of the character columns in the generated table.
pub const VARCHAR_WIDTH: usize = 20;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Float,
    Varchar,
}

impl ColumnType {
    /// Numeric values are written bare, everything else is quoted.
    pub fn is_numeric(self) -> bool {
        !matches!(self, ColumnType::Varchar)
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnType::Int => write!(f, "INT"),
            ColumnType::Float => write!(f, "FLOAT"),
            ColumnType::Varchar => write!(f, "VARCHAR({VARCHAR_WIDTH})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub sql_type: ColumnType,
    pub position: usize,
}

pub type ColumnList = SmallVec<[Column; 16]>;

/// Parses a field as a SQL numeric literal. Only finite values count.
pub fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

pub fn classify(value: &str) -> ColumnType {
    match parse_number(value) {
        Some(number) if number.fract() == 0.0 => ColumnType::Int,
        Some(_) => ColumnType::Float,
        None => ColumnType::Varchar,
    }
}

/// Name of the generated key column under [`PrimaryKey::Surrogate`].
pub const SURROGATE_KEY: &str = "id";

/// Pairs every header name with the type guessed from the sample row. Names
/// compare case-insensitively, as MySQL column names do, and may not collide
/// with the surrogate key when one is generated.
pub fn infer_columns(
    header: &[String],
    sample: &Row,
    primary_key: PrimaryKey,
) -> Result<ColumnList, ConvertError> {
    if sample.fields.len() != header.len() {
        return Err(ConvertError::RowWidth {
            line: sample.line,
            expected: header.len(),
            found: sample.fields.len(),
        });
    }

    let mut seen = FxHashSet::default();
    if primary_key == PrimaryKey::Surrogate {
        seen.insert(SURROGATE_KEY.to_string());
    }

    let mut columns = ColumnList::new();
    for (position, (name, value)) in header.iter().zip(&sample.fields).enumerate() {
        if name.trim().is_empty() {
            return Err(ConvertError::EmptyColumnName(position + 1));
        }

        if !seen.insert(name.to_ascii_lowercase()) {
            return Err(ConvertError::DuplicateColumn(name.clone()));
        }

        columns.push(Column {
            name: name.clone(),
            sql_type: classify(value),
            position,
        });
    }

    Ok(columns)
}

/// Widens INT columns holding a fractional value anywhere in `rows` to FLOAT.
/// Returns the positions of the columns that changed.
pub fn correct_types(columns: &mut [Column], rows: &[Row]) -> Vec<usize> {
    let mut corrected = Vec::new();
    for column in columns
        .iter_mut()
        .filter(|column| column.sql_type == ColumnType::Int)
    {
        let fractional = rows.iter().any(|row| {
            row.fields
                .get(column.position)
                .and_then(|value| parse_number(value))
                .is_some_and(|number| number.fract() != 0.0)
        });

        if fractional {
            tracing::debug!(column = %column.name, "INT column holds fractions, using FLOAT");
            column.sql_type = ColumnType::Float;
            corrected.push(column.position);
        }
    }

    corrected
}
