use std::path::PathBuf;

use sqlparser::parser::ParserError;
use thiserror::Error;

#[derive(Debug)]
pub struct MultipleErrors(pub Vec<ConvertError>);

impl std::fmt::Display for MultipleErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }

            write!(f, "\t{}. {}", i + 1, item)?;
        }

        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("multiple:\n{0}")]
    Multiple(MultipleErrors),

    #[error("reading '{}'", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("writing '{}'", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("reading delimited input: {0}")]
    Csv(#[from] csv::Error),

    #[error("reporting progress")]
    Progress(#[source] std::io::Error),

    #[error("input has no header line")]
    MissingHeader,

    #[error("input has no data rows below the header")]
    NoDataRows,

    #[error("column {0} of the header has an empty name")]
    EmptyColumnName(usize),

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("line {line}: expected {expected} fields, found {found}")]
    RowWidth {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: column '{column}' is numeric but holds '{value}'")]
    NonNumeric {
        line: usize,
        column: String,
        value: String,
    },

    #[error("line {line}: primary key column '{column}' is empty")]
    EmptyKey { line: usize, column: String },

    #[error("cannot derive a table name from '{}'", .0.display())]
    TableName(PathBuf),

    #[error("generated sql does not parse: {0}")]
    SqlParse(#[from] ParserError),

    #[error("generated sql is inconsistent: {0}")]
    Verification(String),
}

impl ConvertError {
    /// Collapses a list of errors, keeping a lone error as is.
    pub fn from_many(mut errors: Vec<ConvertError>) -> Option<ConvertError> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(ConvertError::Multiple(MultipleErrors(errors))),
        }
    }
}
