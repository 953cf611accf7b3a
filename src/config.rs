use std::path::{Path, PathBuf};

use convert_case::{Case, Casing};

use crate::error::ConvertError;

/// Field separator of the input file.
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum InputFormat {
    Tsv,
    Csv,
}

impl InputFormat {
    /// `.csv` (any case) selects comma separated input, everything else is tab separated.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => InputFormat::Csv,
            _ => InputFormat::Tsv,
        }
    }

    pub fn delimiter(self) -> u8 {
        match self {
            InputFormat::Tsv => b'\t',
            InputFormat::Csv => b',',
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PrimaryKey {
    /// Prepend `id INT NOT NULL AUTO_INCREMENT` and key on it.
    Surrogate,
    /// Key on the first column of the file.
    FirstColumn,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Quoting {
    /// Wrap strings in single quotes and nothing else.
    Raw,
    /// Also escape quotes and backslashes inside strings.
    Escaped,
}

/// Everything one conversion needs, resolved up front.
#[derive(Debug, Clone)]
pub struct Config {
    pub input: PathBuf,
    pub output: PathBuf,
    pub table_name: String,
    pub format: InputFormat,
    pub primary_key: PrimaryKey,
    pub quoting: Quoting,
    pub snake_case: bool,
    pub verify: bool,
}

impl Config {
    /// Builds a config for `input` with defaults derived from its path: the
    /// output replaces the extension with `.sql` and the table is named after
    /// the file stem.
    pub fn new(input: impl Into<PathBuf>) -> Result<Self, ConvertError> {
        let input = input.into();
        let table_name = input
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| ConvertError::TableName(input.clone()))?
            .to_string();

        Ok(Self {
            output: input.with_extension("sql"),
            format: InputFormat::from_path(&input),
            table_name,
            input,
            primary_key: PrimaryKey::Surrogate,
            quoting: Quoting::Raw,
            snake_case: false,
            verify: false,
        })
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    pub fn with_format(mut self, format: InputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_primary_key(mut self, primary_key: PrimaryKey) -> Self {
        self.primary_key = primary_key;
        self
    }

    pub fn with_quoting(mut self, quoting: Quoting) -> Self {
        self.quoting = quoting;
        self
    }

    pub fn with_snake_case(mut self, snake_case: bool) -> Self {
        self.snake_case = snake_case;
        self
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Applies the naming policy to a table or column name.
    pub fn identifier(&self, name: &str) -> String {
        if self.snake_case {
            return name.to_case(Case::Snake);
        }

        name.to_string()
    }
}
