use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tsv2sql::{Config, InputFormat, PrimaryKey, Quoting};

/// TSV files to MySQL import scripts.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TSV file to convert
    #[arg(value_name = "TSV_file")]
    tsv_file: PathBuf,

    /// SQL file to write (default: the input with a .sql extension)
    #[arg(short = 'o', value_name = "sql_file")]
    sql_file: Option<PathBuf>,

    /// Table name (default: the input file name without extension)
    #[arg(short = 't', value_name = "table_name")]
    table_name: Option<String>,

    /// Use the first column as primary key instead of an `id` column
    #[arg(short = 'p')]
    primary_first: bool,

    /// Field separator (default: from the input extension)
    #[arg(long, value_enum)]
    format: Option<InputFormat>,

    /// Escape quotes and backslashes inside string values
    #[arg(short, long)]
    escape: bool,

    /// Convert table and column names to snake_case
    #[arg(long)]
    snake_case: bool,

    /// Parse the generated script back before writing it
    #[arg(long)]
    verify: bool,

    /// More logging on stderr (repeat for more)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn into_config(self) -> Result<Config> {
        let mut config = Config::new(&self.tsv_file)
            .with_context(|| format!("resolving defaults for '{}'", self.tsv_file.display()))?
            .with_snake_case(self.snake_case)
            .with_verify(self.verify);

        if let Some(sql_file) = self.sql_file {
            config = config.with_output(sql_file);
        }
        if let Some(table_name) = self.table_name {
            config = config.with_table_name(table_name);
        }
        if let Some(format) = self.format {
            config = config.with_format(format);
        }
        if self.primary_first {
            config = config.with_primary_key(PrimaryKey::FirstColumn);
        }
        if self.escape {
            config = config.with_quoting(Quoting::Escaped);
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    tsv2sql::logging::init(args.verbose);

    let config = args.into_config()?;
    let mut stdout = std::io::stdout().lock();
    tsv2sql::convert(&config, &mut stdout)
        .with_context(|| format!("converting '{}'", config.input.display()))?;
    Ok(())
}
