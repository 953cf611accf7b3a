//! Convert tab separated value files into MySQL import scripts.

pub mod config;
pub mod convert;
pub mod error;
pub mod infer;
pub mod logging;
pub mod sql;
pub mod tsv;
pub mod verify;

pub use config::{Config, InputFormat, PrimaryKey, Quoting};
pub use convert::{convert, render, Rendered};
pub use error::ConvertError;
