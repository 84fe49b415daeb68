use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Filter file not found: {}", .0.display())]
    FilterFileNotFound(PathBuf),

    #[error("Invalid filter file {}: {message}", .path.display())]
    InvalidFilter { path: PathBuf, message: String },

    #[error("Cannot read spreadsheet {}: {message}", .path.display())]
    Spreadsheet { path: PathBuf, message: String },

    #[error("Spreadsheet has no sheets")]
    NoSheets,

    #[error("Spreadsheet must have a header row and at least one data row")]
    NotEnoughRows,

    #[error("Column '{0}' not found in header row")]
    MissingColumn(&'static str),

    #[error("No valid accounts found in spreadsheet")]
    NoValidAccounts,

    #[error("Account '{0}' not found in spreadsheet")]
    AccountNotFound(String),

    #[error("'{}' already exists, refusing to overwrite", .0.display())]
    TemplateExists(PathBuf),

    #[error("Cannot write template: {0}")]
    Template(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
