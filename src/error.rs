//! Fatal setup errors. Anything raised here aborts the run before a single
//! output file is written.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("article database not found: {}", .0.display())]
    DatabaseMissing(PathBuf),

    #[error("article database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("lexicon error: {0}")]
    Lexicon(String),

    #[error("configuration error: {0}")]
    Config(String),
}
