//! DDL error types

use thiserror::Error;

/// Errors that abort resolution of the current statement
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DdlError {
    /// Numeric literal in a length or scale position could not be parsed
    #[error("Invalid {position} literal '{literal}'")]
    InvalidLiteral {
        position: &'static str,
        literal: String,
    },

    /// Collection type that is neither ENUM nor SET
    #[error("Unexpected collection type '{0}', expected ENUM or SET")]
    UnexpectedCollectionType(String),

    /// Default value conflicts with the column definition
    #[error("Invalid default value for column '{column}': {reason}")]
    InvalidDefault { column: String, reason: String },

    /// Column definition text could not be read
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// Tokenizer error from sqlparser
    #[error("Tokenize error: {0}")]
    Tokenize(String),
}

impl From<sqlparser::tokenizer::TokenizerError> for DdlError {
    fn from(err: sqlparser::tokenizer::TokenizerError) -> Self {
        DdlError::Tokenize(err.to_string())
    }
}

/// Result type for DDL operations
pub type DdlResult<T> = Result<T, DdlError>;
