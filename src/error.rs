//! Errors raised by the index, the codec and the ingestion adapters

use std::io;

use thiserror::Error;

use crate::base::Member;
use crate::index::Operator;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} is not a member")]
    UnknownMember(Member),

    #[error("operation failed ({operator}): {source}")]
    Operation {
        operator: Operator,
        #[source]
        source: Box<Error>,
    },

    #[error("at least one operation must be specified")]
    EmptyQuery,

    #[error("sparsity is undefined for an empty table")]
    EmptyTable,

    #[error("sparsity is undefined for an empty domain")]
    EmptyDomain,

    #[error("unexpected end of stream while reading {0}")]
    Truncated(&'static str),

    #[error("malformed index: {0}")]
    Malformed(String),

    #[error("decompression failed: {0}")]
    Decompression(#[source] io::Error),

    #[error("{0} does not fit in a 4-byte field")]
    FieldOverflow(u64),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("line {line}, column {column}: {value:?} is not an unsigned 32-bit integer")]
    InvalidField {
        line: u64,
        column: usize,
        value: String,
    },

    #[error("line {line}: no column {column}")]
    MissingColumn { line: u64, column: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Maps an I/O error raised while decoding `what`
    pub(crate) fn from_read(error: io::Error, what: &'static str) -> Self {
        match error.kind() {
            io::ErrorKind::UnexpectedEof => Error::Truncated(what),
            io::ErrorKind::InvalidInput | io::ErrorKind::InvalidData => {
                Error::Decompression(error)
            }
            _ => Error::Io(error),
        }
    }
}
