//! Library error handling.

use thiserror::Error;

/// Errors produced while converting a CAMT.053 export.
///
/// All variants are terminal: a failed conversion is aborted, nothing is
/// retried. Messages are deterministic strings so callers can match on them.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O failure while reading the input file.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The input is not well-formed XML or misses a structurally
    /// mandatory element.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::de::DeError),

    /// A value inside the document could not be parsed (amount, date).
    #[error("parse error: {0}")]
    Parse(String),

    /// The document contains no statement blocks at all.
    #[error("No statement data in the file")]
    NoStatement,

    /// Several statement blocks exist but no account id was configured.
    /// Carries the normalized ids found, comma-separated, in document order.
    #[error("You have more than one accounts, please configure the one to convert: {0}")]
    AmbiguousAccount(String),

    /// The configured account id matches none of the blocks in the file.
    #[error(
        "The account you specified ('{requested}') is not among the ones \
         in the file, please configure one of: {available}"
    )]
    UnknownAccount {
        /// Requested id, already normalized.
        requested: String,
        /// Normalized ids found, comma-separated, in document order.
        available: String,
    },

    /// A date node is present but carries neither `<Dt>` nor `<DtTm>`.
    #[error("date element {0} has neither <Dt> nor <DtTm>")]
    MissingDate(&'static str),

    /// A field the Unicredit dialect treats as mandatory is absent.
    #[error("missing mandatory element: {0}")]
    MissingField(&'static str),
}

/// Result type with the library error.
pub type Result<T> = std::result::Result<T, Error>;
