//! # Unicredit Parser
//!
//! Library for converting Unicredit Bank's CAMT.053 (ISO 20022) XML statement
//! exports into a normalized sequence of transaction records suitable for
//! downstream bookkeeping tools.
//!
//! ## What it does
//!
//! - parses the whole CAMT.053 document into a typed tree
//! - picks the statement block matching a configured account id (a file may
//!   contain statements for several accounts)
//! - extracts opening/closing balances
//! - normalizes every entry, applying Unicredit-specific payee/memo
//!   heuristics (ATM detection, card-transaction merchant extraction)
//!
//! ## Example
//!
//! ```rust,ignore
//! use unicredit_parser::UnicreditParser;
//!
//! let parser = UnicreditParser::new(Some("12345678-12345678-00000018"));
//! let statement = parser.parse_file("statement.xml")?;
//! ```

pub mod camt053;
pub mod error;
pub mod types;

pub use camt053::{normalize_account_id, Camt053Document, UnicreditParser};
pub use error::{Error, Result};
pub use types::*;

/// Parses a CAMT.053 export into a normalized [`Statement`].
///
/// `account_id` selects among the statement blocks in the file; it may be
/// `None` when the file contains a single block. Dashes and other separators
/// in the configured id are allowed.
pub fn parse_statement(content: &str, account_id: Option<&str>) -> Result<Statement> {
    UnicreditParser::new(account_id).parse(content)
}
