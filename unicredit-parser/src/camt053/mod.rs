//! Parsing of the CAMT.053 (ISO 20022) format, specialized to the dialect
//! used in Unicredit Bank's statement exports.

pub mod document;
pub mod parser;

pub use document::Camt053Document;
pub use parser::{normalize_account_id, BalanceRecord, UnicreditParser};
