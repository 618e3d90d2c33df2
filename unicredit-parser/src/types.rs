//! Normalized statement model and Unicredit dialect constants.

use chrono::NaiveDate;

// =============================================================================
// CAMT.053 constants
// =============================================================================

/// Balance type code: opening booked.
pub const BALANCE_TYPE_OPENING: &str = "OPBD";
/// Balance type code: closing booked.
pub const BALANCE_TYPE_CLOSING: &str = "CLBD";

/// Credit indicator (incoming funds).
pub const CREDIT_INDICATOR: &str = "CRDT";
/// Debit indicator (outgoing funds).
pub const DEBIT_INDICATOR: &str = "DBIT";

// =============================================================================
// Unicredit dialect constants
// =============================================================================
//
// The ATM marker and the card-merchant pattern are Hungarian-language
// literals taken verbatim from Unicredit's exports. They encode undocumented
// vendor behavior and must stay byte-identical for output compatibility.

/// Remittance memo prefix marking an ATM withdrawal.
pub const ATM_MEMO_PREFIX: &str = "ATM kifizetés";

/// `AddtlTxInf` prefix marking a card-network settlement entry.
pub const CARD_SETTLEMENT_PREFIX: &str = "+CMS CLT";

/// Merchant-extraction pattern for card-settlement memos, of the shape
/// `Vásárlás(<date>)  Card:<16 digits>  <merchant> <amount>,00 HUF`.
/// Capture group 1 is the merchant name.
pub const CARD_PAYEE_PATTERN: &str =
    r"^V.s.rl.s\(\d{4}\.\d{2}\.\d{2}\)  +Card:\d{16}  +(.*) [0-9.]+,00 HUF$";

/// Bank id used when the statement carries no servicer BIC.
pub const FALLBACK_BANK_ID: &str = "UNICREDIT";

/// Currency used when the account carries no `Ccy` element.
pub const FALLBACK_CURRENCY: &str = "HUF";

// =============================================================================
// Data structures
// =============================================================================

/// Monetary amount in minor units (fillér, cents).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amount {
    /// Value in minor units; signed.
    pub value: i64,
    /// Currency code (HUF, EUR, ...).
    pub currency: String,
}

impl Amount {
    /// Creates a new amount.
    pub fn new(value: i64, currency: impl Into<String>) -> Self {
        Self {
            value,
            currency: currency.into(),
        }
    }

    /// Returns the value in major units.
    pub fn as_float(&self) -> f64 {
        self.value as f64 / 100.0
    }
}

/// Transaction type vocabulary of the normalized output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    /// Generic credit.
    Credit,
    /// Generic debit.
    Debit,
    /// ATM withdrawal.
    Atm,
}

impl TransactionType {
    /// Returns the wire spelling of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Credit => "CREDIT",
            TransactionType::Debit => "DEBIT",
            TransactionType::Atm => "ATM",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized transaction, built from a single `Ntry` node.
///
/// Immutable after construction; owned by the [`Statement`] that contains it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Transaction id from `Refs/TxId`, when the node carries non-empty text.
    pub txid: Option<String>,
    /// Value date (`ValDt`).
    pub date: Option<NaiveDate>,
    /// User-visible booking date (`BookgDt`).
    pub date_user: Option<NaiveDate>,
    /// Signed amount: credit positive, debit negative.
    pub amount: Amount,
    /// Transaction type.
    pub trntype: TransactionType,
    /// Counterparty name; best-effort, may be unset.
    pub payee: Option<String>,
    /// Counterparty IBAN; never set for ATM withdrawals.
    pub peer_account: Option<String>,
    /// Free-text memo: remittance text plus the additional transaction info.
    pub memo: String,
    /// Bank reference number (`AcctSvcrRef`); doubles as the unique
    /// transaction identifier when present.
    pub refnum: Option<String>,
}

/// Normalized bank statement, the sole artifact handed to an output writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// Bank identifier (servicer BIC, or [`FALLBACK_BANK_ID`]).
    pub bank_id: String,
    /// Normalized account id of the selected statement block.
    pub account_id: String,
    /// Statement currency.
    pub currency: String,
    /// Opening booked balance (`OPBD`); mandatory.
    pub start_balance: Amount,
    /// Opening balance date.
    pub start_date: Option<NaiveDate>,
    /// Closing booked balance (`CLBD`), when present.
    pub end_balance: Option<Amount>,
    /// Closing balance date, when present.
    pub end_date: Option<NaiveDate>,
    /// Transactions in document order.
    pub transactions: Vec<Transaction>,
}
