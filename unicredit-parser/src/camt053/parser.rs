//! Unicredit-specific statement extraction: account selection, balances and
//! entry normalization.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::camt053::document::{
    Camt053Document, CashBalance, DateChoice, ReportEntry, StatementBlock,
};
use crate::error::{Error, Result};
use crate::types::{
    Amount, Statement, Transaction, TransactionType, ATM_MEMO_PREFIX, BALANCE_TYPE_CLOSING,
    BALANCE_TYPE_OPENING, CARD_PAYEE_PATTERN, CARD_SETTLEMENT_PREFIX, DEBIT_INDICATOR,
    FALLBACK_BANK_ID, FALLBACK_CURRENCY,
};

/// Strips separator characters from an account id and truncates it to
/// 23 characters.
///
/// The trailing characters beyond position 23 are the IBAN national check
/// digit padding, which varies between exports of the same logical account:
///
/// ```text
/// IBAN fields: HUkk bbbs sssx cccc cccc cccc cccx
/// b = national bank code
/// s = branch code
/// c = account number
/// x = national check digit
/// ```
///
/// Idempotent: applying it twice yields the same string. The same rule is
/// applied to the configured account id and to every id found in the file
/// before comparison.
pub fn normalize_account_id(account_id: &str) -> String {
    account_id
        .chars()
        .filter(|c| c.is_alphanumeric())
        .take(23)
        .collect()
}

/// One balance record of a statement block.
///
/// Every `<Bal>` is kept regardless of its code; the assembler only consumes
/// `OPBD` and `CLBD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceRecord {
    /// Balance type code (`OPBD`, `CLBD`, ...).
    pub code: String,
    /// Amount in minor units.
    pub amount: i64,
    /// Balance date, when the node carries one.
    pub date: Option<NaiveDate>,
}

/// Parser for Unicredit's CAMT.053 exports.
///
/// Holds only the configured account id; every `parse` call is an
/// independent, self-contained conversion.
#[derive(Debug, Clone, Default)]
pub struct UnicreditParser {
    account_id: Option<String>,
}

impl UnicreditParser {
    /// Creates a parser selecting the given account.
    ///
    /// `account_id` may be `None` when the file is known to contain a single
    /// statement block. Separators (dashes) in the configured id are allowed;
    /// the id is normalized here.
    pub fn new(account_id: Option<&str>) -> Self {
        Self {
            account_id: account_id.map(normalize_account_id),
        }
    }

    /// Converts the CAMT.053 file at `path` into a normalized statement.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Statement> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        self.from_read(&mut reader)
    }

    /// Converts a CAMT.053 export read from `reader`.
    pub fn from_read<R: Read>(&self, reader: &mut R) -> Result<Statement> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        self.parse(&content)
    }

    /// Converts a CAMT.053 export into a normalized [`Statement`].
    pub fn parse(&self, content: &str) -> Result<Statement> {
        let document = Camt053Document::parse(content)?;
        let stmt = pick_matching_statement(document.statements(), self.account_id.as_deref())?;

        let bank_id = stmt
            .account
            .servicer
            .as_ref()
            .and_then(|s| s.institution.bic.as_deref())
            .unwrap_or(FALLBACK_BANK_ID);
        let account_id = normalize_account_id(raw_account_id(stmt)?);
        let currency = stmt
            .account
            .currency
            .as_deref()
            .unwrap_or(FALLBACK_CURRENCY);

        let balances = balance_data(&stmt.balances)?;
        let opening = balances
            .iter()
            .find(|b| b.code == BALANCE_TYPE_OPENING)
            .ok_or(Error::MissingField("Bal[OPBD]"))?;
        let closing = balances.iter().find(|b| b.code == BALANCE_TYPE_CLOSING);

        let transactions = stmt
            .entries
            .iter()
            .map(normalize_entry)
            .collect::<Result<Vec<_>>>()?;

        Ok(Statement {
            bank_id: bank_id.to_string(),
            account_id,
            currency: currency.to_string(),
            start_balance: Amount::new(opening.amount, currency),
            start_date: opening.date,
            end_balance: closing.map(|b| Amount::new(b.amount, currency)),
            end_date: closing.and_then(|b| b.date),
            transactions,
        })
    }
}

/// Picks the statement block matching the configured account id.
///
/// Without a configured id a sole block is selected; several blocks make the
/// selection ambiguous. Matching is case-sensitive exact equality on
/// normalized ids.
fn pick_matching_statement<'a>(
    stmts: &'a [StatementBlock],
    account_id: Option<&str>,
) -> Result<&'a StatementBlock> {
    if stmts.is_empty() {
        return Err(Error::NoStatement);
    }

    // Normalized id per block, in document order; the order is significant
    // for the error messages below.
    let mut by_account = Vec::with_capacity(stmts.len());
    for stmt in stmts {
        by_account.push((normalize_account_id(raw_account_id(stmt)?), stmt));
    }

    let Some(account_id) = account_id else {
        if stmts.len() == 1 {
            return Ok(&stmts[0]);
        }
        return Err(Error::AmbiguousAccount(join_ids(&by_account)));
    };

    let requested = normalize_account_id(account_id);
    by_account
        .iter()
        .find(|(id, _)| *id == requested)
        .map(|(_, stmt)| *stmt)
        .ok_or_else(|| Error::UnknownAccount {
            requested,
            available: join_ids(&by_account),
        })
}

fn join_ids(by_account: &[(String, &StatementBlock)]) -> String {
    by_account
        .iter()
        .map(|(id, _)| id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn raw_account_id(stmt: &StatementBlock) -> Result<&str> {
    stmt.account
        .id
        .other
        .as_ref()
        .map(|o| o.id.as_str())
        .ok_or(Error::MissingField("Acct/Id/Othr/Id"))
}

/// Extracts every balance record of a statement block, in document order.
fn balance_data(balances: &[CashBalance]) -> Result<Vec<BalanceRecord>> {
    let mut records = Vec::with_capacity(balances.len());

    for bal in balances {
        let code = bal
            .balance_type
            .code_or_proprietary
            .code
            .clone()
            .unwrap_or_default();
        if code != BALANCE_TYPE_OPENING && code != BALANCE_TYPE_CLOSING {
            tracing::debug!(code = %code, "balance code unused by the statement assembler");
        }

        records.push(BalanceRecord {
            code,
            amount: parse_decimal_amount(&bal.amount.value)?,
            date: parse_date_node(bal.date.as_ref(), "Bal/Dt")?,
        });
    }

    Ok(records)
}

/// Normalizes one `Ntry` node into a [`Transaction`].
///
/// Pure function of the entry; no cross-entry state. Payee extraction is
/// best-effort: an unset payee is valid output, never an error.
fn normalize_entry(entry: &ReportEntry) -> Result<Transaction> {
    let details = entry
        .details
        .as_ref()
        .and_then(|d| d.transactions.first());
    let parties = details.and_then(|d| d.related_parties.as_ref());

    let is_debit = entry.credit_debit == DEBIT_INDICATOR;
    let magnitude = parse_decimal_amount(&entry.amount.value)?;
    let currency = entry
        .amount
        .currency
        .as_deref()
        .unwrap_or(FALLBACK_CURRENCY);
    let amount = Amount::new(if is_debit { -magnitude } else { magnitude }, currency);

    let txid = details
        .and_then(|d| d.references.as_ref())
        .and_then(|r| r.transaction_id.as_deref())
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    // First Ustrd line; the AddtlTxInf suffix is appended only after the
    // card heuristic ran against the bare remittance text.
    let memo = details
        .and_then(|d| d.remittance.as_ref())
        .and_then(|r| r.unstructured.first())
        .cloned()
        .unwrap_or_default();

    let mut payee;
    let trntype;
    let peer_account;

    if is_debit {
        payee = parties
            .and_then(|p| p.creditor.as_ref())
            .and_then(|c| c.name.clone());
        if memo.starts_with(ATM_MEMO_PREFIX) {
            trntype = TransactionType::Atm;
            peer_account = None;
        } else {
            trntype = TransactionType::Debit;
            peer_account = parties
                .and_then(|p| p.creditor_account.as_ref())
                .and_then(|a| a.id.as_ref())
                .and_then(|id| id.iban.clone());
        }
    } else {
        payee = parties
            .and_then(|p| p.debtor.as_ref())
            .and_then(|d| d.name.clone());
        trntype = TransactionType::Credit;
        peer_account = parties
            .and_then(|p| p.debtor_account.as_ref())
            .and_then(|a| a.id.as_ref())
            .and_then(|id| id.iban.clone());
    }

    let additional_info = details
        .and_then(|d| d.additional_info.as_deref())
        .ok_or(Error::MissingField("NtryDtls/TxDtls/AddtlTxInf"))?;

    // Card-network settlement entries carry no related party; the merchant
    // name is buried in the remittance text.
    if additional_info.starts_with(CARD_SETTLEMENT_PREFIX)
        && payee.as_deref().map_or(true, str::is_empty)
    {
        payee = card_payee(&memo)?;
    }

    let date = parse_date_node(entry.value_date.as_ref(), "Ntry/ValDt")?;
    let date_user = parse_date_node(entry.booking_date.as_ref(), "Ntry/BookgDt")?;
    let refnum = entry.servicer_reference.clone();

    Ok(Transaction {
        txid,
        date,
        date_user,
        amount,
        trntype,
        payee,
        peer_account,
        memo: format!("{} {}", memo, additional_info),
        refnum,
    })
}

/// Extracts the merchant name from a card-settlement memo.
fn card_payee(memo: &str) -> Result<Option<String>> {
    let pattern = Regex::new(CARD_PAYEE_PATTERN).map_err(|e| Error::Parse(e.to_string()))?;

    match pattern.captures(memo) {
        Some(caps) => Ok(caps.get(1).map(|m| m.as_str().trim().to_string())),
        None => {
            tracing::debug!(memo = %memo, "card settlement memo did not match the merchant pattern");
            Ok(None)
        }
    }
}

/// Resolves a date-bearing node (`ValDt`, `BookgDt`, `Bal/Dt`).
///
/// An absent node is a soft `None`; a node present with neither `<Dt>` nor
/// `<DtTm>` is malformed input and must not be silently defaulted. The plain
/// date wins over the timestamp when both are present.
fn parse_date_node(node: Option<&DateChoice>, context: &'static str) -> Result<Option<NaiveDate>> {
    let Some(node) = node else {
        return Ok(None);
    };

    if let Some(date) = node.date.as_deref() {
        let parsed = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| Error::Parse(format!("invalid date in {}: {}", context, date)))?;
        return Ok(Some(parsed));
    }

    let Some(date_time) = node.date_time.as_deref() else {
        return Err(Error::MissingDate(context));
    };
    let parsed = NaiveDateTime::parse_from_str(date_time.trim(), "%Y-%m-%dT%H:%M:%S")
        .map_err(|_| Error::Parse(format!("invalid timestamp in {}: {}", context, date_time)))?;
    Ok(Some(parsed.date()))
}

/// Parses a decimal amount string into minor units without going through
/// floating point. Supports "123.45", "123,45" and "123".
fn parse_decimal_amount(amount_str: &str) -> Result<i64> {
    let amount_str = amount_str.trim();

    if amount_str.is_empty() {
        return Err(Error::Parse("empty amount".to_string()));
    }

    let is_negative = amount_str.starts_with('-');
    let amount_str = amount_str.trim_start_matches('-');

    let normalized = amount_str.replace(',', ".");

    let (whole_str, frac_str) = if let Some(dot_pos) = normalized.find('.') {
        (&normalized[..dot_pos], &normalized[dot_pos + 1..])
    } else {
        (normalized.as_str(), "")
    };

    let whole: i64 = if whole_str.is_empty() {
        0
    } else {
        whole_str
            .parse()
            .map_err(|_| Error::Parse(format!("invalid whole part of amount: {}", whole_str)))?
    };

    let frac: i64 = if frac_str.is_empty() {
        0
    } else {
        let frac_padded = match frac_str.len() {
            1 => format!("{}0", frac_str),
            2 => frac_str.to_string(),
            _ => frac_str[..2].to_string(),
        };
        frac_padded
            .parse()
            .map_err(|_| Error::Parse(format!("invalid fraction part of amount: {}", frac_str)))?
    };

    let amount = whole
        .checked_mul(100)
        .and_then(|w| w.checked_add(frac))
        .ok_or_else(|| Error::Parse("amount overflow".to_string()))?;

    Ok(if is_negative { -amount } else { amount })
}
