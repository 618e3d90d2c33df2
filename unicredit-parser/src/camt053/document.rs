//! Typed tree of a CAMT.053.001.02 document.
//!
//! The models cover exactly the paths the Unicredit dialect reads; every
//! other element in the file is ignored during deserialization. No schema
//! validation happens here, only well-formedness: malformed XML surfaces as
//! [`Error::Xml`](crate::error::Error::Xml).

use std::io::Read;

use serde::Deserialize;

use crate::error::Result;

/// Root `<Document>` of a bank-to-customer statement message.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename = "Document")]
pub struct Camt053Document {
    /// `<BkToCstmrStmt>`
    #[serde(rename = "BkToCstmrStmt")]
    pub bank_to_customer: BankToCustomerStatement,
}

impl Camt053Document {
    /// Parses a CAMT.053 document from any source implementing `Read`.
    ///
    /// The reader is consumed before parsing starts; the caller's file
    /// handle can be dropped as soon as this returns.
    pub fn from_read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Self::parse(&content)
    }

    /// Parses a CAMT.053 document from a string.
    pub fn parse(content: &str) -> Result<Self> {
        let document = quick_xml::de::from_str(content)?;
        Ok(document)
    }

    /// All statement blocks in the document, one per account, in
    /// document order.
    pub fn statements(&self) -> &[StatementBlock] {
        &self.bank_to_customer.statements
    }
}

/// `<BkToCstmrStmt>` - the statement container.
#[derive(Debug, Clone, Deserialize)]
pub struct BankToCustomerStatement {
    /// All `<Stmt>` blocks; a file may report several accounts.
    #[serde(rename = "Stmt", default)]
    pub statements: Vec<StatementBlock>,
}

/// One account's reporting period: `<Stmt>`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatementBlock {
    /// `<Acct>`
    #[serde(rename = "Acct")]
    pub account: CashAccount,

    /// All `<Bal>` records (opening, closing and others).
    #[serde(rename = "Bal", default)]
    pub balances: Vec<CashBalance>,

    /// All `<Ntry>` transaction entries, in document order.
    #[serde(rename = "Ntry", default)]
    pub entries: Vec<ReportEntry>,
}

/// `<Acct>` - the reported account.
#[derive(Debug, Clone, Deserialize)]
pub struct CashAccount {
    /// `<Id>`
    #[serde(rename = "Id")]
    pub id: AccountIdChoice,

    /// `<Ccy>`
    #[serde(rename = "Ccy")]
    pub currency: Option<String>,

    /// `<Svcr>` - the servicing institution.
    #[serde(rename = "Svcr")]
    pub servicer: Option<Servicer>,
}

/// `<Acct>/<Id>` - identification choice.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountIdChoice {
    /// `<Othr>` - Unicredit exports put the account number here.
    #[serde(rename = "Othr")]
    pub other: Option<OtherAccountId>,
}

/// `<Othr>` inside an account id.
#[derive(Debug, Clone, Deserialize)]
pub struct OtherAccountId {
    /// `<Id>`
    #[serde(rename = "Id")]
    pub id: String,
}

/// `<Svcr>`
#[derive(Debug, Clone, Deserialize)]
pub struct Servicer {
    /// `<FinInstnId>`
    #[serde(rename = "FinInstnId")]
    pub institution: FinancialInstitutionId,
}

/// `<FinInstnId>`
#[derive(Debug, Clone, Deserialize)]
pub struct FinancialInstitutionId {
    /// `<BIC>`
    #[serde(rename = "BIC")]
    pub bic: Option<String>,
}

/// `<Bal>` - one balance record.
#[derive(Debug, Clone, Deserialize)]
pub struct CashBalance {
    /// `<Tp>`
    #[serde(rename = "Tp")]
    pub balance_type: BalanceTypeChoice,

    /// `<Amt Ccy="HUF">...</Amt>`
    #[serde(rename = "Amt")]
    pub amount: AmountNode,

    /// `<Dt>` - date or timestamp of the balance.
    #[serde(rename = "Dt")]
    pub date: Option<DateChoice>,
}

/// `<Tp>` of a balance.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceTypeChoice {
    /// `<CdOrPrtry>`
    #[serde(rename = "CdOrPrtry")]
    pub code_or_proprietary: CodeOrProprietary,
}

/// `<CdOrPrtry>`
#[derive(Debug, Clone, Deserialize)]
pub struct CodeOrProprietary {
    /// `<Cd>` - OPBD, CLBD, ...
    #[serde(rename = "Cd")]
    pub code: Option<String>,
}

/// `<Ntry>` - one transaction entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportEntry {
    /// `<Amt Ccy="HUF">...</Amt>` - unsigned magnitude.
    #[serde(rename = "Amt")]
    pub amount: AmountNode,

    /// `<CdtDbtInd>` - CRDT or DBIT.
    #[serde(rename = "CdtDbtInd")]
    pub credit_debit: String,

    /// `<BookgDt>`
    #[serde(rename = "BookgDt")]
    pub booking_date: Option<DateChoice>,

    /// `<ValDt>`
    #[serde(rename = "ValDt")]
    pub value_date: Option<DateChoice>,

    /// `<AcctSvcrRef>` - the bank reference number.
    #[serde(rename = "AcctSvcrRef")]
    pub servicer_reference: Option<String>,

    /// `<NtryDtls>`
    #[serde(rename = "NtryDtls")]
    pub details: Option<EntryDetails>,
}

/// `<NtryDtls>`
#[derive(Debug, Clone, Deserialize)]
pub struct EntryDetails {
    /// All `<TxDtls>`; the dialect only ever populates the first.
    #[serde(rename = "TxDtls", default)]
    pub transactions: Vec<TransactionDetails>,
}

/// `<TxDtls>`
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionDetails {
    /// `<Refs>`
    #[serde(rename = "Refs")]
    pub references: Option<References>,

    /// `<RltdPties>`
    #[serde(rename = "RltdPties")]
    pub related_parties: Option<RelatedParties>,

    /// `<RmtInf>`
    #[serde(rename = "RmtInf")]
    pub remittance: Option<RemittanceInfo>,

    /// `<AddtlTxInf>` - mandatory in the Unicredit dialect; anchors the
    /// card-transaction heuristic.
    #[serde(rename = "AddtlTxInf")]
    pub additional_info: Option<String>,
}

/// `<Refs>`
#[derive(Debug, Clone, Deserialize)]
pub struct References {
    /// `<TxId>`
    #[serde(rename = "TxId")]
    pub transaction_id: Option<String>,
}

/// `<RltdPties>` - counterparties of the entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RelatedParties {
    /// `<Dbtr>`
    #[serde(rename = "Dbtr")]
    pub debtor: Option<Party>,

    /// `<DbtrAcct>`
    #[serde(rename = "DbtrAcct")]
    pub debtor_account: Option<PartyAccount>,

    /// `<Cdtr>`
    #[serde(rename = "Cdtr")]
    pub creditor: Option<Party>,

    /// `<CdtrAcct>`
    #[serde(rename = "CdtrAcct")]
    pub creditor_account: Option<PartyAccount>,
}

/// `<Dbtr>` / `<Cdtr>`
#[derive(Debug, Clone, Deserialize)]
pub struct Party {
    /// `<Nm>`
    #[serde(rename = "Nm")]
    pub name: Option<String>,
}

/// `<DbtrAcct>` / `<CdtrAcct>`
#[derive(Debug, Clone, Deserialize)]
pub struct PartyAccount {
    /// `<Id>`
    #[serde(rename = "Id")]
    pub id: Option<PartyAccountId>,
}

/// Account id of a related party.
#[derive(Debug, Clone, Deserialize)]
pub struct PartyAccountId {
    /// `<IBAN>`
    #[serde(rename = "IBAN")]
    pub iban: Option<String>,
}

/// `<RmtInf>`
#[derive(Debug, Clone, Deserialize)]
pub struct RemittanceInfo {
    /// All `<Ustrd>` free-text lines; the dialect reads the first.
    #[serde(rename = "Ustrd", default)]
    pub unstructured: Vec<String>,
}

/// A node carrying either a calendar date or a full timestamp.
#[derive(Debug, Clone, Deserialize)]
pub struct DateChoice {
    /// `<Dt>` - `YYYY-MM-DD`.
    #[serde(rename = "Dt")]
    pub date: Option<String>,

    /// `<DtTm>` - `YYYY-MM-DDTHH:MM:SS`.
    #[serde(rename = "DtTm")]
    pub date_time: Option<String>,
}

/// An amount with its currency attribute.
#[derive(Debug, Clone, Deserialize)]
pub struct AmountNode {
    /// `Ccy` attribute.
    #[serde(rename = "@Ccy")]
    pub currency: Option<String>,

    /// Element text, a decimal number.
    #[serde(rename = "$text")]
    pub value: String,
}
