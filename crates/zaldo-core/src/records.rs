//! Records fetched from the data store.
//!
//! These mirror the `loans`, `payments`, `investor_payouts`, `profiles` and
//! `clients` tables. The engine only reads them. Dates stay as the raw text
//! the store returned so that one malformed value degrades a single
//! computation instead of failing deserialization of the whole book.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::types::{parse_ledger_date, parse_ledger_timestamp, Money, Percent};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Active,
    /// In arrears ("mora")
    Defaulted,
    Paid,
    Completed,
}

impl LoanStatus {
    /// Capital still lent out: active and defaulted loans.
    pub fn is_outstanding(self) -> bool {
        matches!(self, LoanStatus::Active | LoanStatus::Defaulted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Interest,
    /// Late-payment penalty. Split like interest.
    Fee,
    Capital,
    Principal,
}

impl PaymentType {
    /// Interest and fees are revenue subject to the admin split; capital and
    /// principal are returned capital.
    pub fn is_revenue(self) -> bool {
        matches!(self, PaymentType::Interest | PaymentType::Fee)
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: String,
    pub client_id: String,
    pub investor_id: String,
    /// Principal
    pub amount: Money,
    /// Monthly interest, whole percent
    pub interest_rate: Percent,
    /// Share of interest kept by the operator; absent on older rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_fee_percent: Option<Percent>,
    #[serde(default)]
    pub start_date: String,
    pub status: LoanStatus,
    /// Day of month interest falls due
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cutoff_day: Option<u32>,
    /// Date through which interest has been paid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_until: Option<String>,
}

impl Loan {
    pub fn start(&self) -> Option<NaiveDate> {
        parse_ledger_date(&self.start_date)
    }

    pub fn started_at(&self) -> Option<NaiveDateTime> {
        parse_ledger_timestamp(&self.start_date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub loan_id: String,
    pub amount: Money,
    #[serde(default)]
    pub payment_date: String,
    pub payment_type: PaymentType,
    #[serde(default)]
    pub late_fee_waived: bool,
}

impl Payment {
    pub fn date(&self) -> Option<NaiveDate> {
        parse_ledger_date(&self.payment_date)
    }

    pub fn paid_at(&self) -> Option<NaiveDateTime> {
        parse_ledger_timestamp(&self.payment_date)
    }
}

/// Cash handed to an investor ("retiro").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payout {
    pub id: String,
    pub investor_id: String,
    pub amount: Money,
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Payout {
    pub fn paid_at(&self) -> Option<NaiveDateTime> {
        parse_ledger_timestamp(&self.date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investor {
    pub id: String,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
}

/// Everything fetched for one computation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerBook {
    #[serde(default)]
    pub investors: Vec<Investor>,
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub loans: Vec<Loan>,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub payouts: Vec<Payout>,
}

impl LedgerBook {
    pub fn investor(&self, id: &str) -> Option<&Investor> {
        self.investors.iter().find(|i| i.id == id)
    }

    pub fn client(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    pub fn loan(&self, id: &str) -> Option<&Loan> {
        self.loans.iter().find(|l| l.id == id)
    }
}
