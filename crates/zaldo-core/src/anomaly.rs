use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Loan,
    Payment,
    Payout,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Loan => write!(f, "loan"),
            RecordKind::Payment => write!(f, "payment"),
            RecordKind::Payout => write!(f, "payout"),
        }
    }
}

/// A record problem that degrades a result without aborting it.
///
/// A missing admin fee is not an anomaly: the policy default applies
/// silently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerAnomaly {
    /// Recorded fee outside 0-100; the policy default was used instead.
    FeeRateOutOfRange {
        loan_id: String,
        recorded: Percent,
        applied: Percent,
    },
    /// Date missing or unparseable. The record is left out of anything that
    /// needs its date but still counts in plain sums.
    MalformedTimestamp {
        record: RecordKind,
        record_id: String,
        raw: String,
    },
    /// Payment whose loan is not in the book. Left out of every sum.
    UnresolvedLoan { payment_id: String, loan_id: String },
    /// Loan or payout whose investor is not in the book. Left out of every
    /// per-investor figure; still counted in portfolio totals.
    UnresolvedInvestor {
        record: RecordKind,
        record_id: String,
        investor_id: String,
    },
    /// Zero or negative amount. Left out of every sum.
    NonPositiveAmount {
        record: RecordKind,
        record_id: String,
        amount: Money,
    },
    /// Cutoff day outside 1-31. The loan is left out of due-date schedules.
    InvalidCutoffDay { loan_id: String, cutoff_day: u32 },
}

impl fmt::Display for LedgerAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerAnomaly::FeeRateOutOfRange {
                loan_id,
                recorded,
                applied,
            } => write!(
                f,
                "loan {loan_id}: admin fee {recorded}% is outside 0-100, applied {applied}%"
            ),
            LedgerAnomaly::MalformedTimestamp {
                record,
                record_id,
                raw,
            } => write!(
                f,
                "{record} {record_id}: unreadable date '{raw}', excluded from dated calculations"
            ),
            LedgerAnomaly::UnresolvedLoan {
                payment_id,
                loan_id,
            } => write!(
                f,
                "payment {payment_id}: loan {loan_id} not found, payment excluded"
            ),
            LedgerAnomaly::UnresolvedInvestor {
                record,
                record_id,
                investor_id,
            } => write!(
                f,
                "{record} {record_id}: investor {investor_id} not found, excluded from investor figures"
            ),
            LedgerAnomaly::NonPositiveAmount {
                record,
                record_id,
                amount,
            } => write!(
                f,
                "{record} {record_id}: amount {amount} is not positive, record excluded"
            ),
            LedgerAnomaly::InvalidCutoffDay {
                loan_id,
                cutoff_day,
            } => write!(
                f,
                "loan {loan_id}: cutoff day {cutoff_day} is outside 1-31, no due date computed"
            ),
        }
    }
}

/// Log each anomaly and render them for the output envelope.
pub(crate) fn to_warnings(anomalies: &[LedgerAnomaly]) -> Vec<String> {
    anomalies
        .iter()
        .map(|a| {
            tracing::warn!(anomaly = ?a, "ledger anomaly");
            a.to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_display_unresolved_loan() {
        let a = LedgerAnomaly::UnresolvedLoan {
            payment_id: "P9".into(),
            loan_id: "L404".into(),
        };
        assert_eq!(
            a.to_string(),
            "payment P9: loan L404 not found, payment excluded"
        );
    }

    #[test]
    fn test_serialized_tag() {
        let a = LedgerAnomaly::NonPositiveAmount {
            record: RecordKind::Payout,
            record_id: "W1".into(),
            amount: dec!(-5),
        };
        let v = serde_json::to_value(&a).unwrap();
        assert_eq!(v["kind"], "non_positive_amount");
        assert_eq!(v["record"], "payout");
    }

    #[test]
    fn test_to_warnings_keeps_order() {
        let anomalies = vec![
            LedgerAnomaly::UnresolvedLoan {
                payment_id: "P1".into(),
                loan_id: "X".into(),
            },
            LedgerAnomaly::MalformedTimestamp {
                record: RecordKind::Loan,
                record_id: "L1".into(),
                raw: "".into(),
            },
        ];
        let w = to_warnings(&anomalies);
        assert_eq!(w.len(), 2);
        assert!(w[0].starts_with("payment P1"));
        assert!(w[1].starts_with("loan L1"));
    }
}
