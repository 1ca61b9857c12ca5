use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::error::ZaldoError;
use crate::maintenance::duplicates::{find_duplicate_payments, plan_duplicate_removal, DuplicateGroup};
use crate::records::{LedgerBook, LoanStatus};
use crate::types::*;
use crate::ZaldoResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A correction to stored records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MaintenanceOp {
    DeletePayment { payment_id: String },
    SetPaidUntil { loan_id: String, paid_until: NaiveDate },
    SetLoanStatus { loan_id: String, status: LoanStatus },
}

impl fmt::Display for MaintenanceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaintenanceOp::DeletePayment { payment_id } => {
                write!(f, "delete payment {payment_id}")
            }
            MaintenanceOp::SetPaidUntil {
                loan_id,
                paid_until,
            } => write!(f, "set loan {loan_id} paid_until {paid_until}"),
            MaintenanceOp::SetLoanStatus { loan_id, status } => {
                write!(f, "set loan {loan_id} status {status:?}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    Applied,
    /// The record already had the requested state
    NoOp,
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// 1-based position in the batch
    pub sequence: usize,
    pub actor: String,
    pub operation: MaintenanceOp,
    pub outcome: AuditOutcome,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceInput {
    pub book: LedgerBook,
    #[serde(default)]
    pub operations: Vec<MaintenanceOp>,
    pub actor: String,
    /// Also delete redundant copies of double-submitted payments
    #[serde(default)]
    pub dedupe: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceReport {
    pub book: LedgerBook,
    pub audit: Vec<AuditEntry>,
    /// Duplicate groups found before any operation ran
    pub duplicates: Vec<DuplicateGroup>,
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

/// Apply corrections in order and record one audit entry per operation.
///
/// Applying the same batch to its own output changes nothing.
pub fn apply_operations(
    book: &LedgerBook,
    operations: &[MaintenanceOp],
    actor: &str,
) -> ZaldoResult<ComputationOutput<MaintenanceReport>> {
    let start = Instant::now();
    let actor = actor.trim();
    if actor.is_empty() {
        return Err(ZaldoError::InvalidInput {
            field: "actor".into(),
            reason: "Maintenance operations require an actor".into(),
        });
    }

    let duplicates = find_duplicate_payments(book);
    let mut updated = book.clone();
    let mut audit = Vec::with_capacity(operations.len());
    let mut warnings = Vec::new();

    for (i, op) in operations.iter().enumerate() {
        let (outcome, detail) = apply_one(&mut updated, op);
        let entry = AuditEntry {
            sequence: i + 1,
            actor: actor.to_string(),
            operation: op.clone(),
            outcome,
            detail,
        };
        tracing::info!(
            target: "zaldo::audit",
            sequence = entry.sequence,
            actor = %entry.actor,
            outcome = ?entry.outcome,
            "{}",
            entry.operation
        );
        if outcome == AuditOutcome::NotFound {
            warnings.push(format!("#{} {}: {}", entry.sequence, entry.operation, entry.detail));
        }
        audit.push(entry);
    }

    let applied = audit
        .iter()
        .filter(|e| e.outcome == AuditOutcome::Applied)
        .count();

    let output = MaintenanceReport {
        book: updated,
        audit,
        duplicates,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Ordered record corrections with audit trail",
        &serde_json::json!({
            "actor": actor,
            "operations": operations.len(),
            "applied": applied,
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Apply the requested operations, preceded by duplicate removal when asked.
pub fn run_maintenance(input: &MaintenanceInput) -> ZaldoResult<ComputationOutput<MaintenanceReport>> {
    if !input.dedupe {
        return apply_operations(&input.book, &input.operations, &input.actor);
    }
    let mut operations = plan_duplicate_removal(&find_duplicate_payments(&input.book));
    operations.extend(input.operations.iter().cloned());
    apply_operations(&input.book, &operations, &input.actor)
}

fn apply_one(book: &mut LedgerBook, op: &MaintenanceOp) -> (AuditOutcome, String) {
    match op {
        MaintenanceOp::DeletePayment { payment_id } => {
            match book.payments.iter().position(|p| &p.id == payment_id) {
                Some(at) => {
                    let removed = book.payments.remove(at);
                    (
                        AuditOutcome::Applied,
                        format!(
                            "removed {} {:?} payment of loan {} dated {}",
                            removed.amount,
                            removed.payment_type,
                            removed.loan_id,
                            removed.payment_date
                        ),
                    )
                }
                None => (
                    AuditOutcome::NotFound,
                    format!("payment {payment_id} is not in the book"),
                ),
            }
        }
        MaintenanceOp::SetPaidUntil {
            loan_id,
            paid_until,
        } => {
            let Some(loan) = book.loans.iter_mut().find(|l| &l.id == loan_id) else {
                return loan_not_found(loan_id);
            };
            let current = loan.paid_until.as_deref().and_then(parse_ledger_date);
            if current == Some(*paid_until) {
                return (
                    AuditOutcome::NoOp,
                    format!("paid_until already {paid_until}"),
                );
            }
            let previous = loan.paid_until.replace(paid_until.to_string());
            (
                AuditOutcome::Applied,
                format!(
                    "paid_until {} -> {paid_until}",
                    previous.as_deref().unwrap_or("unset")
                ),
            )
        }
        MaintenanceOp::SetLoanStatus { loan_id, status } => {
            let Some(loan) = book.loans.iter_mut().find(|l| &l.id == loan_id) else {
                return loan_not_found(loan_id);
            };
            if loan.status == *status {
                return (AuditOutcome::NoOp, format!("status already {status:?}"));
            }
            let previous = std::mem::replace(&mut loan.status, *status);
            (
                AuditOutcome::Applied,
                format!("status {previous:?} -> {status:?}"),
            )
        }
    }
}

fn loan_not_found(loan_id: &str) -> (AuditOutcome, String) {
    (
        AuditOutcome::NotFound,
        format!("loan {loan_id} is not in the book"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::test_support::*;
    use rust_decimal_macros::dec;

    fn book() -> LedgerBook {
        let mut b = book_with_investors(&["ana"]);
        b.loans = vec![loan("L1", "ana", dec!(1_000_000), "2025-01-07")];
        b.payments = vec![
            payment("P1", "L1", dec!(100_000), PaymentType::Interest, "2025-12-07"),
            payment("P2", "L1", dec!(100_000), PaymentType::Interest, "2025-12-07"),
        ];
        b
    }

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn corrections() -> Vec<MaintenanceOp> {
        vec![
            MaintenanceOp::DeletePayment {
                payment_id: "P2".into(),
            },
            MaintenanceOp::SetPaidUntil {
                loan_id: "L1".into(),
                paid_until: d("2026-01-07"),
            },
            MaintenanceOp::SetLoanStatus {
                loan_id: "L1".into(),
                status: LoanStatus::Defaulted,
            },
        ]
    }

    #[test]
    fn test_operations_applied_in_order() {
        let out = apply_operations(&book(), &corrections(), "ops@zaldo.co").unwrap();
        let r = &out.result;
        assert_eq!(r.book.payments.len(), 1);
        assert_eq!(r.book.payments[0].id, "P1");
        assert_eq!(r.book.loans[0].paid_until.as_deref(), Some("2026-01-07"));
        assert_eq!(r.book.loans[0].status, LoanStatus::Defaulted);
        assert!(r.audit.iter().all(|e| e.outcome == AuditOutcome::Applied));
        assert_eq!(r.audit[2].sequence, 3);
        assert_eq!(r.audit[2].detail, "status Active -> Defaulted");
        assert_eq!(r.duplicates.len(), 1);
    }

    #[test]
    fn test_reapplying_changes_nothing() {
        let first = apply_operations(&book(), &corrections(), "ops").unwrap();
        let second = apply_operations(&first.result.book, &corrections(), "ops").unwrap();
        assert_eq!(second.result.book, first.result.book);
        let outcomes: Vec<AuditOutcome> =
            second.result.audit.iter().map(|e| e.outcome).collect();
        assert_eq!(
            outcomes,
            vec![AuditOutcome::NotFound, AuditOutcome::NoOp, AuditOutcome::NoOp]
        );
    }

    #[test]
    fn test_not_found_warns() {
        let ops = vec![MaintenanceOp::SetLoanStatus {
            loan_id: "L404".into(),
            status: LoanStatus::Paid,
        }];
        let out = apply_operations(&book(), &ops, "ops").unwrap();
        assert_eq!(out.result.audit[0].outcome, AuditOutcome::NotFound);
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.result.book, book());
    }

    #[test]
    fn test_blank_actor_rejected() {
        match apply_operations(&book(), &corrections(), "  ").unwrap_err() {
            ZaldoError::InvalidInput { field, .. } => assert_eq!(field, "actor"),
            other => panic!("Expected InvalidInput for actor, got: {other}"),
        }
    }

    #[test]
    fn test_dedupe_runs_first() {
        let input = MaintenanceInput {
            book: book(),
            operations: vec![],
            actor: "ops".into(),
            dedupe: true,
        };
        let out = run_maintenance(&input).unwrap();
        assert_eq!(out.result.book.payments.len(), 1);
        assert_eq!(
            out.result.audit[0].operation,
            MaintenanceOp::DeletePayment {
                payment_id: "P2".into()
            }
        );
    }

    #[test]
    fn test_op_wire_format() {
        let op: MaintenanceOp = serde_json::from_str(
            r#"{"op":"set_paid_until","loan_id":"L1","paid_until":"2026-01-07"}"#,
        )
        .unwrap();
        assert_eq!(
            op,
            MaintenanceOp::SetPaidUntil {
                loan_id: "L1".into(),
                paid_until: d("2026-01-07"),
            }
        );
    }
}
