use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::anomaly::{LedgerAnomaly, RecordKind};
use crate::policy::{FeeRate, LedgerPolicy};
use crate::records::{LedgerBook, Loan, Payment, Payout};

/// Which slice of the book a computation covers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum Scope {
    #[default]
    Portfolio,
    Investor { investor_id: String },
}

/// A payment joined to its loan and the fee that loan resolves to.
#[derive(Debug, Clone, Copy)]
pub struct ScopedPayment<'a> {
    pub payment: &'a Payment,
    pub loan: &'a Loan,
    pub fee: FeeRate,
}

/// Records that belong to a scope, plus what was wrong with the rest.
#[derive(Debug, Clone, Default)]
pub struct CollectedEvents<'a> {
    pub loans: Vec<&'a Loan>,
    pub payments: Vec<ScopedPayment<'a>>,
    pub payouts: Vec<&'a Payout>,
    pub anomalies: Vec<LedgerAnomaly>,
}

/// Gather the loans, payments and payouts of one scope.
///
/// Foreign keys are resolved against the book. Investor scope keeps only
/// records whose investor exists in the directory; portfolio scope keeps
/// records with an unknown investor but flags each one.
pub fn collect<'a>(
    book: &'a LedgerBook,
    scope: &Scope,
    policy: &LedgerPolicy,
) -> CollectedEvents<'a> {
    let known_investors: HashSet<&str> = book.investors.iter().map(|i| i.id.as_str()).collect();
    let loans_by_id: HashMap<&str, &Loan> =
        book.loans.iter().map(|l| (l.id.as_str(), l)).collect();

    let in_scope = |investor_id: &str| match scope {
        Scope::Portfolio => true,
        Scope::Investor { investor_id: wanted } => investor_id == wanted.as_str(),
    };

    let mut out = CollectedEvents::default();

    for loan in &book.loans {
        if !in_scope(&loan.investor_id) {
            continue;
        }
        if let FeeRate::Replaced { recorded, percent } = policy.fee_percent_for(loan) {
            out.anomalies.push(LedgerAnomaly::FeeRateOutOfRange {
                loan_id: loan.id.clone(),
                recorded,
                applied: percent,
            });
        }
        let investor_known = known_investors.contains(loan.investor_id.as_str());
        if !investor_known {
            out.anomalies.push(LedgerAnomaly::UnresolvedInvestor {
                record: RecordKind::Loan,
                record_id: loan.id.clone(),
                investor_id: loan.investor_id.clone(),
            });
            if matches!(scope, Scope::Investor { .. }) {
                continue;
            }
        }
        if loan.amount <= Decimal::ZERO {
            out.anomalies.push(LedgerAnomaly::NonPositiveAmount {
                record: RecordKind::Loan,
                record_id: loan.id.clone(),
                amount: loan.amount,
            });
            continue;
        }
        out.loans.push(loan);
    }

    for payment in &book.payments {
        let Some(loan) = loans_by_id.get(payment.loan_id.as_str()).copied() else {
            // Only the portfolio view can tell the payment is orphaned; an
            // investor view cannot know it was theirs.
            if matches!(scope, Scope::Portfolio) {
                out.anomalies.push(LedgerAnomaly::UnresolvedLoan {
                    payment_id: payment.id.clone(),
                    loan_id: payment.loan_id.clone(),
                });
            }
            continue;
        };
        if !in_scope(&loan.investor_id) {
            continue;
        }
        if matches!(scope, Scope::Investor { .. })
            && !known_investors.contains(loan.investor_id.as_str())
        {
            continue;
        }
        if payment.amount <= Decimal::ZERO {
            out.anomalies.push(LedgerAnomaly::NonPositiveAmount {
                record: RecordKind::Payment,
                record_id: payment.id.clone(),
                amount: payment.amount,
            });
            continue;
        }
        out.payments.push(ScopedPayment {
            payment,
            loan,
            fee: policy.fee_percent_for(loan),
        });
    }

    for payout in &book.payouts {
        if !in_scope(&payout.investor_id) {
            continue;
        }
        if !known_investors.contains(payout.investor_id.as_str()) {
            out.anomalies.push(LedgerAnomaly::UnresolvedInvestor {
                record: RecordKind::Payout,
                record_id: payout.id.clone(),
                investor_id: payout.investor_id.clone(),
            });
            if matches!(scope, Scope::Investor { .. }) {
                continue;
            }
        }
        if payout.amount <= Decimal::ZERO {
            out.anomalies.push(LedgerAnomaly::NonPositiveAmount {
                record: RecordKind::Payout,
                record_id: payout.id.clone(),
                amount: payout.amount,
            });
            continue;
        }
        out.payouts.push(payout);
    }

    tracing::debug!(
        ?scope,
        loans = out.loans.len(),
        payments = out.payments.len(),
        payouts = out.payouts.len(),
        anomalies = out.anomalies.len(),
        "collected ledger events"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::test_support::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_investor_scope_filters_by_owner() {
        let mut book = book_with_investors(&["ana", "bea"]);
        book.loans.push(loan("L1", "ana", dec!(100), "2025-01-01"));
        book.loans.push(loan("L2", "bea", dec!(200), "2025-01-01"));
        book.payments.push(payment("P1", "L1", dec!(10), PaymentType::Interest, "2025-02-01"));
        book.payments.push(payment("P2", "L2", dec!(20), PaymentType::Interest, "2025-02-01"));
        book.payouts.push(payout("W1", "bea", dec!(5), "2025-03-01"));

        let ev = collect(&book, &investor_scope("ana"), &LedgerPolicy::default());
        assert_eq!(ev.loans.len(), 1);
        assert_eq!(ev.loans[0].id, "L1");
        assert_eq!(ev.payments.len(), 1);
        assert_eq!(ev.payments[0].payment.id, "P1");
        assert!(ev.payouts.is_empty());
        assert!(ev.anomalies.is_empty());
    }

    #[test]
    fn test_orphan_payment_flagged_in_portfolio_only() {
        let mut book = book_with_investors(&["ana"]);
        book.payments.push(payment("P1", "ghost", dec!(10), PaymentType::Interest, "2025-02-01"));

        let portfolio = collect(&book, &Scope::Portfolio, &LedgerPolicy::default());
        assert!(portfolio.payments.is_empty());
        assert_eq!(
            portfolio.anomalies,
            vec![LedgerAnomaly::UnresolvedLoan {
                payment_id: "P1".into(),
                loan_id: "ghost".into()
            }]
        );

        let investor = collect(&book, &investor_scope("ana"), &LedgerPolicy::default());
        assert!(investor.anomalies.is_empty());
    }

    #[test]
    fn test_unknown_investor_kept_in_portfolio_but_flagged() {
        let mut book = book_with_investors(&["ana"]);
        book.loans.push(loan("L1", "nobody", dec!(100), "2025-01-01"));

        let portfolio = collect(&book, &Scope::Portfolio, &LedgerPolicy::default());
        assert_eq!(portfolio.loans.len(), 1);
        assert_eq!(portfolio.anomalies.len(), 1);

        let investor = collect(&book, &investor_scope("nobody"), &LedgerPolicy::default());
        assert!(investor.loans.is_empty());
        assert_eq!(investor.anomalies.len(), 1);
    }

    #[test]
    fn test_non_positive_amounts_excluded() {
        let mut book = book_with_investors(&["ana"]);
        book.loans.push(loan("L1", "ana", dec!(0), "2025-01-01"));
        book.loans.push(loan("L2", "ana", dec!(50), "2025-01-01"));
        book.payments.push(payment("P1", "L2", dec!(-3), PaymentType::Capital, "2025-02-01"));
        book.payouts.push(payout("W1", "ana", dec!(0), "2025-03-01"));

        let ev = collect(&book, &Scope::Portfolio, &LedgerPolicy::default());
        assert_eq!(ev.loans.len(), 1);
        assert!(ev.payments.is_empty());
        assert!(ev.payouts.is_empty());
        assert_eq!(ev.anomalies.len(), 3);
    }

    #[test]
    fn test_out_of_range_fee_reported_once_per_loan() {
        let mut book = book_with_investors(&["ana"]);
        let mut l = loan("L1", "ana", dec!(100), "2025-01-01");
        l.admin_fee_percent = Some(dec!(250));
        book.loans.push(l);
        book.payments.push(payment("P1", "L1", dec!(10), PaymentType::Interest, "2025-02-01"));
        book.payments.push(payment("P2", "L1", dec!(10), PaymentType::Interest, "2025-03-01"));

        let ev = collect(&book, &Scope::Portfolio, &LedgerPolicy::default());
        assert_eq!(ev.anomalies.len(), 1);
        assert!(ev.payments.iter().all(|p| p.fee.percent() == dec!(40)));
    }
}
