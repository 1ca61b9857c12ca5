use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::ledger::collector::CollectedEvents;
use crate::ledger::split::split_interest;
use crate::records::{LedgerBook, LoanStatus};
use crate::types::*;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Sums over one scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerTotals {
    /// Every loan ever made in scope, any status
    pub invested_capital: Money,
    /// Active and defaulted loans
    pub active_capital: Money,
    /// Interest and late fees collected
    pub gross_profit: Money,
    pub admin_fee: Money,
    /// Investor share of gross profit
    pub net_profit: Money,
    /// Capital and principal payments
    pub capital_repaid: Money,
    pub total_withdrawn: Money,
    /// One month of interest on each defaulted loan
    pub arrears_exposure: Money,
    pub active_loans: usize,
    pub active_clients: usize,
}

/// Collection alert for a loan in arrears.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrearsAlert {
    pub loan_id: String,
    pub client_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    pub investor_id: String,
    pub principal: Money,
    pub interest_rate: Percent,
    /// Estimated amount owed: one month of interest, not a precise balance
    pub projected_amount: Money,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Fold collected events into totals.
///
/// Each loan lands in exactly one capital bucket and each payment in exactly
/// one of revenue or returned capital.
pub fn aggregate(events: &CollectedEvents<'_>) -> LedgerTotals {
    let mut totals = LedgerTotals::default();
    let mut clients: HashSet<&str> = HashSet::new();

    for loan in &events.loans {
        totals.invested_capital += loan.amount;
        if loan.status.is_outstanding() {
            totals.active_capital += loan.amount;
            totals.active_loans += 1;
            clients.insert(loan.client_id.as_str());
        }
        if loan.status == LoanStatus::Defaulted {
            totals.arrears_exposure += percent_of(loan.amount, loan.interest_rate);
        }
    }
    totals.active_clients = clients.len();

    for sp in &events.payments {
        let amount = sp.payment.amount;
        if sp.payment.payment_type.is_revenue() {
            let split = split_interest(amount, sp.fee.percent());
            totals.gross_profit += amount;
            totals.admin_fee += split.admin_share;
            totals.net_profit += split.investor_share;
        } else {
            totals.capital_repaid += amount;
        }
    }

    totals.total_withdrawn = events
        .payouts
        .iter()
        .map(|p| p.amount)
        .fold(Decimal::ZERO, |acc, a| acc + a);

    totals
}

/// One alert per defaulted loan in scope.
pub fn arrears_alerts(book: &LedgerBook, events: &CollectedEvents<'_>) -> Vec<ArrearsAlert> {
    events
        .loans
        .iter()
        .filter(|l| l.status == LoanStatus::Defaulted)
        .map(|l| ArrearsAlert {
            loan_id: l.id.clone(),
            client_id: l.client_id.clone(),
            client_name: book.client(&l.client_id).map(|c| c.full_name.clone()),
            investor_id: l.investor_id.clone(),
            principal: l.amount,
            interest_rate: l.interest_rate,
            projected_amount: percent_of(l.amount, l.interest_rate),
        })
        .collect()
}
