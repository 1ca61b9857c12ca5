use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::anomaly::{to_warnings, LedgerAnomaly, RecordKind};
use crate::ledger::collector::{collect, CollectedEvents, Scope};
use crate::ledger::split::split_interest;
use crate::policy::LedgerPolicy;
use crate::records::LedgerBook;
use crate::types::*;
use crate::ZaldoResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowKind {
    Inflow,
    Outflow,
}

/// One dated movement of investor cash. The ordered list of these is both
/// the simulator's input and the "wallet movements" feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletEvent {
    pub date: NaiveDate,
    /// Replay key; date-only records sit at midnight
    pub timestamp: NaiveDateTime,
    pub kind: FlowKind,
    pub source: RecordKind,
    pub record_id: String,
    /// Amount on the record
    pub gross_amount: Money,
    /// Amount that moves the wallet: the investor share for interest and
    /// fees, the full amount otherwise
    pub net_amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletStep {
    pub event: WalletEvent,
    pub balance_after: Money,
    /// Part of a loan the wallet could not cover, assumed injected from
    /// outside. Zero unless the clamp fired.
    pub shortfall_absorbed: Money,
}

/// A payout that left the wallet below zero. Informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overdraft {
    pub payout_id: String,
    pub date: NaiveDate,
    pub balance_after: Money,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletSimulation {
    pub balance: Money,
    pub steps: Vec<WalletStep>,
    /// Sum of shortfalls across all loan clamps
    pub external_capital_injected: Money,
    pub overdrafts: Vec<Overdraft>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletInput {
    pub book: LedgerBook,
    #[serde(default)]
    pub scope: Scope,
    #[serde(default)]
    pub policy: LedgerPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletOutput {
    pub scope: Scope,
    pub balance: Money,
    pub external_capital_injected: Money,
    pub steps: Vec<WalletStep>,
    pub overdrafts: Vec<Overdraft>,
    pub anomalies: Vec<LedgerAnomaly>,
}

// ---------------------------------------------------------------------------
// Event stream
// ---------------------------------------------------------------------------

/// Turn collected records into one chronologically ordered stream.
///
/// Records without a readable date are left out and reported. Events are
/// ordered by timestamp. Equal timestamps keep a stable order: payments,
/// then loans, then payouts, each in input order, so money received on a
/// day can fund a loan made that day.
pub fn build_events(events: &CollectedEvents<'_>) -> (Vec<WalletEvent>, Vec<LedgerAnomaly>) {
    let capacity = events.loans.len() + events.payments.len() + events.payouts.len();
    let mut stream = Vec::with_capacity(capacity);
    let mut anomalies = Vec::new();

    let malformed = |record: RecordKind, record_id: &str, raw: &str| {
        LedgerAnomaly::MalformedTimestamp {
            record,
            record_id: record_id.to_string(),
            raw: raw.to_string(),
        }
    };

    for sp in &events.payments {
        let p = sp.payment;
        let Some(timestamp) = p.paid_at() else {
            anomalies.push(malformed(RecordKind::Payment, &p.id, &p.payment_date));
            continue;
        };
        let net_amount = if p.payment_type.is_revenue() {
            split_interest(p.amount, sp.fee.percent()).investor_share
        } else {
            p.amount
        };
        stream.push(WalletEvent {
            date: timestamp.date(),
            timestamp,
            kind: FlowKind::Inflow,
            source: RecordKind::Payment,
            record_id: p.id.clone(),
            gross_amount: p.amount,
            net_amount,
        });
    }

    for loan in &events.loans {
        let Some(timestamp) = loan.started_at() else {
            anomalies.push(malformed(RecordKind::Loan, &loan.id, &loan.start_date));
            continue;
        };
        stream.push(WalletEvent {
            date: timestamp.date(),
            timestamp,
            kind: FlowKind::Outflow,
            source: RecordKind::Loan,
            record_id: loan.id.clone(),
            gross_amount: loan.amount,
            net_amount: loan.amount,
        });
    }

    for payout in &events.payouts {
        let Some(timestamp) = payout.paid_at() else {
            anomalies.push(malformed(RecordKind::Payout, &payout.id, &payout.date));
            continue;
        };
        stream.push(WalletEvent {
            date: timestamp.date(),
            timestamp,
            kind: FlowKind::Outflow,
            source: RecordKind::Payout,
            record_id: payout.id.clone(),
            gross_amount: payout.amount,
            net_amount: payout.amount,
        });
    }

    // sort_by_key is stable
    stream.sort_by_key(|e| e.timestamp);
    (stream, anomalies)
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

/// Replay an ordered stream against a balance starting at zero.
///
/// Credits add. Payouts subtract with no floor. A loan the wallet can cover
/// is paid from it; otherwise the balance drops to zero and the shortfall is
/// treated as outside money, never as wallet debt.
pub fn simulate(stream: &[WalletEvent]) -> WalletSimulation {
    let mut sim = WalletSimulation::default();
    let mut balance = Decimal::ZERO;

    for event in stream {
        let mut shortfall = Decimal::ZERO;
        match (event.source, event.kind) {
            (RecordKind::Loan, _) => {
                if balance >= event.net_amount {
                    balance -= event.net_amount;
                } else {
                    shortfall = event.net_amount - balance;
                    balance = Decimal::ZERO;
                }
            }
            (_, FlowKind::Inflow) => balance += event.net_amount,
            (_, FlowKind::Outflow) => {
                balance -= event.net_amount;
                if balance < Decimal::ZERO {
                    sim.overdrafts.push(Overdraft {
                        payout_id: event.record_id.clone(),
                        date: event.date,
                        balance_after: balance,
                    });
                }
            }
        }
        sim.external_capital_injected += shortfall;
        sim.steps.push(WalletStep {
            event: event.clone(),
            balance_after: balance,
            shortfall_absorbed: shortfall,
        });
    }

    sim.balance = balance;
    sim
}

/// Simulate the liquid wallet of one scope.
pub fn simulate_wallet(input: &WalletInput) -> ZaldoResult<ComputationOutput<WalletOutput>> {
    let start = Instant::now();
    input.policy.validate()?;

    let events = collect(&input.book, &input.scope, &input.policy);
    let (stream, dropped) = build_events(&events);
    let sim = simulate(&stream);

    let mut anomalies = events.anomalies;
    anomalies.extend(dropped);
    let mut warnings = to_warnings(&anomalies);
    warnings.extend(overdraft_warnings(&sim.overdrafts));

    tracing::debug!(
        scope = ?input.scope,
        events = stream.len(),
        balance = %sim.balance,
        "wallet simulated"
    );

    let output = WalletOutput {
        scope: input.scope.clone(),
        balance: sim.balance,
        external_capital_injected: sim.external_capital_injected,
        steps: sim.steps,
        overdrafts: sim.overdrafts,
        anomalies,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Liquid wallet replay: credits net of admin fee, payouts unfloored, loans clamp to zero",
        &serde_json::json!({
            "default_admin_fee_percent": input.policy.default_admin_fee_percent.to_string(),
            "tie_order": "payments, loans, payouts",
        }),
        warnings,
        elapsed,
        output,
    ))
}

pub(crate) fn overdraft_warnings(overdrafts: &[Overdraft]) -> Vec<String> {
    overdrafts
        .iter()
        .map(|o| {
            format!(
                "payout {} on {} left the wallet at {}",
                o.payout_id, o.date, o.balance_after
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::test_support::*;
    use rust_decimal_macros::dec;

    fn ev(date: &str, source: RecordKind, amount: Money) -> WalletEvent {
        let kind = if source == RecordKind::Payment {
            FlowKind::Inflow
        } else {
            FlowKind::Outflow
        };
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        WalletEvent {
            date,
            timestamp: date.and_hms_opt(0, 0, 0).unwrap(),
            kind,
            source,
            record_id: format!("{source}-{date}"),
            gross_amount: amount,
            net_amount: amount,
        }
    }

    #[test]
    fn test_clamp_scenario() {
        let stream = vec![
            ev("2025-01-01", RecordKind::Loan, dec!(500_000)),
            ev("2025-02-01", RecordKind::Payment, dec!(500_000)),
            ev("2025-03-01", RecordKind::Loan, dec!(500_000)),
        ];
        let sim = simulate(&stream);
        let balances: Vec<Money> = sim.steps.iter().map(|s| s.balance_after).collect();
        assert_eq!(balances, vec![dec!(0), dec!(500_000), dec!(0)]);
        assert_eq!(sim.steps[0].shortfall_absorbed, dec!(500_000));
        assert_eq!(sim.steps[2].shortfall_absorbed, Decimal::ZERO);
        assert_eq!(sim.external_capital_injected, dec!(500_000));
        assert_eq!(sim.balance, Decimal::ZERO);
    }

    #[test]
    fn test_loan_order_matters() {
        let pay_first = vec![
            ev("2025-01-01", RecordKind::Payment, dec!(100)),
            ev("2025-01-02", RecordKind::Loan, dec!(150)),
        ];
        let loan_first = vec![
            ev("2025-01-01", RecordKind::Loan, dec!(150)),
            ev("2025-01-02", RecordKind::Payment, dec!(100)),
        ];
        assert_eq!(simulate(&pay_first).balance, Decimal::ZERO);
        assert_eq!(simulate(&loan_first).balance, dec!(100));
    }

    #[test]
    fn test_payment_and_payout_order_commutes() {
        let a = vec![
            ev("2025-01-01", RecordKind::Loan, dec!(50)),
            ev("2025-01-02", RecordKind::Payment, dec!(100)),
            ev("2025-01-03", RecordKind::Payout, dec!(30)),
            ev("2025-01-04", RecordKind::Payment, dec!(20)),
        ];
        let b = vec![
            ev("2025-01-01", RecordKind::Loan, dec!(50)),
            ev("2025-01-02", RecordKind::Payout, dec!(30)),
            ev("2025-01-03", RecordKind::Payment, dec!(20)),
            ev("2025-01-04", RecordKind::Payment, dec!(100)),
        ];
        assert_eq!(simulate(&a).balance, simulate(&b).balance);
        assert_eq!(simulate(&a).balance, dec!(90));
    }

    #[test]
    fn test_payout_can_go_negative() {
        let stream = vec![
            ev("2025-01-01", RecordKind::Payment, dec!(10)),
            ev("2025-01-02", RecordKind::Payout, dec!(25)),
        ];
        let sim = simulate(&stream);
        assert_eq!(sim.balance, dec!(-15));
        assert_eq!(sim.overdrafts.len(), 1);
        assert_eq!(sim.overdrafts[0].balance_after, dec!(-15));
    }

    #[test]
    fn test_empty_stream() {
        let sim = simulate(&[]);
        assert_eq!(sim, WalletSimulation::default());
    }

    #[test]
    fn test_interest_credits_investor_share_only() {
        let mut book = book_with_investors(&["ana"]);
        book.payments.push(payment(
            "P1",
            "L1",
            dec!(100_000),
            PaymentType::Interest,
            "2025-02-01",
        ));
        book.loans.push(loan("L1", "ana", dec!(1_000_000), "2025-01-01"));

        let events = collect(&book, &investor_scope("ana"), &LedgerPolicy::default());
        let (stream, dropped) = build_events(&events);
        assert!(dropped.is_empty());
        assert_eq!(stream[0].source, RecordKind::Loan);
        assert_eq!(stream[1].gross_amount, dec!(100_000));
        assert_eq!(stream[1].net_amount, dec!(60_000));
        assert_eq!(simulate(&stream).balance, dec!(60_000));
    }

    #[test]
    fn test_same_day_payment_funds_loan() {
        let mut book = book_with_investors(&["ana"]);
        book.loans.push(loan("L1", "ana", dec!(100), "2025-01-01"));
        book.loans.push(loan("L2", "ana", dec!(100), "2025-03-01"));
        book.payments
            .push(payment("P1", "L1", dec!(100), PaymentType::Capital, "2025-03-01"));

        let events = collect(&book, &Scope::Portfolio, &LedgerPolicy::default());
        let (stream, _) = build_events(&events);
        let sim = simulate(&stream);
        assert_eq!(sim.balance, Decimal::ZERO);
        assert_eq!(sim.external_capital_injected, dec!(100));
    }

    #[test]
    fn test_same_day_events_follow_time_of_day() {
        let mut book = book_with_investors(&["ana"]);
        book.loans.push(loan("L0", "ana", dec!(1), "2025-01-01"));
        book.loans
            .push(loan("L1", "ana", dec!(100), "2025-03-01T12:00:00Z"));
        book.payments
            .push(payment("P1", "L0", dec!(100), PaymentType::Capital, "2025-02-01"));
        book.payouts
            .push(payout("W1", "ana", dec!(100), "2025-03-01T08:00:00Z"));

        let events = collect(&book, &investor_scope("ana"), &LedgerPolicy::default());
        let (stream, _) = build_events(&events);
        let order: Vec<&str> = stream.iter().map(|e| e.record_id.as_str()).collect();
        assert_eq!(order, vec!["L0", "P1", "W1", "L1"]);

        let sim = simulate(&stream);
        assert_eq!(sim.balance, Decimal::ZERO);
        assert!(sim.overdrafts.is_empty());
        assert_eq!(sim.steps[3].shortfall_absorbed, dec!(100));
    }

    #[test]
    fn test_malformed_date_dropped_and_reported() {
        let mut book = book_with_investors(&["ana"]);
        book.loans.push(loan("L1", "ana", dec!(100), "2025-01-01"));
        book.payments
            .push(payment("P1", "L1", dec!(40), PaymentType::Capital, "not a date"));
        book.payouts.push(payout("W1", "ana", dec!(5), ""));

        let input = WalletInput {
            book,
            scope: investor_scope("ana"),
            policy: LedgerPolicy::default(),
        };
        let out = simulate_wallet(&input).unwrap();
        assert_eq!(out.result.balance, Decimal::ZERO);
        assert_eq!(out.result.steps.len(), 1);
        assert_eq!(out.result.anomalies.len(), 2);
        assert_eq!(out.warnings.len(), 2);
    }
}
