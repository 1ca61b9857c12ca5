use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::anomaly::{to_warnings, LedgerAnomaly};
use crate::ledger::aggregate::{aggregate, arrears_alerts, ArrearsAlert, LedgerTotals};
use crate::ledger::collector::{collect, Scope};
use crate::ledger::wallet::{build_events, overdraft_warnings, simulate, Overdraft, WalletEvent};
use crate::policy::LedgerPolicy;
use crate::records::LedgerBook;
use crate::types::*;
use crate::ZaldoResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Per-investor figures. Derived on every query, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestorShare {
    pub investor_id: String,
    pub full_name: String,
    pub invested_capital: Money,
    pub active_capital: Money,
    pub active_loans: usize,
    /// Gross interest and fees collected on this investor's loans
    pub collected_total: Money,
    pub admin_fee: Money,
    pub net_profit: Money,
    pub capital_repaid: Money,
    pub total_withdrawn: Money,
    /// Simulated liquid cash ("caja disponible")
    pub wallet_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestorStatementInput {
    pub book: LedgerBook,
    pub investor_id: String,
    #[serde(default)]
    pub policy: LedgerPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestorStatement {
    pub share: InvestorShare,
    pub totals: LedgerTotals,
    pub external_capital_injected: Money,
    /// Wallet movements, oldest first
    pub transactions: Vec<WalletEvent>,
    pub overdrafts: Vec<Overdraft>,
    pub anomalies: Vec<LedgerAnomaly>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioInput {
    pub book: LedgerBook,
    #[serde(default)]
    pub policy: LedgerPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub totals: LedgerTotals,
    /// Wallet replayed over every record at once
    pub wallet_balance: Money,
    pub overdrafts: Vec<Overdraft>,
    pub investors: Vec<InvestorShare>,
    pub alerts: Vec<ArrearsAlert>,
    pub anomalies: Vec<LedgerAnomaly>,
}

// ---------------------------------------------------------------------------
// Investor statement
// ---------------------------------------------------------------------------

/// Figures, wallet and movement feed for one investor ("socia").
pub fn investor_statement(
    input: &InvestorStatementInput,
) -> ZaldoResult<ComputationOutput<InvestorStatement>> {
    let start = Instant::now();
    input.policy.validate()?;

    let scope = Scope::Investor {
        investor_id: input.investor_id.clone(),
    };
    let events = collect(&input.book, &scope, &input.policy);
    let totals = aggregate(&events);
    let (stream, dropped) = build_events(&events);
    let sim = simulate(&stream);

    let full_name = input
        .book
        .investor(&input.investor_id)
        .map(|i| i.full_name.clone())
        .unwrap_or_default();
    let share = share_from(&input.investor_id, full_name, &totals, sim.balance);

    let mut anomalies = events.anomalies;
    anomalies.extend(dropped);
    let mut warnings = to_warnings(&anomalies);
    warnings.extend(overdraft_warnings(&sim.overdrafts));

    tracing::debug!(
        investor_id = %input.investor_id,
        wallet_balance = %share.wallet_balance,
        "investor statement computed"
    );

    let output = InvestorStatement {
        share,
        totals,
        external_capital_injected: sim.external_capital_injected,
        transactions: stream,
        overdrafts: sim.overdrafts,
        anomalies,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Investor statement: capital, profit split and simulated liquid wallet",
        &serde_json::json!({
            "investor_id": input.investor_id,
            "default_admin_fee_percent": input.policy.default_admin_fee_percent.to_string(),
            "active_capital_includes_defaulted": true,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Portfolio summary
// ---------------------------------------------------------------------------

/// Operator dashboard: portfolio totals, per-investor shares and arrears
/// alerts.
///
/// Records with an unknown investor count in the totals but in no investor
/// row; each is reported.
pub fn portfolio_summary(
    input: &PortfolioInput,
) -> ZaldoResult<ComputationOutput<PortfolioSummary>> {
    let start = Instant::now();
    input.policy.validate()?;

    let events = collect(&input.book, &Scope::Portfolio, &input.policy);
    let totals = aggregate(&events);
    let alerts = arrears_alerts(&input.book, &events);
    let (stream, dropped) = build_events(&events);
    let portfolio_wallet = simulate(&stream);

    // Per-investor anomalies repeat what the portfolio pass already reported.
    let investors: Vec<InvestorShare> = input
        .book
        .investors
        .iter()
        .map(|inv| {
            let scope = Scope::Investor {
                investor_id: inv.id.clone(),
            };
            let scoped = collect(&input.book, &scope, &input.policy);
            let t = aggregate(&scoped);
            let (s, _) = build_events(&scoped);
            share_from(&inv.id, inv.full_name.clone(), &t, simulate(&s).balance)
        })
        .collect();

    let mut anomalies = events.anomalies;
    anomalies.extend(dropped);
    let mut warnings = to_warnings(&anomalies);
    warnings.extend(overdraft_warnings(&portfolio_wallet.overdrafts));

    tracing::debug!(
        investors = investors.len(),
        alerts = alerts.len(),
        active_capital = %totals.active_capital,
        "portfolio summary computed"
    );

    let output = PortfolioSummary {
        totals,
        wallet_balance: portfolio_wallet.balance,
        overdrafts: portfolio_wallet.overdrafts,
        investors,
        alerts,
        anomalies,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Portfolio summary: active capital, admin/investor profit split, arrears exposure",
        &serde_json::json!({
            "default_admin_fee_percent": input.policy.default_admin_fee_percent.to_string(),
            "arrears_estimate": "one month of interest per defaulted loan",
            "active_capital_includes_defaulted": true,
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn share_from(
    investor_id: &str,
    full_name: String,
    totals: &LedgerTotals,
    wallet_balance: Money,
) -> InvestorShare {
    InvestorShare {
        investor_id: investor_id.to_string(),
        full_name,
        invested_capital: totals.invested_capital,
        active_capital: totals.active_capital,
        active_loans: totals.active_loans,
        collected_total: totals.gross_profit,
        admin_fee: totals.admin_fee,
        net_profit: totals.net_profit,
        capital_repaid: totals.capital_repaid,
        total_withdrawn: totals.total_withdrawn,
        wallet_balance,
    }
}
