use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::anomaly::{to_warnings, LedgerAnomaly, RecordKind};
use crate::collections::schedule::{
    is_payment_late, monthly_interest, next_cutoff_date, InterestDistribution,
};
use crate::policy::{FeeRate, LedgerPolicy};
use crate::records::{LedgerBook, Loan, LoanStatus};
use crate::types::*;
use crate::ZaldoResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrearsInput {
    pub book: LedgerBook,
    pub as_of: NaiveDate,
    #[serde(default)]
    pub policy: LedgerPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanArrears {
    pub loan_id: String,
    pub client_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    pub investor_id: String,
    pub status: LoanStatus,
    /// Interest is settled through this date
    pub covered_until: NaiveDate,
    pub cutoff_day: u32,
    pub next_due_date: NaiveDate,
    /// Zero while the due date is still ahead
    pub days_overdue: i64,
    /// Past due by more than the grace period
    pub is_late: bool,
    pub expected_interest: InterestDistribution,
    /// What the status should be as of the assessment date
    pub suggested_status: LoanStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArrearsReport {
    pub as_of: NaiveDate,
    pub loans: Vec<LoanArrears>,
    pub late_loans: usize,
    /// Interest expected from late loans at their next due date
    pub late_expected_interest: Money,
    pub anomalies: Vec<LedgerAnomaly>,
}

// ---------------------------------------------------------------------------
// Assessment
// ---------------------------------------------------------------------------

/// Due dates and lateness for every outstanding loan as of a date.
///
/// The next due date is the first cutoff after `paid_until`, or after the
/// start date when nothing has been paid yet. Loans whose dates cannot be
/// read are skipped and reported.
pub fn assess_arrears(input: &ArrearsInput) -> ZaldoResult<ComputationOutput<ArrearsReport>> {
    let start = Instant::now();
    input.policy.validate()?;

    let mut loans = Vec::new();
    let mut anomalies = Vec::new();

    for loan in input.book.loans.iter().filter(|l| l.status.is_outstanding()) {
        if loan.amount <= Decimal::ZERO {
            anomalies.push(LedgerAnomaly::NonPositiveAmount {
                record: RecordKind::Loan,
                record_id: loan.id.clone(),
                amount: loan.amount,
            });
            continue;
        }
        let rate = input.policy.fee_percent_for(loan);
        if let FeeRate::Replaced { recorded, percent } = rate {
            anomalies.push(LedgerAnomaly::FeeRateOutOfRange {
                loan_id: loan.id.clone(),
                recorded,
                applied: percent,
            });
        }
        match assess_loan(loan, &input.book, input.as_of, rate.percent(), &input.policy) {
            Ok(entry) => loans.push(entry),
            Err(anomaly) => anomalies.push(anomaly),
        }
    }

    let late: Vec<&LoanArrears> = loans.iter().filter(|l| l.is_late).collect();
    let late_loans = late.len();
    let late_expected_interest = late
        .iter()
        .map(|l| l.expected_interest.total_interest)
        .fold(Decimal::ZERO, |acc, a| acc + a);

    let warnings = to_warnings(&anomalies);
    tracing::debug!(as_of = %input.as_of, assessed = loans.len(), late_loans, "arrears assessed");

    let output = ArrearsReport {
        as_of: input.as_of,
        loans,
        late_loans,
        late_expected_interest,
        anomalies,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Arrears assessment: next cutoff after paid-through date, late past grace period",
        &serde_json::json!({
            "as_of": input.as_of.to_string(),
            "grace_period_days": input.policy.grace_period_days,
            "month_end_convention": "cutoff clamps to last day of shorter months",
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn assess_loan(
    loan: &Loan,
    book: &LedgerBook,
    as_of: NaiveDate,
    fee: Percent,
    policy: &LedgerPolicy,
) -> Result<LoanArrears, LedgerAnomaly> {
    let malformed = |raw: &str| LedgerAnomaly::MalformedTimestamp {
        record: RecordKind::Loan,
        record_id: loan.id.clone(),
        raw: raw.to_string(),
    };

    let started = loan.start().ok_or_else(|| malformed(&loan.start_date))?;
    let covered_until = match &loan.paid_until {
        Some(raw) => parse_ledger_date(raw).ok_or_else(|| malformed(raw))?,
        None => started,
    };
    // Loans are created with the start date's day as their cutoff.
    let cutoff_day = loan.cutoff_day.unwrap_or_else(|| started.day());
    let next_due_date = next_cutoff_date(covered_until, cutoff_day).map_err(|_| {
        LedgerAnomaly::InvalidCutoffDay {
            loan_id: loan.id.clone(),
            cutoff_day,
        }
    })?;

    let days_overdue = (as_of - next_due_date).num_days().max(0);
    let is_late = is_payment_late(as_of, next_due_date, policy.grace_period_days);

    Ok(LoanArrears {
        loan_id: loan.id.clone(),
        client_id: loan.client_id.clone(),
        client_name: book.client(&loan.client_id).map(|c| c.full_name.clone()),
        investor_id: loan.investor_id.clone(),
        status: loan.status,
        covered_until,
        cutoff_day,
        next_due_date,
        days_overdue,
        is_late,
        expected_interest: monthly_interest(loan.amount, loan.interest_rate, fee),
        suggested_status: if is_late {
            LoanStatus::Defaulted
        } else {
            LoanStatus::Active
        },
    })
}
