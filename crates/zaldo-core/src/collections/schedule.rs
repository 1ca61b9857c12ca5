use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ZaldoError;
use crate::ledger::split::split_interest;
use crate::types::*;
use crate::ZaldoResult;

/// Expected monthly charge on a loan and how it splits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestDistribution {
    pub total_interest: Money,
    pub admin_share: Money,
    pub investor_share: Money,
}

/// One month of interest on `principal`, split by the admin fee.
pub fn monthly_interest(
    principal: Money,
    monthly_rate: Percent,
    admin_fee_percent: Percent,
) -> InterestDistribution {
    let total_interest = percent_of(principal, monthly_rate);
    let split = split_interest(total_interest, admin_fee_percent);
    InterestDistribution {
        total_interest,
        admin_share: split.admin_share,
        investor_share: split.investor_share,
    }
}

/// A payment is late when it lands more than `grace_days` after the date it
/// was due. Early payments are never late.
pub fn is_payment_late(payment_date: NaiveDate, expected_date: NaiveDate, grace_days: u32) -> bool {
    (payment_date - expected_date).num_days() > i64::from(grace_days)
}

/// The first cutoff strictly after `reference`.
///
/// Months shorter than `cutoff_day` use their last day, so a loan cut on the
/// 31st falls due on 28/29 February and 30 April.
pub fn next_cutoff_date(reference: NaiveDate, cutoff_day: u32) -> ZaldoResult<NaiveDate> {
    if !(1..=31).contains(&cutoff_day) {
        return Err(ZaldoError::InvalidInput {
            field: "cutoff_day".into(),
            reason: format!("Cutoff day must be between 1 and 31, got {cutoff_day}"),
        });
    }

    let this_month = first_of_month(reference)?;
    let this_cutoff = cutoff_in_month(this_month, cutoff_day)?;
    if reference < this_cutoff {
        return Ok(this_cutoff);
    }

    let next_month = this_month
        .checked_add_months(Months::new(1))
        .ok_or_else(|| ZaldoError::DateError(format!("no month after {reference}")))?;
    cutoff_in_month(next_month, cutoff_day)
}

fn first_of_month(date: NaiveDate) -> ZaldoResult<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .ok_or_else(|| ZaldoError::DateError(format!("invalid month for {date}")))
}

fn cutoff_in_month(first: NaiveDate, cutoff_day: u32) -> ZaldoResult<NaiveDate> {
    let last_day = first
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .ok_or_else(|| ZaldoError::DateError(format!("no month end after {first}")))?;
    NaiveDate::from_ymd_opt(first.year(), first.month(), cutoff_day.min(last_day))
        .ok_or_else(|| ZaldoError::DateError(format!("invalid cutoff in month of {first}")))
}
