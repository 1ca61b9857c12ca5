use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use zaldo_core::collections::arrears::{self, ArrearsInput};
use zaldo_core::collections::schedule::{is_payment_late, monthly_interest, next_cutoff_date};

use super::{from_document, override_field, require_document, Context};

/// Arguments for a single loan's schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Decimal,

    /// Monthly interest rate in percent
    #[arg(long)]
    pub rate: Decimal,

    /// Operator share in percent (policy default when omitted)
    #[arg(long)]
    pub admin_fee_percent: Option<Decimal>,

    /// Day of month interest falls due
    #[arg(long)]
    pub cutoff_day: u32,

    /// Date interest is paid through (YYYY-MM-DD)
    #[arg(long)]
    pub from: NaiveDate,

    /// Check whether a payment made on this date is late
    #[arg(long)]
    pub paid_on: Option<NaiveDate>,
}

pub fn run_schedule(args: ScheduleArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let policy = ctx.policy.clone().unwrap_or_default();
    policy.validate()?;

    let fee = policy.resolve_fee(args.admin_fee_percent)?.percent();
    let next_due_date = next_cutoff_date(args.from, args.cutoff_day)?;
    let interest = monthly_interest(args.principal, args.rate, fee);
    let late = args
        .paid_on
        .map(|d| is_payment_late(d, next_due_date, policy.grace_period_days));

    Ok(json!({
        "result": {
            "next_due_date": next_due_date,
            "admin_fee_percent": fee,
            "total_interest": interest.total_interest,
            "admin_share": interest.admin_share,
            "investor_share": interest.investor_share,
            "grace_period_days": policy.grace_period_days,
            "paid_on": args.paid_on,
            "is_late": late,
        }
    }))
}

/// Arguments for the arrears report
#[derive(Args)]
pub struct ArrearsArgs {
    /// Path to JSON input file: { book, as_of?, policy? }
    #[arg(long)]
    pub input: Option<String>,

    /// Assessment date (overrides as_of in the input; defaults to today)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

pub fn run_arrears(args: ArrearsArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let mut doc = require_document(args.input.as_deref(), "arrears")?;
    let has_as_of = doc.get("as_of").is_some_and(|v| !v.is_null());
    let as_of = match args.as_of {
        Some(d) => Some(d),
        None if !has_as_of => Some(chrono::Local::now().date_naive()),
        None => None,
    };
    override_field(&mut doc, "as_of", as_of.map(|d| Value::String(d.to_string())));
    let arrears_input: ArrearsInput = from_document(doc, ctx)?;
    let result = arrears::assess_arrears(&arrears_input)?;
    Ok(serde_json::to_value(result)?)
}
