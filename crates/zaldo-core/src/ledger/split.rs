use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::ZaldoError;
use crate::policy::{FeeRate, LedgerPolicy};
use crate::types::*;
use crate::ZaldoResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Revenue payment divided between operator and investor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestSplit {
    pub admin_share: Money,
    pub investor_share: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitInput {
    pub amount: Money,
    /// Falls back to the policy default when absent
    #[serde(default)]
    pub admin_fee_percent: Option<Percent>,
    #[serde(default)]
    pub policy: LedgerPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitOutput {
    pub amount: Money,
    pub admin_fee_percent: Percent,
    pub fee_defaulted: bool,
    pub admin_share: Money,
    pub investor_share: Money,
}

// ---------------------------------------------------------------------------
// Core split
// ---------------------------------------------------------------------------

/// Split an interest or late-fee payment.
///
/// `investor_share` is the remainder, so the two shares always add back to
/// `amount` exactly.
pub fn split_interest(amount: Money, admin_fee_percent: Percent) -> InterestSplit {
    let admin_share = percent_of(amount, admin_fee_percent);
    InterestSplit {
        admin_share,
        investor_share: amount - admin_share,
    }
}

/// Split a single amount as a standalone computation.
pub fn calculate_split(input: &SplitInput) -> ZaldoResult<ComputationOutput<SplitOutput>> {
    let start = Instant::now();
    input.policy.validate()?;

    if input.amount < Decimal::ZERO {
        return Err(ZaldoError::InvalidInput {
            field: "amount".into(),
            reason: "Amount must be zero or positive".into(),
        });
    }
    let rate = input.policy.resolve_fee(input.admin_fee_percent)?;
    let fee = rate.percent();
    let fee_defaulted = matches!(rate, FeeRate::Defaulted { .. });

    let split = split_interest(input.amount, fee);
    let output = SplitOutput {
        amount: input.amount,
        admin_fee_percent: fee,
        fee_defaulted,
        admin_share: split.admin_share,
        investor_share: split.investor_share,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Interest split: admin share = amount x fee / 100, investor share = remainder",
        &serde_json::json!({
            "amount": input.amount.to_string(),
            "admin_fee_percent": fee.to_string(),
            "fee_defaulted": fee_defaulted,
        }),
        Vec::new(),
        elapsed,
        output,
    ))
}
