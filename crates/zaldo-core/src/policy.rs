use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::ZaldoError;
use crate::records::Loan;
use crate::types::{Percent, HUNDRED};
use crate::ZaldoResult;

/// Share of interest the operator keeps when a loan does not record one.
pub const DEFAULT_ADMIN_FEE_PERCENT: Percent = dec!(40);

/// Days after the due date before a payment counts as late.
pub const GRACE_PERIOD_DAYS: u32 = 5;

/// Business parameters shared by every computation.
///
/// Every input document carries an optional `policy`; when omitted the
/// defaults above apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerPolicy {
    pub default_admin_fee_percent: Percent,
    pub grace_period_days: u32,
}

impl Default for LedgerPolicy {
    fn default() -> Self {
        Self {
            default_admin_fee_percent: DEFAULT_ADMIN_FEE_PERCENT,
            grace_period_days: GRACE_PERIOD_DAYS,
        }
    }
}

/// Fee percent applied to a loan, and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum FeeRate {
    Recorded { percent: Percent },
    /// The loan has no fee recorded.
    Defaulted { percent: Percent },
    /// The recorded fee is outside 0-100 and was replaced by the default.
    Replaced { recorded: Percent, percent: Percent },
}

impl FeeRate {
    pub fn percent(&self) -> Percent {
        match *self {
            FeeRate::Recorded { percent }
            | FeeRate::Defaulted { percent }
            | FeeRate::Replaced { percent, .. } => percent,
        }
    }
}

impl LedgerPolicy {
    pub fn validate(&self) -> ZaldoResult<()> {
        if !is_valid_percent(self.default_admin_fee_percent) {
            return Err(ZaldoError::ConfigError(format!(
                "default_admin_fee_percent must be between 0 and 100, got {}",
                self.default_admin_fee_percent
            )));
        }
        if self.grace_period_days > 31 {
            return Err(ZaldoError::ConfigError(format!(
                "grace_period_days must be at most 31, got {}",
                self.grace_period_days
            )));
        }
        Ok(())
    }

    /// The one place the admin fee default is applied.
    ///
    /// An absent fee takes the policy default. An explicit fee outside
    /// 0-100 is rejected.
    pub fn resolve_fee(&self, fee: Option<Percent>) -> ZaldoResult<FeeRate> {
        match fee {
            None => Ok(FeeRate::Defaulted {
                percent: self.default_admin_fee_percent,
            }),
            Some(p) if is_valid_percent(p) => Ok(FeeRate::Recorded { percent: p }),
            Some(p) => Err(ZaldoError::InvalidInput {
                field: "admin_fee_percent".into(),
                reason: format!("Admin fee percent must be between 0 and 100, got {p}"),
            }),
        }
    }

    /// Fee for a stored loan. A recorded fee outside 0-100 is replaced by
    /// the default instead of failing the computation.
    pub fn fee_percent_for(&self, loan: &Loan) -> FeeRate {
        match (self.resolve_fee(loan.admin_fee_percent), loan.admin_fee_percent) {
            (Ok(rate), _) => rate,
            (Err(_), recorded) => FeeRate::Replaced {
                recorded: recorded.unwrap_or(Decimal::ZERO),
                percent: self.default_admin_fee_percent,
            },
        }
    }
}

pub(crate) fn is_valid_percent(p: Percent) -> bool {
    p >= Decimal::ZERO && p <= HUNDRED
}
