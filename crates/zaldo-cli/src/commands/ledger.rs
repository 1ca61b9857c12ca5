use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use zaldo_core::ledger::split::{self, SplitInput};
use zaldo_core::ledger::statement::{self, InvestorStatementInput, PortfolioInput};
use zaldo_core::ledger::wallet::{self, WalletInput};

use super::{from_document, override_field, read_document, require_document, Context};

/// Arguments for a single interest split
#[derive(Args)]
pub struct SplitArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Interest or late-fee amount collected
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Operator share in percent (policy default when omitted)
    #[arg(long)]
    pub admin_fee_percent: Option<Decimal>,
}

pub fn run_split(args: SplitArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let split_input: SplitInput = if let Some(doc) = read_document(args.input.as_deref())? {
        from_document(doc, ctx)?
    } else {
        let amount = args
            .amount
            .ok_or("--amount is required (or provide --input)")?;
        SplitInput {
            amount,
            admin_fee_percent: args.admin_fee_percent,
            policy: ctx.policy.clone().unwrap_or_default(),
        }
    };
    let result = split::calculate_split(&split_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for an investor statement
#[derive(Args)]
pub struct StatementArgs {
    /// Path to JSON input file: { book, investor_id, policy? }
    #[arg(long)]
    pub input: Option<String>,

    /// Investor to report on (overrides investor_id in the input)
    #[arg(long)]
    pub investor_id: Option<String>,
}

pub fn run_statement(args: StatementArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let mut doc = require_document(args.input.as_deref(), "statement")?;
    override_field(&mut doc, "investor_id", args.investor_id.map(Value::String));
    let statement_input: InvestorStatementInput = from_document(doc, ctx)?;
    let result = statement::investor_statement(&statement_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the portfolio summary
#[derive(Args)]
pub struct PortfolioArgs {
    /// Path to JSON input file: { book, policy? }
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_portfolio(args: PortfolioArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let doc = require_document(args.input.as_deref(), "portfolio")?;
    let portfolio_input: PortfolioInput = from_document(doc, ctx)?;
    let result = statement::portfolio_summary(&portfolio_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the wallet replay
#[derive(Args)]
pub struct WalletArgs {
    /// Path to JSON input file: { book, scope?, policy? }
    #[arg(long)]
    pub input: Option<String>,

    /// Replay one investor's wallet instead of the whole portfolio
    #[arg(long)]
    pub investor_id: Option<String>,
}

pub fn run_wallet(args: WalletArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let mut doc = require_document(args.input.as_deref(), "wallet")?;
    let scope = args
        .investor_id
        .map(|id| serde_json::json!({ "scope": "investor", "investor_id": id }));
    override_field(&mut doc, "scope", scope);
    let wallet_input: WalletInput = from_document(doc, ctx)?;
    let result = wallet::simulate_wallet(&wallet_input)?;
    Ok(serde_json::to_value(result)?)
}
