use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

#[napi]
pub fn split_interest(input_json: String) -> NapiResult<String> {
    let input: zaldo_core::ledger::split::SplitInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = zaldo_core::ledger::split::calculate_split(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn investor_statement(input_json: String) -> NapiResult<String> {
    let input: zaldo_core::ledger::statement::InvestorStatementInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        zaldo_core::ledger::statement::investor_statement(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn portfolio_summary(input_json: String) -> NapiResult<String> {
    let input: zaldo_core::ledger::statement::PortfolioInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        zaldo_core::ledger::statement::portfolio_summary(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn simulate_wallet(input_json: String) -> NapiResult<String> {
    let input: zaldo_core::ledger::wallet::WalletInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = zaldo_core::ledger::wallet::simulate_wallet(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

#[napi]
pub fn assess_arrears(input_json: String) -> NapiResult<String> {
    let input: zaldo_core::collections::arrears::ArrearsInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        zaldo_core::collections::arrears::assess_arrears(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// Takes the amount as a decimal string ("1500000") and returns the words.
#[napi]
pub fn amount_in_words(amount: String) -> NapiResult<String> {
    let amount = Decimal::from_str(amount.trim()).map_err(to_napi_error)?;
    zaldo_core::documents::amount_words::amount_in_words(amount).map_err(to_napi_error)
}

#[napi]
pub fn settlement_certificate(input_json: String) -> NapiResult<String> {
    let input: zaldo_core::documents::settlement::SettlementInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = zaldo_core::documents::settlement::settlement_certificate(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn promissory_note(input_json: String) -> NapiResult<String> {
    let input: zaldo_core::documents::promissory_note::PromissoryNoteInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = zaldo_core::documents::promissory_note::promissory_note(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn payment_receipt(input_json: String) -> NapiResult<String> {
    let input: zaldo_core::documents::payment_receipt::PaymentReceiptInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = zaldo_core::documents::payment_receipt::payment_receipt(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Maintenance
// ---------------------------------------------------------------------------

#[napi]
pub fn run_maintenance(input_json: String) -> NapiResult<String> {
    let input: zaldo_core::maintenance::operations::MaintenanceInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = zaldo_core::maintenance::operations::run_maintenance(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
