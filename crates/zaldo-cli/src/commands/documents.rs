use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use zaldo_core::documents::amount_words::{self, AmountWordsInput};
use zaldo_core::documents::payment_receipt::{self, PaymentReceiptInput};
use zaldo_core::documents::promissory_note::{self, PromissoryNoteInput};
use zaldo_core::documents::settlement::{self, SettlementInput};

use super::{override_field, require_document};

/// Arguments for amount-in-words rendering
#[derive(Args)]
pub struct AmountWordsArgs {
    /// Peso amount, e.g. 1500000
    #[arg(long)]
    pub amount: Decimal,
}

pub fn run_amount_words(args: AmountWordsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let result = amount_words::render_amount(&AmountWordsInput {
        amount: args.amount,
    })?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the discharge certificate
#[derive(Args)]
pub struct CertificateArgs {
    /// Path to JSON input file: { book, loan_id, issued_on }
    #[arg(long)]
    pub input: Option<String>,

    /// Loan to certify (overrides loan_id in the input)
    #[arg(long)]
    pub loan_id: Option<String>,

    /// Issue date (overrides issued_on in the input; defaults to today)
    #[arg(long)]
    pub issued_on: Option<NaiveDate>,
}

pub fn run_certificate(args: CertificateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut doc = require_document(args.input.as_deref(), "certificate")?;
    override_field(&mut doc, "loan_id", args.loan_id.map(Value::String));
    override_issued_on(&mut doc, args.issued_on);
    let certificate_input: SettlementInput = serde_json::from_value(doc)?;
    let result = settlement::settlement_certificate(&certificate_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the promissory note
#[derive(Args)]
pub struct PromissoryNoteArgs {
    /// Path to JSON input file: { book, loan_id, city, issued_on, note_number?, ... }
    #[arg(long)]
    pub input: Option<String>,

    /// Loan the note backs (overrides loan_id in the input)
    #[arg(long)]
    pub loan_id: Option<String>,

    /// Pagaré number (overrides note_number in the input)
    #[arg(long)]
    pub number: Option<String>,

    /// City of issue (overrides city in the input)
    #[arg(long)]
    pub city: Option<String>,

    /// Issue date (overrides issued_on in the input; defaults to today)
    #[arg(long)]
    pub issued_on: Option<NaiveDate>,
}

pub fn run_promissory_note(args: PromissoryNoteArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut doc = require_document(args.input.as_deref(), "promissory-note")?;
    override_field(&mut doc, "loan_id", args.loan_id.map(Value::String));
    override_field(&mut doc, "note_number", args.number.map(Value::String));
    override_field(&mut doc, "city", args.city.map(Value::String));
    override_issued_on(&mut doc, args.issued_on);
    let note_input: PromissoryNoteInput = serde_json::from_value(doc)?;
    let result = promissory_note::promissory_note(&note_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the payment receipt
#[derive(Args)]
pub struct ReceiptArgs {
    /// Path to JSON input file: { book, payment_id, issued_on }
    #[arg(long)]
    pub input: Option<String>,

    /// Payment to acknowledge (overrides payment_id in the input)
    #[arg(long)]
    pub payment_id: Option<String>,

    /// Issue date (overrides issued_on in the input; defaults to today)
    #[arg(long)]
    pub issued_on: Option<NaiveDate>,
}

pub fn run_receipt(args: ReceiptArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut doc = require_document(args.input.as_deref(), "receipt")?;
    override_field(&mut doc, "payment_id", args.payment_id.map(Value::String));
    override_issued_on(&mut doc, args.issued_on);
    let receipt_input: PaymentReceiptInput = serde_json::from_value(doc)?;
    let result = payment_receipt::payment_receipt(&receipt_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Flag value first, then the document's own date, then today.
fn override_issued_on(doc: &mut Value, flag: Option<NaiveDate>) {
    let issued_on = match flag {
        Some(d) => Some(d),
        None if doc.get("issued_on").is_none() => Some(chrono::Local::now().date_naive()),
        None => None,
    };
    override_field(doc, "issued_on", issued_on.map(|d| Value::String(d.to_string())));
}
