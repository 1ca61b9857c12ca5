use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::documents::amount_words::{amount_in_words, format_cop};
use crate::documents::settlement::long_date_es;
use crate::error::ZaldoError;
use crate::records::{LedgerBook, PaymentType};
use crate::types::*;
use crate::ZaldoResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentReceiptInput {
    pub book: LedgerBook,
    pub payment_id: String,
    pub issued_on: NaiveDate,
}

/// Text of a "comprobante de pago", ready for layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub title: String,
    /// First eight characters of the payment id, upper-cased
    pub receipt_id: String,
    pub payment_id: String,
    pub loan_id: String,
    pub client_name: String,
    pub amount: Money,
    pub amount_formatted: String,
    pub amount_words: String,
    pub concept: String,
    /// Long Spanish date, or the raw value when unreadable
    pub payment_date: String,
    pub issued_on: String,
    pub status: String,
}

/// Receipt wording for each payment type.
pub fn receipt_concept(kind: PaymentType) -> &'static str {
    match kind {
        PaymentType::Interest => "PAGO DE INTERESES",
        PaymentType::Capital | PaymentType::Principal => "ABONO A CAPITAL",
        PaymentType::Fee => "PAGO DE MORA",
    }
}

/// Build the receipt for one recorded payment.
pub fn payment_receipt(
    input: &PaymentReceiptInput,
) -> ZaldoResult<ComputationOutput<PaymentReceipt>> {
    let start = Instant::now();
    let book = &input.book;

    let payment = book
        .payments
        .iter()
        .find(|p| p.id == input.payment_id)
        .ok_or_else(|| ZaldoError::InvalidInput {
            field: "payment_id".into(),
            reason: format!("Payment {} not found", input.payment_id),
        })?;

    let mut warnings = Vec::new();
    let client = book
        .loan(&payment.loan_id)
        .and_then(|loan| book.client(&loan.client_id));
    let client_name = match client {
        Some(c) => c.full_name.clone(),
        None => {
            warnings.push(format!(
                "payment {}: client of loan {} not found, name left blank",
                payment.id, payment.loan_id
            ));
            String::new()
        }
    };
    let payment_date = match payment.date() {
        Some(d) => long_date_es(d),
        None => {
            warnings.push(format!("payment {}: unreadable payment date", payment.id));
            payment.payment_date.clone()
        }
    };

    tracing::debug!(payment_id = %payment.id, "payment receipt built");

    let output = PaymentReceipt {
        title: "COMPROBANTE DE PAGO".into(),
        receipt_id: payment.id.chars().take(8).collect::<String>().to_uppercase(),
        payment_id: payment.id.clone(),
        loan_id: payment.loan_id.clone(),
        client_name,
        amount: payment.amount,
        amount_formatted: format_cop(payment.amount),
        amount_words: amount_in_words(payment.amount)?,
        concept: receipt_concept(payment.payment_type).into(),
        payment_date,
        issued_on: long_date_es(input.issued_on),
        status: "APROBADO".into(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Payment receipt text for a recorded payment",
        &serde_json::json!({ "issued_on": input.issued_on.to_string() }),
        warnings,
        elapsed,
        output,
    ))
}
