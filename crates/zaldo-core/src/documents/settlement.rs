use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::documents::amount_words::{amount_in_words, format_cop};
use crate::error::ZaldoError;
use crate::records::{LedgerBook, LoanStatus};
use crate::types::*;
use crate::ZaldoResult;

const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementInput {
    pub book: LedgerBook,
    pub loan_id: String,
    pub issued_on: NaiveDate,
}

/// Text of a "paz y salvo" discharge certificate, ready for layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementCertificate {
    pub title: String,
    pub loan_id: String,
    pub client_name: String,
    pub client_document: Option<String>,
    pub loan_amount: Money,
    pub loan_amount_words: String,
    pub paragraphs: Vec<String>,
}

/// "7 de enero de 2025"
pub fn long_date_es(date: NaiveDate) -> String {
    format!(
        "{} de {} de {}",
        date.day(),
        MONTHS_ES[date.month0() as usize],
        date.year()
    )
}

/// Build the discharge certificate for a settled loan.
///
/// Only paid or completed loans can be certified.
pub fn settlement_certificate(
    input: &SettlementInput,
) -> ZaldoResult<ComputationOutput<SettlementCertificate>> {
    let start = Instant::now();
    let book = &input.book;

    let loan = book.loan(&input.loan_id).ok_or_else(|| ZaldoError::InvalidInput {
        field: "loan_id".into(),
        reason: format!("Loan {} not found", input.loan_id),
    })?;
    if !matches!(loan.status, LoanStatus::Paid | LoanStatus::Completed) {
        return Err(ZaldoError::InvalidInput {
            field: "loan_id".into(),
            reason: format!("Loan {} is still outstanding", loan.id),
        });
    }

    let mut warnings = Vec::new();
    let client = book.client(&loan.client_id);
    let client_name = match client {
        Some(c) => c.full_name.clone(),
        None => {
            warnings.push(format!("client {} not found, name left blank", loan.client_id));
            String::new()
        }
    };
    let client_document = client.and_then(|c| c.document_id.clone());
    let started = match loan.start() {
        Some(d) => long_date_es(d),
        None => {
            warnings.push(format!("loan {}: unreadable start date", loan.id));
            loan.start_date.clone()
        }
    };

    let loan_amount_words = amount_in_words(loan.amount)?;
    let document_clause = match &client_document {
        Some(doc) => format!(", identificado(a) con Cédula de Ciudadanía No. {doc},"),
        None => ",".to_string(),
    };
    let paragraphs = vec![
        format!(
            "Por medio del presente documento, ZALDO CERTIFICA que el/la señor(a) {client_name}{document_clause} \
             ha cancelado en su totalidad las obligaciones financieras adquiridas mediante el crédito \
             por valor de {} ({loan_amount_words}) iniciado el día {started}.",
            format_cop(loan.amount)
        ),
        format!(
            "A la fecha de expedición de este documento ({}), el cliente se encuentra a PAZ Y SALVO \
             por todo concepto (Capital e Intereses) relacionado con dicha obligación.",
            long_date_es(input.issued_on)
        ),
    ];

    tracing::debug!(loan_id = %loan.id, "settlement certificate built");

    let output = SettlementCertificate {
        title: "PAZ Y SALVO".into(),
        loan_id: loan.id.clone(),
        client_name,
        client_document,
        loan_amount: loan.amount,
        loan_amount_words,
        paragraphs,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Discharge certificate text for a settled loan",
        &serde_json::json!({ "issued_on": input.issued_on.to_string() }),
        warnings,
        elapsed,
        output,
    ))
}
