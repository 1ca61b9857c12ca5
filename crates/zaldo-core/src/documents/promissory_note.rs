use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::documents::amount_words::{amount_in_words, format_cop};
use crate::documents::settlement::long_date_es;
use crate::error::ZaldoError;
use crate::records::LedgerBook;
use crate::types::*;
use crate::ZaldoResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromissoryNoteInput {
    pub book: LedgerBook,
    pub loan_id: String,
    /// Pagaré number; the loan id when absent
    #[serde(default)]
    pub note_number: Option<String>,
    /// City where the note is signed and interest is paid
    pub city: String,
    pub issued_on: NaiveDate,
    #[serde(default)]
    pub client_address: Option<String>,
    #[serde(default)]
    pub client_city: Option<String>,
    /// Creditor's identity document
    #[serde(default)]
    pub lender_document: Option<String>,
}

/// One signing party. Blank fields are left for the form to fill in by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteParty {
    pub name: String,
    pub document: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// Text of a pagaré, ready for layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromissoryNote {
    pub title: String,
    pub note_number: String,
    pub loan_id: String,
    pub amount: Money,
    pub amount_words: String,
    /// "SUMA POR: $ 1.000.000 M/CTE"
    pub amount_line: String,
    /// "Bogotá, a 7 de enero de 2025"
    pub place_and_date: String,
    pub debtor: NoteParty,
    pub creditor: NoteParty,
    pub paragraphs: Vec<String>,
}

const BLANK: &str = "________";

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Build the promissory note for a loan. The rate and maturity are left
/// blank, to be completed when the note is signed.
pub fn promissory_note(
    input: &PromissoryNoteInput,
) -> ZaldoResult<ComputationOutput<PromissoryNote>> {
    let start = Instant::now();
    let book = &input.book;

    if input.city.trim().is_empty() {
        return Err(ZaldoError::InvalidInput {
            field: "city".into(),
            reason: "City of issue is required".into(),
        });
    }
    let loan = book.loan(&input.loan_id).ok_or_else(|| ZaldoError::InvalidInput {
        field: "loan_id".into(),
        reason: format!("Loan {} not found", input.loan_id),
    })?;

    let mut warnings = Vec::new();
    let client = book.client(&loan.client_id);
    if client.is_none() {
        warnings.push(format!("client {} not found, debtor left blank", loan.client_id));
    }
    let investor = book.investor(&loan.investor_id);
    if investor.is_none() {
        warnings.push(format!(
            "investor {} not found, creditor left blank",
            loan.investor_id
        ));
    }

    let debtor = NoteParty {
        name: client.map(|c| c.full_name.clone()).unwrap_or_default(),
        document: client
            .and_then(|c| c.document_id.clone())
            .unwrap_or_else(|| BLANK.to_string()),
        address: Some(input.client_address.clone().unwrap_or_else(|| BLANK.to_string())),
        city: Some(input.client_city.clone().unwrap_or_else(|| BLANK.to_string())),
    };
    let creditor = NoteParty {
        name: investor.map(|i| i.full_name.clone()).unwrap_or_default(),
        document: input
            .lender_document
            .clone()
            .unwrap_or_else(|| BLANK.to_string()),
        address: None,
        city: None,
    };

    let amount_words = amount_in_words(loan.amount)?;
    let amount_figure = format!("{} M/CTE", format_cop(loan.amount));
    let city = input.city.trim();
    let paragraphs = vec![
        format!(
            "Por este pagaré, yo, {}, identificado(a) como aparece al pie de mi firma, me comprometo \
             a pagar incondicionalmente a la orden de {}, o a quien represente sus derechos, la suma \
             de {amount_figure} ({amount_words}), el día ___ del mes de ________ del año _____.",
            debtor.name, creditor.name
        ),
        format!(
            "Sobre la suma adeudada se causará un interés remuneratorio a la tasa del {BLANK} \
             mensual, que corresponde a la tasa pactada."
        ),
        format!(
            "El pago de los intereses se realizará en {city} hasta los 8 días posteriores al mes \
             siguiente del desembolso del dinero, si se incumple la fecha se empezará a cobrar \
             intereses de mora desde el día 9 en adelante sobre los intereses pactados."
        ),
    ];

    tracing::debug!(loan_id = %loan.id, "promissory note built");

    let output = PromissoryNote {
        title: "PAGARÉ".into(),
        note_number: input
            .note_number
            .clone()
            .unwrap_or_else(|| loan.id.clone()),
        loan_id: loan.id.clone(),
        amount: loan.amount,
        amount_words,
        amount_line: format!("SUMA POR: {amount_figure}"),
        place_and_date: format!("{city}, a {}", long_date_es(input.issued_on)),
        debtor,
        creditor,
        paragraphs,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Promissory note text for a loan (rate and maturity left blank)",
        &serde_json::json!({
            "city": city,
            "issued_on": input.issued_on.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Client, Investor, Loan, LoanStatus};
    use rust_decimal_macros::dec;

    fn input() -> PromissoryNoteInput {
        PromissoryNoteInput {
            book: LedgerBook {
                investors: vec![Investor {
                    id: "ana".into(),
                    full_name: "Ana Gomez".into(),
                }],
                clients: vec![Client {
                    id: "C1".into(),
                    full_name: "Julio Perez".into(),
                    document_id: Some("1.020.304".into()),
                }],
                loans: vec![Loan {
                    id: "L1".into(),
                    client_id: "C1".into(),
                    investor_id: "ana".into(),
                    amount: dec!(1_000_000),
                    interest_rate: dec!(10),
                    admin_fee_percent: None,
                    start_date: "2025-01-07".into(),
                    status: LoanStatus::Active,
                    cutoff_day: Some(7),
                    paid_until: None,
                }],
                ..LedgerBook::default()
            },
            loan_id: "L1".into(),
            note_number: Some("0042".into()),
            city: "Bogotá".into(),
            issued_on: NaiveDate::from_ymd_opt(2025, 1, 7).unwrap(),
            client_address: Some("Calle 10 # 5-20".into()),
            client_city: None,
            lender_document: None,
        }
    }

    #[test]
    fn test_note_text() {
        let out = promissory_note(&input()).unwrap();
        let note = &out.result;
        assert_eq!(note.note_number, "0042");
        assert_eq!(note.amount_line, "SUMA POR: $ 1.000.000 M/CTE");
        assert_eq!(note.amount_words, "UN MILLÓN DE PESOS MONEDA CORRIENTE");
        assert_eq!(note.place_and_date, "Bogotá, a 7 de enero de 2025");
        assert_eq!(note.debtor.document, "1.020.304");
        assert_eq!(note.debtor.address.as_deref(), Some("Calle 10 # 5-20"));
        assert_eq!(note.debtor.city.as_deref(), Some(BLANK));
        assert_eq!(note.creditor.name, "Ana Gomez");
        assert_eq!(note.creditor.document, BLANK);
        assert_eq!(note.paragraphs.len(), 3);
        assert!(note.paragraphs[0].contains("yo, Julio Perez"));
        assert!(note.paragraphs[0].contains("a la orden de Ana Gomez"));
        assert!(note.paragraphs[0].contains("$ 1.000.000 M/CTE (UN MILLÓN DE PESOS MONEDA CORRIENTE)"));
        assert!(note.paragraphs[2].contains("en Bogotá"));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_number_defaults_to_loan_id() {
        let mut i = input();
        i.note_number = None;
        assert_eq!(promissory_note(&i).unwrap().result.note_number, "L1");
    }

    #[test]
    fn test_missing_parties_warn() {
        let mut i = input();
        i.book.clients.clear();
        i.book.investors.clear();
        let out = promissory_note(&i).unwrap();
        assert_eq!(out.result.debtor.name, "");
        assert_eq!(out.result.creditor.name, "");
        assert_eq!(out.warnings.len(), 2);
    }

    #[test]
    fn test_unknown_loan_rejected() {
        let mut i = input();
        i.loan_id = "L9".into();
        match promissory_note(&i).unwrap_err() {
            ZaldoError::InvalidInput { field, .. } => assert_eq!(field, "loan_id"),
            other => panic!("Expected InvalidInput for loan_id, got: {other}"),
        }
    }

    #[test]
    fn test_blank_city_rejected() {
        let mut i = input();
        i.city = "  ".into();
        match promissory_note(&i).unwrap_err() {
            ZaldoError::InvalidInput { field, .. } => assert_eq!(field, "city"),
            other => panic!("Expected InvalidInput for city, got: {other}"),
        }
    }
}
