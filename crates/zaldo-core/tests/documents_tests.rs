use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use serde_json::json;

use zaldo_core::documents::amount_words::amount_in_words;
use zaldo_core::documents::payment_receipt::{payment_receipt, PaymentReceiptInput};
use zaldo_core::documents::promissory_note::{promissory_note, PromissoryNoteInput};
use zaldo_core::documents::settlement::{settlement_certificate, SettlementInput};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn book() -> serde_json::Value {
    json!({
        "investors": [ { "id": "ana", "full_name": "Ana Ruiz" } ],
        "clients": [
            { "id": "C1", "full_name": "Julio Perez", "document_id": "1020304" }
        ],
        "loans": [
            {
                "id": "L1", "client_id": "C1", "investor_id": "ana",
                "amount": "3200000", "interest_rate": "10",
                "start_date": "2025-01-07T09:30:00Z", "status": "paid"
            }
        ],
        "payments": [
            {
                "id": "a1b2c3d4-e5f6", "loan_id": "L1", "amount": "320000",
                "payment_date": "2025-02-07 11:00:00", "payment_type": "interest"
            },
            {
                "id": "f00dbabe-0001", "loan_id": "L1", "amount": "3200000",
                "payment_date": "2025-06-07", "payment_type": "principal"
            }
        ]
    })
}

// ---------------------------------------------------------------------------
// Amounts
// ---------------------------------------------------------------------------

#[test]
fn test_note_amount_words() {
    assert_eq!(
        amount_in_words(dec!(3_200_000)).unwrap(),
        "TRES MILLONES DOSCIENTOS MIL PESOS MONEDA CORRIENTE"
    );
}

// ---------------------------------------------------------------------------
// Documents from store rows
// ---------------------------------------------------------------------------

#[test]
fn test_promissory_note_from_store_rows() {
    let input: PromissoryNoteInput = serde_json::from_value(json!({
        "book": book(),
        "loan_id": "L1",
        "city": "Barranquilla",
        "issued_on": "2025-01-07",
        "lender_document": "52.111.222"
    }))
    .unwrap();
    let note = promissory_note(&input).unwrap().result;
    assert_eq!(note.note_number, "L1");
    assert_eq!(note.amount_line, "SUMA POR: $ 3.200.000 M/CTE");
    assert_eq!(note.place_and_date, "Barranquilla, a 7 de enero de 2025");
    assert_eq!(note.debtor.name, "Julio Perez");
    assert_eq!(note.creditor.document, "52.111.222");
    assert!(note.paragraphs[0].contains("TRES MILLONES DOSCIENTOS MIL PESOS MONEDA CORRIENTE"));
}

#[test]
fn test_receipts_name_the_concept() {
    let receipt_for = |payment_id: &str| {
        let input: PaymentReceiptInput = serde_json::from_value(json!({
            "book": book(),
            "payment_id": payment_id,
            "issued_on": "2025-06-08"
        }))
        .unwrap();
        payment_receipt(&input).unwrap()
    };

    let interest = receipt_for("a1b2c3d4-e5f6");
    assert_eq!(interest.result.receipt_id, "A1B2C3D4");
    assert_eq!(interest.result.concept, "PAGO DE INTERESES");
    assert_eq!(interest.result.payment_date, "7 de febrero de 2025");
    assert!(interest.warnings.is_empty());

    let principal = receipt_for("f00dbabe-0001");
    assert_eq!(principal.result.concept, "ABONO A CAPITAL");
    assert_eq!(principal.result.amount_formatted, "$ 3.200.000");
}

#[test]
fn test_certificate_reads_timestamp_start_date() {
    let input: SettlementInput = serde_json::from_value(json!({
        "book": book(),
        "loan_id": "L1",
        "issued_on": "2025-06-08"
    }))
    .unwrap();
    let out = settlement_certificate(&input).unwrap();
    assert!(out.result.paragraphs[0].contains("7 de enero de 2025"));
    assert!(out.warnings.is_empty());
}
