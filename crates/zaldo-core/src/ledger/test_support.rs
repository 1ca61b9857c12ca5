//! Record builders shared by the ledger unit tests.

pub use crate::records::{LoanStatus, PaymentType};

use crate::ledger::collector::Scope;
use crate::records::{Client, Investor, LedgerBook, Loan, Payment, Payout};
use crate::types::Money;
use rust_decimal_macros::dec;

pub fn book_with_investors(ids: &[&str]) -> LedgerBook {
    LedgerBook {
        investors: ids
            .iter()
            .map(|id| Investor {
                id: id.to_string(),
                full_name: format!("Socia {id}"),
            })
            .collect(),
        clients: vec![Client {
            id: "C1".into(),
            full_name: "Julio Perez".into(),
            document_id: None,
        }],
        ..LedgerBook::default()
    }
}

pub fn investor_scope(id: &str) -> Scope {
    Scope::Investor {
        investor_id: id.to_string(),
    }
}

pub fn loan(id: &str, investor_id: &str, amount: Money, start_date: &str) -> Loan {
    Loan {
        id: id.into(),
        client_id: "C1".into(),
        investor_id: investor_id.into(),
        amount,
        interest_rate: dec!(10),
        admin_fee_percent: Some(dec!(40)),
        start_date: start_date.into(),
        status: LoanStatus::Active,
        cutoff_day: None,
        paid_until: None,
    }
}

pub fn payment(id: &str, loan_id: &str, amount: Money, kind: PaymentType, date: &str) -> Payment {
    Payment {
        id: id.into(),
        loan_id: loan_id.into(),
        amount,
        payment_date: date.into(),
        payment_type: kind,
        late_fee_waived: false,
    }
}

pub fn payout(id: &str, investor_id: &str, amount: Money, date: &str) -> Payout {
    Payout {
        id: id.into(),
        investor_id: investor_id.into(),
        amount,
        date: date.into(),
        notes: None,
    }
}
