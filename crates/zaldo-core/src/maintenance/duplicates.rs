use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::maintenance::operations::MaintenanceOp;
use crate::records::{LedgerBook, Payment, PaymentType};
use crate::types::*;

/// Payments recorded more than once: same loan, amount, day and type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub loan_id: String,
    pub amount: Money,
    pub payment_date: String,
    pub payment_type: PaymentType,
    /// All members, in book order
    pub payment_ids: Vec<String>,
    /// First recorded member
    pub keep: String,
    /// Members that should be removed
    pub redundant: Vec<String>,
}

#[derive(Hash, PartialEq, Eq)]
struct PaymentKey {
    loan_id: String,
    amount: Money,
    day: String,
    payment_type: PaymentType,
}

impl PaymentKey {
    fn of(payment: &Payment) -> Self {
        // Same calendar day regardless of how the timestamp was written.
        let day = match payment.date() {
            Some(d) => d.to_string(),
            None => payment.payment_date.trim().to_string(),
        };
        Self {
            loan_id: payment.loan_id.clone(),
            amount: payment.amount.normalize(),
            day,
            payment_type: payment.payment_type,
        }
    }
}

/// Groups of payments that look like double submissions.
///
/// The first payment of each group in book order is kept. Groups come out in
/// the order their first member appears.
pub fn find_duplicate_payments(book: &LedgerBook) -> Vec<DuplicateGroup> {
    let mut index: HashMap<PaymentKey, usize> = HashMap::new();
    let mut buckets: Vec<Vec<&Payment>> = Vec::new();

    for payment in &book.payments {
        let slot = *index.entry(PaymentKey::of(payment)).or_insert_with(|| {
            buckets.push(Vec::new());
            buckets.len() - 1
        });
        buckets[slot].push(payment);
    }

    let groups: Vec<DuplicateGroup> = buckets
        .into_iter()
        .filter(|b| b.len() > 1)
        .map(|members| {
            let first = members[0];
            let payment_ids: Vec<String> = members.iter().map(|p| p.id.clone()).collect();
            DuplicateGroup {
                loan_id: first.loan_id.clone(),
                amount: first.amount,
                payment_date: PaymentKey::of(first).day,
                payment_type: first.payment_type,
                keep: first.id.clone(),
                redundant: payment_ids[1..].to_vec(),
                payment_ids,
            }
        })
        .collect();

    tracing::debug!(groups = groups.len(), "duplicate payment scan");
    groups
}

/// One delete per redundant payment.
pub fn plan_duplicate_removal(groups: &[DuplicateGroup]) -> Vec<MaintenanceOp> {
    groups
        .iter()
        .flat_map(|g| g.redundant.iter())
        .map(|id| MaintenanceOp::DeletePayment {
            payment_id: id.clone(),
        })
        .collect()
}
