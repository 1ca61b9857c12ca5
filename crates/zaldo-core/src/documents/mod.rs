//! Text for the documents handed to clients: amounts in words, promissory
//! notes, payment receipts and the discharge certificate. Layout and
//! rendering live outside this crate.

pub mod amount_words;
pub mod payment_receipt;
pub mod promissory_note;
pub mod settlement;
