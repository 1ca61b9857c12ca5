//! Ledger and profit-split engine.
//!
//! A pure fold over already-fetched loans, payments and payouts: the
//! collector scopes and joins the records, the splitter divides revenue
//! between operator and investor, the aggregator sums a scope and the wallet
//! replays everything in date order to estimate liquid investor cash.

pub mod aggregate;
pub mod collector;
pub mod split;
pub mod statement;
pub mod wallet;

#[cfg(test)]
pub(crate) mod test_support;
