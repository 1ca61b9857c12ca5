//! Audited corrections to stored records.
//!
//! Operations run against an in-memory copy of the book; persisting the
//! result is up to the caller.

pub mod duplicates;
pub mod operations;
