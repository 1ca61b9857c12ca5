pub mod anomaly;
pub mod error;
pub mod policy;
pub mod records;
pub mod types;

#[cfg(feature = "ledger")]
pub mod ledger;

#[cfg(feature = "collections")]
pub mod collections;

#[cfg(feature = "documents")]
pub mod documents;

#[cfg(feature = "maintenance")]
pub mod maintenance;

pub use error::ZaldoError;
pub use types::*;

/// Standard result type for all ledger operations
pub type ZaldoResult<T> = Result<T, ZaldoError>;
