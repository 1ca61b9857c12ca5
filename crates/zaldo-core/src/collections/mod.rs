pub mod arrears;
pub mod schedule;
