//! `stockwise-core`: shared building blocks for the forecasting engine.
//!
//! This crate contains **pure value types** (no IO, no storage, no logging setup).

pub mod error;
pub mod id;
pub mod month;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use id::{ItemId, MaterialId};
pub use month::YearMonth;
pub use value_object::ValueObject;
