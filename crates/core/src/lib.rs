//! `pantry-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the validated item key, the quantity type and the domain error model.

pub mod error;
pub mod name;
pub mod quantity;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use name::ItemName;
pub use quantity::Quantity;
pub use value_object::ValueObject;
