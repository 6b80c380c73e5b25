//! Domain layer - Core types and invariants
//!
//! Pure types and logic for mesh routing policy and chaos experiments:
//! the selector codec, the fault-injection rule model and its validator,
//! and the recipe/experiment vocabulary. No I/O and no async here.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
