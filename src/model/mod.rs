pub mod entity;

mod error;
pub use error::{ValidationError, ValidationResult};
