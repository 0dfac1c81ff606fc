//! # Validation
//!
//! Declared constraints for bound request input. Validation is aggregated:
//! every rule of every field runs before the outcome is decided, so a caller
//! sees all problems in one round trip.

pub mod errors;
pub mod rules;

pub use errors::{ErrorCollection, ValidationFailed};
pub use rules::field;

/// Implemented by every input type that carries declared rules.
pub trait Validate {
    /// Record every violation of `self` into `errors`.
    fn validate(&self, errors: &mut ErrorCollection);
}

/// Run all declared rules of `input`, failing with the complete violation set.
pub fn validate<T: Validate + ?Sized>(input: &T) -> Result<(), ValidationFailed> {
    let mut errors = ErrorCollection::new();
    input.validate(&mut errors);
    errors.into_result()
}
