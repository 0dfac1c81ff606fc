//! Declarative field rules.
//!
//! Every rule records into the shared [`ErrorCollection`] and hands the
//! checker back, so all rules for a field run even after one has failed:
//!
//! ```ignore
//! field(&mut errors, "email")
//!     .not_blank(&email)
//!     .max_chars(&email, 255)
//!     .email(&email);
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use super::errors::ErrorCollection;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .expect("email pattern is a valid regex")
});

/// Start checking `name`.
pub fn field<'a>(errors: &'a mut ErrorCollection, name: &'a str) -> FieldCheck<'a> {
    FieldCheck { errors, name }
}

pub struct FieldCheck<'a> {
    errors: &'a mut ErrorCollection,
    name: &'a str,
}

impl<'a> FieldCheck<'a> {
    fn fail(&mut self, message: String) {
        self.errors.add(self.name, message);
    }

    /// Fails when a required value was not supplied at all.
    pub fn required<T>(mut self, value: Option<&T>) -> Self {
        if value.is_none() {
            let message = format!("{} is required", self.name);
            self.fail(message);
        }
        self
    }

    /// Fails when a value was supplied as an explicit `null`.
    pub fn not_null<T>(mut self, value: Option<&T>) -> Self {
        if value.is_none() {
            let message = format!("{} cannot be null", self.name);
            self.fail(message);
        }
        self
    }

    pub fn not_blank(mut self, value: &str) -> Self {
        if value.trim().is_empty() {
            let message = format!("{} cannot be blank", self.name);
            self.fail(message);
        }
        self
    }

    pub fn max_chars(mut self, value: &str, max: usize) -> Self {
        if value.chars().count() > max {
            let message = format!("{} cannot exceed {} characters", self.name, max);
            self.fail(message);
        }
        self
    }

    pub fn email(mut self, value: &str) -> Self {
        if !EMAIL_PATTERN.is_match(value.trim()) {
            let message = format!("{} must be a valid email address", self.name);
            self.fail(message);
        }
        self
    }

    pub fn at_least(mut self, value: i64, min: i64) -> Self {
        if value < min {
            let message = format!("{} must be at least {}", self.name, min);
            self.fail(message);
        }
        self
    }

    pub fn at_most(mut self, value: i64, max: i64) -> Self {
        if value > max {
            let message = format!("{} must be at most {}", self.name, max);
            self.fail(message);
        }
        self
    }
}
