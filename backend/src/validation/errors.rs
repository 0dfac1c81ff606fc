//! Request-scoped aggregation of field violations.

use std::fmt;

/// Field path → messages, kept in the order fields were first reported.
///
/// A fresh collection is built for every validation attempt and dropped once
/// the request has been accepted or rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorCollection {
    fields: Vec<(String, Vec<String>)>,
}

impl ErrorCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation for `field`. Messages for the same field are kept
    /// in insertion order.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        let message = message.into();

        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, messages)) => messages.push(message),
            None => self.fields.push((field, vec![message])),
        }
    }

    /// Total number of recorded messages. Anything above zero fails validation.
    pub fn count(&self) -> usize {
        self.fields.iter().map(|(_, messages)| messages.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of distinct fields with at least one violation
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, messages)| messages.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(name, messages)| (name.as_str(), messages.as_slice()))
    }

    /// Close the collection: `Ok` when nothing was recorded, otherwise the
    /// whole set wrapped in [`ValidationFailed`].
    pub fn into_result(self) -> Result<(), ValidationFailed> {
        if self.count() == 0 {
            Ok(())
        } else {
            Err(ValidationFailed { errors: self })
        }
    }
}

impl fmt::Display for ErrorCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        write!(f, "{}", rendered.join("; "))
    }
}

/// The input failed one or more declared rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation failed with {} violation(s): {errors}", .errors.count())]
pub struct ValidationFailed {
    pub errors: ErrorCollection,
}
