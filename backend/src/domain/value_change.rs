//! Tri-state wrapper for fields of partial updates.

use serde::{Deserialize, Deserializer};

/// Whether a field of an update was supplied at all.
///
/// `Absent` means the caller omitted the field and the stored value must be
/// left alone. `Present` carries the supplied value; with `T = Option<_>` an
/// explicit `null` arrives as `Present(None)` and clears the stored value.
///
/// Deserialization only ever produces `Present`. Pair it with
/// `#[serde(default)]` so a missing key becomes `Absent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueChange<T> {
    Absent,
    Present(T),
}

impl<T> ValueChange<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, ValueChange::Present(_))
    }

    pub fn as_present(&self) -> Option<&T> {
        match self {
            ValueChange::Present(value) => Some(value),
            ValueChange::Absent => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ValueChange<U> {
        match self {
            ValueChange::Present(value) => ValueChange::Present(f(value)),
            ValueChange::Absent => ValueChange::Absent,
        }
    }

    /// Overwrite `target` when present. Returns whether anything was written.
    pub fn apply_to(self, target: &mut T) -> bool {
        match self {
            ValueChange::Present(value) => {
                *target = value;
                true
            }
            ValueChange::Absent => false,
        }
    }
}

impl<T> ValueChange<Option<T>> {
    /// Narrow a nullable change to a non-nullable one.
    ///
    /// Only for fields whose `null` has already been rejected by validation;
    /// a remaining `Present(None)` is dropped.
    pub fn into_required(self) -> ValueChange<T> {
        match self {
            ValueChange::Present(Some(value)) => ValueChange::Present(value),
            ValueChange::Present(None) | ValueChange::Absent => ValueChange::Absent,
        }
    }
}

impl<T> Default for ValueChange<T> {
    fn default() -> Self {
        ValueChange::Absent
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ValueChange<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(ValueChange::Present)
    }
}
