//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The amount was negative or not a finite number.
    #[error("{field} must be a non-negative finite number, got {value}")]
    InvalidAmount { field: &'static str, value: f64 },
}

/// Generates a validated non-negative amount newtype with common trait
/// implementations.
macro_rules! define_amount {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
        pub struct $name(f64);

        impl $name {
            /// The zero amount.
            pub const ZERO: Self = Self(0.0);

            /// Creates a new amount after validation.
            ///
            /// Returns an error if the value is negative, NaN, or infinite.
            pub fn new(value: f64) -> Result<Self, ValidationError> {
                if !value.is_finite() || value < 0.0 {
                    return Err(ValidationError::InvalidAmount {
                        field: $field_name,
                        value,
                    });
                }
                Ok(Self(value))
            }

            /// Creates an amount, coercing invalid values to zero.
            ///
            /// NaN, infinite, and negative values all become 0.0.
            #[must_use]
            pub const fn clamped(value: f64) -> Self {
                if value.is_finite() && value > 0.0 {
                    Self(value)
                } else {
                    Self(0.0)
                }
            }

            /// Returns the inner f64 value.
            #[must_use]
            pub const fn value(self) -> f64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{:.2}", self.0)
            }
        }

        impl TryFrom<f64> for $name {
            type Error = ValidationError;

            fn try_from(value: f64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for f64 {
            fn from(amount: $name) -> Self {
                amount.0
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                self.0.serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let value = f64::deserialize(deserializer)?;
                // Clamp on deserialization to be lenient with external data
                Ok(Self::clamped(value))
            }
        }
    };
}

define_amount!(
    /// A monetary rate in currency units, e.g. per hour or per kilometer.
    ///
    /// Rates are non-negative by construction. Rejecting negative input is
    /// the caller's job; this type makes the invalid state unrepresentable.
    Rate, "rate"
);

define_amount!(
    /// A travel distance in kilometers.
    Km, "distance"
);
