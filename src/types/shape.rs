use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The value input contract a (field, operator) pair requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ValueShape {
    /// Nothing to collect.
    None,
    /// One non-negative amount.
    SingleNumber,
    /// A lower and an upper non-negative amount.
    NumberRange,
    /// Free-form text.
    Text,
}

impl ValueShape {
    /// Whether the shape collects a primary value.
    #[must_use]
    pub fn takes_value(self) -> bool {
        self != ValueShape::None
    }

    /// Whether the shape collects a second value.
    #[must_use]
    pub fn takes_second_value(self) -> bool {
        self == ValueShape::NumberRange
    }

    /// Whether the collected values are amounts.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(self, ValueShape::SingleNumber | ValueShape::NumberRange)
    }
}

impl fmt::Display for ValueShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueShape::None => write!(f, "none"),
            ValueShape::SingleNumber => write!(f, "number"),
            ValueShape::NumberRange => write!(f, "number range"),
            ValueShape::Text => write!(f, "text"),
        }
    }
}
