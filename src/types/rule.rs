use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::catalog::FieldCatalog;
use super::shape::ValueShape;

/// Stable identifier assigned to a rule when it is added.
///
/// Identifiers are never reused within a store, even after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RuleId(pub(crate) u64);

impl RuleId {
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for RuleId {
    fn from(id: u64) -> Self {
        RuleId(id)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The part of a rule an update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Attribute {
    Field,
    Operator,
    Value,
    SecondValue,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Field => write!(f, "field"),
            Attribute::Operator => write!(f, "operator"),
            Attribute::Value => write!(f, "value"),
            Attribute::SecondValue => write!(f, "second_value"),
        }
    }
}

/// Authoring progress of a single rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleState {
    /// No field chosen yet.
    Empty,
    /// Field chosen, operator pending.
    FieldSelected,
    /// Operator chosen, but the value shape still needs input.
    AwaitingValue,
    /// Nothing left to fill in.
    Complete,
}

/// One (field, operator, value[, second value]) binding authored by the user.
///
/// Values are stored exactly as supplied; validating them is left to the
/// layer that collects input. `priority` always mirrors the catalog priority
/// of `field`, or 0 when the field is empty or unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rule {
    pub(crate) id: RuleId,
    pub(crate) field: String,
    pub(crate) operator: String,
    pub(crate) value: String,
    pub(crate) second_value: String,
    pub(crate) priority: u32,
}

impl Rule {
    pub(crate) fn new(id: RuleId) -> Self {
        Self {
            id,
            field: String::new(),
            operator: String::new(),
            value: String::new(),
            second_value: String::new(),
            priority: 0,
        }
    }

    #[must_use]
    pub fn id(&self) -> RuleId {
        self.id
    }

    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    #[must_use]
    pub fn operator(&self) -> &str {
        &self.operator
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn second_value(&self) -> &str {
        &self.second_value
    }

    #[must_use]
    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// Where this rule stands in the authoring flow, given the catalog it
    /// was built against.
    #[must_use]
    pub fn state(&self, catalog: &FieldCatalog) -> RuleState {
        if self.field.is_empty() {
            return RuleState::Empty;
        }
        if self.operator.is_empty() {
            return RuleState::FieldSelected;
        }
        let filled = match crate::shape::shape_of(catalog, &self.field, &self.operator) {
            ValueShape::None => true,
            ValueShape::SingleNumber | ValueShape::Text => !self.value.is_empty(),
            ValueShape::NumberRange => !self.value.is_empty() && !self.second_value.is_empty(),
        };
        if filled {
            RuleState::Complete
        } else {
            RuleState::AwaitingValue
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} [{}] {} {}",
            self.id, self.priority, self.field, self.operator
        )?;
        if !self.value.is_empty() {
            write!(f, " {}", self.value)?;
        }
        if !self.second_value.is_empty() {
            write!(f, "..{}", self.second_value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(field: &str, operator: &str, value: &str, second: &str) -> Rule {
        let catalog = FieldCatalog::builtin();
        Rule {
            id: RuleId(1),
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
            second_value: second.into(),
            priority: catalog.priority_of(field),
        }
    }

    #[test]
    fn new_rule_is_empty() {
        let r = Rule::new(RuleId(3));
        assert_eq!(r.id(), RuleId(3));
        assert_eq!(r.field(), "");
        assert_eq!(r.operator(), "");
        assert_eq!(r.value(), "");
        assert_eq!(r.second_value(), "");
        assert_eq!(r.priority(), 0);
        assert_eq!(r.state(&FieldCatalog::builtin()), RuleState::Empty);
    }

    #[test]
    fn state_progression() {
        let catalog = FieldCatalog::builtin();
        assert_eq!(
            rule("products", "", "", "").state(&catalog),
            RuleState::FieldSelected
        );
        assert_eq!(
            rule("products", "contains_any", "", "").state(&catalog),
            RuleState::AwaitingValue
        );
        assert_eq!(
            rule("products", "contains_any", "sku-1", "").state(&catalog),
            RuleState::Complete
        );
    }

    #[test]
    fn toggle_is_complete_without_value() {
        let catalog = FieldCatalog::builtin();
        assert_eq!(
            rule("subscribed", "yes", "", "").state(&catalog),
            RuleState::Complete
        );
    }

    #[test]
    fn range_needs_both_bounds() {
        let catalog = FieldCatalog::builtin();
        assert_eq!(
            rule("cart_value", "between", "10", "").state(&catalog),
            RuleState::AwaitingValue
        );
        assert_eq!(
            rule("cart_value", "between", "10", "50").state(&catalog),
            RuleState::Complete
        );
        assert_eq!(
            rule("cart_value", "gte", "10", "").state(&catalog),
            RuleState::Complete
        );
    }

    #[test]
    fn display() {
        assert_eq!(
            rule("cart_value", "between", "10", "50").to_string(),
            "#1 [6] cart_value between 10..50"
        );
        assert_eq!(RuleId(42).to_string(), "42");
        assert_eq!(Attribute::SecondValue.to_string(), "second_value");
    }
}
