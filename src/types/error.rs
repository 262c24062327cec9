use thiserror::Error;

use super::rule::RuleId;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate field '{field}'")]
    DuplicateField { field: String },

    #[error("duplicate operator '{operator}' in field '{field}'")]
    DuplicateOperator { field: String, operator: String },

    #[error("field '{field}' is exclusive with undefined field '{partner}'")]
    UndefinedPartner { field: String, partner: String },

    #[error("field '{field}' cannot be exclusive with itself")]
    SelfExclusive { field: String },

    #[error("range operator '{operator}' is not an operator of field '{field}'")]
    UndefinedRangeOperator { field: String, operator: String },
}

/// Rejections produced by checked edits.
///
/// Plain edits never fail; these are only returned by
/// [`RuleEditor::update_checked()`](crate::RuleEditor::update_checked).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("no rule with id {id}")]
    UnknownRule { id: RuleId },

    #[error("unknown field '{field}'")]
    UnknownField { field: String },

    #[error("field '{field}' has no operator '{operator}'")]
    UnknownOperator { field: String, operator: String },

    #[error("rule {id} has no field selected")]
    NoFieldSelected { id: RuleId },

    #[error("field '{field}' is excluded by an existing '{partner}' rule")]
    FieldDisabled { field: String, partner: String },

    #[error("operator '{operator}' on '{field}' conflicts with an existing '{partner}' rule")]
    OperatorDisabled {
        field: String,
        operator: String,
        partner: String,
    },
}
