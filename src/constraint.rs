//! Advisory mutual-exclusivity checks.
//!
//! Every function here is pure: the rule set is passed in explicitly and is
//! never mutated. The checks describe what a selection UI should disable;
//! they never fail, and an inconsistent rule set resolves to "no conflict".

use tracing::warn;

use crate::{FieldCatalog, FieldOption, OperatorDefinition, OperatorOption, Rule};

/// Whether selecting `field_id` is blocked because some rule already uses
/// the field's exclusive partner, with or without an operator.
#[must_use]
pub fn is_field_disabled(catalog: &FieldCatalog, field_id: &str, rules: &[Rule]) -> bool {
    let Some(partner) = catalog.partner_of(field_id) else {
        return false;
    };
    rules.iter().any(|rule| rule.field == partner)
}

/// Whether `operator` on `field_id` conflicts with the operator committed by
/// the first partner-field rule that has one.
///
/// Operators conflict when they share a kind other than neutral.
#[must_use]
pub fn is_operator_disabled(
    catalog: &FieldCatalog,
    field_id: &str,
    operator: &OperatorDefinition,
    rules: &[Rule],
) -> bool {
    let Some(partner) = catalog.partner_of(field_id) else {
        return false;
    };
    let Some(related) = rules
        .iter()
        .find(|rule| rule.field == partner && !rule.operator.is_empty())
    else {
        return false;
    };
    let Some(related_op) = catalog.operator(&related.field, &related.operator) else {
        warn!(
            rule = %related.id,
            field = %related.field,
            operator = %related.operator,
            "related rule has an operator the catalog cannot resolve; treating as no conflict"
        );
        return false;
    };
    operator.kind.conflicts_with(related_op.kind)
}

/// The operators of `field_id` in catalog order, each flagged with
/// [`is_operator_disabled`]. Empty for unknown fields.
#[must_use]
pub fn operator_options<'c>(
    catalog: &'c FieldCatalog,
    field_id: &str,
    rules: &[Rule],
) -> Vec<OperatorOption<'c>> {
    catalog
        .operators_of(field_id)
        .iter()
        .map(|definition| OperatorOption {
            definition,
            disabled: is_operator_disabled(catalog, field_id, definition, rules),
        })
        .collect()
}

/// Every catalog field in declaration order, each flagged with
/// [`is_field_disabled`].
#[must_use]
pub fn field_options<'c>(catalog: &'c FieldCatalog, rules: &[Rule]) -> Vec<FieldOption<'c>> {
    catalog
        .fields()
        .map(|definition| FieldOption {
            definition,
            disabled: is_field_disabled(catalog, &definition.id, rules),
        })
        .collect()
}
