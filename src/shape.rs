use crate::{FieldCatalog, FieldSemantic, ValueShape};

/// Resolve the value input a (field, operator) pair requires.
///
/// Total over all inputs: an empty field or operator yields
/// [`ValueShape::None`], and a field the catalog does not know falls through
/// to [`ValueShape::Text`].
#[must_use]
pub fn shape_of(catalog: &FieldCatalog, field_id: &str, operator_id: &str) -> ValueShape {
    if field_id.is_empty() || operator_id.is_empty() {
        return ValueShape::None;
    }
    let Some(def) = catalog.lookup(field_id) else {
        return ValueShape::Text;
    };
    match &def.semantic {
        FieldSemantic::Toggle => ValueShape::None,
        FieldSemantic::Numeric { range_operator } => {
            if range_operator.as_deref() == Some(operator_id) {
                ValueShape::NumberRange
            } else {
                ValueShape::SingleNumber
            }
        }
        FieldSemantic::Text => ValueShape::Text,
    }
}

/// Input hint for a value slot: `"Enter amount"` for numeric shapes, and
/// `"Enter "` plus the field identifier with underscores as spaces for text.
#[must_use]
pub fn placeholder(field_id: &str, shape: ValueShape) -> Option<String> {
    match shape {
        ValueShape::None => None,
        ValueShape::SingleNumber | ValueShape::NumberRange => Some("Enter amount".to_owned()),
        ValueShape::Text => Some(format!("Enter {}", field_id.replace('_', " "))),
    }
}
