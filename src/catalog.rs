use std::collections::{HashMap, HashSet};

use crate::{CatalogError, FieldCatalog, FieldDefinition, FieldSemantic};

pub(crate) fn build(fields: Vec<FieldDefinition>) -> Result<FieldCatalog, CatalogError> {
    let index = index_fields(&fields)?;
    check_operators(&fields)?;
    check_partners(&fields, &index)?;
    check_range_operators(&fields)?;

    Ok(FieldCatalog { fields, index })
}

fn index_fields(fields: &[FieldDefinition]) -> Result<HashMap<String, usize>, CatalogError> {
    let mut index = HashMap::with_capacity(fields.len());
    for (i, def) in fields.iter().enumerate() {
        if index.insert(def.id.clone(), i).is_some() {
            return Err(CatalogError::DuplicateField {
                field: def.id.clone(),
            });
        }
    }
    Ok(index)
}

fn check_operators(fields: &[FieldDefinition]) -> Result<(), CatalogError> {
    for def in fields {
        let mut seen = HashSet::new();
        for op in &def.operators {
            if !seen.insert(op.id.as_str()) {
                return Err(CatalogError::DuplicateOperator {
                    field: def.id.clone(),
                    operator: op.id.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Partners must exist; the pairing does not have to be declared on both sides.
fn check_partners(
    fields: &[FieldDefinition],
    index: &HashMap<String, usize>,
) -> Result<(), CatalogError> {
    for def in fields {
        let Some(partner) = &def.exclusive_with else {
            continue;
        };
        if partner == &def.id {
            return Err(CatalogError::SelfExclusive {
                field: def.id.clone(),
            });
        }
        if !index.contains_key(partner) {
            return Err(CatalogError::UndefinedPartner {
                field: def.id.clone(),
                partner: partner.clone(),
            });
        }
    }
    Ok(())
}

fn check_range_operators(fields: &[FieldDefinition]) -> Result<(), CatalogError> {
    for def in fields {
        if let FieldSemantic::Numeric {
            range_operator: Some(range),
        } = &def.semantic
        {
            if def.operator(range).is_none() {
                return Err(CatalogError::UndefinedRangeOperator {
                    field: def.id.clone(),
                    operator: range.clone(),
                });
            }
        }
    }
    Ok(())
}
