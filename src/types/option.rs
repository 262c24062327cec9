use super::catalog::{FieldDefinition, OperatorDefinition};

/// A field as offered to a selection UI, with its advisory disabled flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldOption<'c> {
    pub definition: &'c FieldDefinition,
    pub disabled: bool,
}

/// An operator as offered to a selection UI, with its advisory disabled flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorOption<'c> {
    pub definition: &'c OperatorDefinition,
    pub disabled: bool,
}

impl FieldOption<'_> {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.definition.id
    }
}

impl OperatorOption<'_> {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.definition.id
    }
}
