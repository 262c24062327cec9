mod catalog;
mod error;
mod option;
mod rule;
mod shape;

pub use catalog::{
    CatalogBuilder, FieldBuilder, FieldCatalog, FieldDefinition, FieldSemantic,
    OperatorDefinition, OperatorKind,
};
pub use error::{CatalogError, EditError};
pub use option::{FieldOption, OperatorOption};
pub use rule::{Attribute, Rule, RuleId, RuleState};
pub use shape::ValueShape;
