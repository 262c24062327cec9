//! Authoring-time constraint and ordering engine for promotion eligibility
//! rules.
//!
//! A [`FieldCatalog`] describes the eligibility fields, their priorities,
//! operators and exclusivity pairs. A [`RuleEditor`] owns the rules being
//! authored, keeps them sorted by priority, and answers which fields and
//! operators a UI should disable and what value each rule needs.

mod catalog;
mod constraint;
mod editor;
mod error;
pub mod parse;
mod shape;
mod store;
mod types;

#[cfg(feature = "binary-snapshot")]
pub mod serial;

pub use constraint::{field_options, is_field_disabled, is_operator_disabled, operator_options};
pub use editor::{RuleEditor, SaveHandler};
pub use error::QualifyError;
pub use shape::{placeholder, shape_of};
pub use store::{reduce, Action, RuleStore};
pub use types::{
    Attribute, CatalogBuilder, CatalogError, EditError, FieldBuilder, FieldCatalog,
    FieldDefinition, FieldOption, FieldSemantic, OperatorDefinition, OperatorKind,
    OperatorOption, Rule, RuleId, RuleState, ValueShape,
};
