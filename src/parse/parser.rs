use crate::FieldDefinition;

/// The result of parsing a catalog DSL input string. Not yet validated.
#[derive(Debug)]
pub struct ParsedCatalog {
    pub fields: Vec<FieldDefinition>,
}
