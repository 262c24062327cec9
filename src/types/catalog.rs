use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::CatalogError;

/// How an operator participates in mutual-exclusivity conflicts.
///
/// Two operators on opposite sides of an exclusive field pair conflict when
/// they share a kind, unless that kind is [`OperatorKind::Neutral`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OperatorKind {
    Inclusion,
    Exclusion,
    #[default]
    Neutral,
}

impl OperatorKind {
    /// Whether an operator of this kind is locked out by a committed operator
    /// of kind `other` on the exclusive partner field.
    #[must_use]
    pub fn conflicts_with(self, other: OperatorKind) -> bool {
        self == other && self != OperatorKind::Neutral
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatorKind::Inclusion => write!(f, "inclusion"),
            OperatorKind::Exclusion => write!(f, "exclusion"),
            OperatorKind::Neutral => write!(f, "neutral"),
        }
    }
}

/// A comparison or test applicable to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OperatorDefinition {
    pub id: String,
    pub label: String,
    pub kind: OperatorKind,
}

impl OperatorDefinition {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: OperatorKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
        }
    }
}

/// What kind of value a field collects once an operator is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FieldSemantic {
    /// Free-form text.
    #[default]
    Text,
    /// A closed yes/no operator pair; the operator choice is itself the value.
    Toggle,
    /// A currency-denominated amount. When `range_operator` is chosen the
    /// rule takes a lower and an upper bound.
    Numeric { range_operator: Option<String> },
}

/// A named eligibility dimension with a fixed priority and allowed operators.
///
/// `exclusive_with` holds the identifier of the partner field, never a
/// reference to its definition, so catalogs stay flat and serializable.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldDefinition {
    pub id: String,
    pub label: String,
    pub priority: u32,
    pub operators: Vec<OperatorDefinition>,
    pub exclusive_with: Option<String>,
    pub semantic: FieldSemantic,
}

impl FieldDefinition {
    /// Look up one of this field's operators by identifier.
    #[must_use]
    pub fn operator(&self, operator_id: &str) -> Option<&OperatorDefinition> {
        self.operators.iter().find(|op| op.id == operator_id)
    }
}

/// Immutable registry of field definitions. Thread-safe and designed to live
/// behind `Arc`.
///
/// Built with [`CatalogBuilder`], parsed from the catalog DSL with
/// [`FieldCatalog::from_dsl()`], or taken ready-made from
/// [`FieldCatalog::builtin()`].
///
/// With the `serde` feature a catalog serializes as its list of field
/// definitions, and deserializing runs the same validation as
/// [`CatalogBuilder::build()`].
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "Vec<FieldDefinition>",
        into = "Vec<FieldDefinition>"
    )
)]
pub struct FieldCatalog {
    pub(crate) fields: Vec<FieldDefinition>,
    pub(crate) index: HashMap<String, usize>,
}

impl FieldCatalog {
    /// Look up a field definition by identifier.
    #[must_use]
    pub fn lookup(&self, field_id: &str) -> Option<&FieldDefinition> {
        self.index.get(field_id).map(|&idx| &self.fields[idx])
    }

    /// The operators of a field, in declaration order. Empty for unknown fields.
    #[must_use]
    pub fn operators_of(&self, field_id: &str) -> &[OperatorDefinition] {
        match self.lookup(field_id) {
            Some(def) => &def.operators,
            None => &[],
        }
    }

    /// Look up an operator of a given field.
    #[must_use]
    pub fn operator(&self, field_id: &str, operator_id: &str) -> Option<&OperatorDefinition> {
        self.lookup(field_id)?.operator(operator_id)
    }

    /// Priority of a field, or 0 when the identifier is empty or unknown.
    #[must_use]
    pub fn priority_of(&self, field_id: &str) -> u32 {
        self.lookup(field_id).map_or(0, |def| def.priority)
    }

    /// The mutually exclusive partner declared by a field, if any.
    #[must_use]
    pub fn partner_of(&self, field_id: &str) -> Option<&str> {
        self.lookup(field_id)?.exclusive_with.as_deref()
    }

    /// All field definitions in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter()
    }

    /// The number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the catalog has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The default promotion catalog: collections, product tags, products,
    /// subscription flag, discount codes and cart value.
    #[must_use]
    pub fn builtin() -> Self {
        use OperatorKind::{Exclusion, Inclusion, Neutral};

        let fields = vec![
            FieldDefinition {
                id: "collections".into(),
                label: "Specific Collections".into(),
                priority: 1,
                operators: vec![
                    OperatorDefinition::new("contains_any", "Contains Any", Inclusion),
                    OperatorDefinition::new("is_not", "Is Not", Exclusion),
                ],
                exclusive_with: Some("products".into()),
                semantic: FieldSemantic::Text,
            },
            FieldDefinition {
                id: "product_tags".into(),
                label: "Product Tags".into(),
                priority: 2,
                operators: vec![
                    OperatorDefinition::new("contains_any", "Contains Any", Inclusion),
                    OperatorDefinition::new("is_not", "Is Not", Exclusion),
                ],
                exclusive_with: None,
                semantic: FieldSemantic::Text,
            },
            FieldDefinition {
                id: "products".into(),
                label: "Specific Products".into(),
                priority: 3,
                operators: vec![
                    OperatorDefinition::new("equals_anything", "Equals Anything", Neutral),
                    OperatorDefinition::new("contains_any", "Contains Any", Inclusion),
                    OperatorDefinition::new("is_not", "Is Not", Exclusion),
                ],
                exclusive_with: Some("collections".into()),
                semantic: FieldSemantic::Text,
            },
            FieldDefinition {
                id: "subscribed".into(),
                label: "Product Subscribed".into(),
                priority: 4,
                operators: vec![
                    OperatorDefinition::new("yes", "Yes", Neutral),
                    OperatorDefinition::new("no", "No", Neutral),
                ],
                exclusive_with: None,
                semantic: FieldSemantic::Toggle,
            },
            FieldDefinition {
                id: "discount_codes".into(),
                label: "Specific Discount Codes".into(),
                priority: 5,
                operators: vec![OperatorDefinition::new("equals", "Equals", Neutral)],
                exclusive_with: None,
                semantic: FieldSemantic::Text,
            },
            FieldDefinition {
                id: "cart_value".into(),
                label: "Cart Value Range".into(),
                priority: 6,
                operators: vec![
                    OperatorDefinition::new("gte", "Is Equal or Greater Than", Neutral),
                    OperatorDefinition::new("between", "Is Between", Neutral),
                    OperatorDefinition::new("lt", "Is Less Than", Neutral),
                ],
                exclusive_with: None,
                semantic: FieldSemantic::Numeric {
                    range_operator: Some("between".into()),
                },
            },
        ];

        let index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.id.clone(), i))
            .collect();
        Self { fields, index }
    }

    /// Parse a catalog DSL string and build a `FieldCatalog`.
    ///
    /// # Errors
    ///
    /// Returns [`QualifyError`](crate::QualifyError) on parse or validation failure.
    pub fn from_dsl(input: &str) -> Result<Self, crate::QualifyError> {
        let parsed = crate::parse::parse(input)?;
        let catalog = crate::catalog::build(parsed.fields)?;
        Ok(catalog)
    }

    /// Read a catalog DSL file and build a `FieldCatalog`.
    ///
    /// # Errors
    ///
    /// Returns [`QualifyError`](crate::QualifyError) on I/O, parse, or validation failure.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::QualifyError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_dsl(&input)
    }
}

impl TryFrom<Vec<FieldDefinition>> for FieldCatalog {
    type Error = CatalogError;

    fn try_from(fields: Vec<FieldDefinition>) -> Result<Self, Self::Error> {
        crate::catalog::build(fields)
    }
}

impl From<FieldCatalog> for Vec<FieldDefinition> {
    fn from(catalog: FieldCatalog) -> Self {
        catalog.fields
    }
}

impl Default for FieldCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Display for FieldCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let exclusive = self
            .fields
            .iter()
            .filter(|def| def.exclusive_with.is_some())
            .count();
        write!(
            f,
            "FieldCatalog({} fields, {} exclusive)",
            self.fields.len(),
            exclusive,
        )
    }
}

/// Builder for constructing a [`FieldCatalog`].
///
/// # Example
///
/// ```
/// use qualify::{CatalogBuilder, OperatorKind};
///
/// let catalog = CatalogBuilder::new()
///     .field("collections", "Specific Collections", 1, |f| {
///         f.operator("contains_any", "Contains Any", OperatorKind::Inclusion)
///             .operator("is_not", "Is Not", OperatorKind::Exclusion)
///             .exclusive_with("products")
///     })
///     .field("products", "Specific Products", 3, |f| {
///         f.operator("contains_any", "Contains Any", OperatorKind::Inclusion)
///             .exclusive_with("collections")
///     })
///     .build()
///     .unwrap();
///
/// assert_eq!(catalog.priority_of("products"), 3);
/// ```
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    fields: Vec<FieldDefinition>,
}

/// Intermediate builder passed to the field definition closure.
#[derive(Debug)]
pub struct FieldBuilder {
    operators: Vec<OperatorDefinition>,
    exclusive_with: Option<String>,
    semantic: FieldSemantic,
}

impl CatalogBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a field. Lower priorities sort first.
    #[must_use]
    pub fn field(
        mut self,
        id: &str,
        label: &str,
        priority: u32,
        f: impl FnOnce(FieldBuilder) -> FieldBuilder,
    ) -> Self {
        let builder = f(FieldBuilder {
            operators: Vec::new(),
            exclusive_with: None,
            semantic: FieldSemantic::Text,
        });
        self.fields.push(FieldDefinition {
            id: id.to_owned(),
            label: label.to_owned(),
            priority,
            operators: builder.operators,
            exclusive_with: builder.exclusive_with,
            semantic: builder.semantic,
        });
        self
    }

    /// Validate the definitions and build an immutable `FieldCatalog`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if validation fails.
    pub fn build(self) -> Result<FieldCatalog, CatalogError> {
        crate::catalog::build(self.fields)
    }
}

impl FieldBuilder {
    /// Append an operator. Operators are presented in the order they are added.
    #[must_use]
    pub fn operator(mut self, id: &str, label: &str, kind: OperatorKind) -> Self {
        self.operators.push(OperatorDefinition::new(id, label, kind));
        self
    }

    /// Declare this field mutually exclusive with `partner`.
    #[must_use]
    pub fn exclusive_with(mut self, partner: &str) -> Self {
        self.exclusive_with = Some(partner.to_owned());
        self
    }

    /// Mark the field as a yes/no flag whose operator is the value.
    #[must_use]
    pub fn toggle(mut self) -> Self {
        self.semantic = FieldSemantic::Toggle;
        self
    }

    /// Mark the field as a numeric amount.
    #[must_use]
    pub fn numeric(mut self) -> Self {
        if !matches!(self.semantic, FieldSemantic::Numeric { .. }) {
            self.semantic = FieldSemantic::Numeric {
                range_operator: None,
            };
        }
        self
    }

    /// Mark the field as numeric, with `operator_id` taking a lower and upper bound.
    #[must_use]
    pub fn range(mut self, operator_id: &str) -> Self {
        self.semantic = FieldSemantic::Numeric {
            range_operator: Some(operator_id.to_owned()),
        };
        self
    }
}
