use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::constraint;
use crate::store::{self, Action, RuleStore};
use crate::{
    Attribute, EditError, FieldCatalog, FieldOption, OperatorOption, Rule, RuleId, RuleState,
    ValueShape,
};

/// Receives the rule list when a session is saved.
///
/// Implemented for every `FnMut(&[Rule])`. The editor does not observe the
/// outcome; durability and error reporting belong to the handler.
pub trait SaveHandler {
    fn save(&mut self, rules: &[Rule]);
}

impl<F> SaveHandler for F
where
    F: FnMut(&[Rule]),
{
    fn save(&mut self, rules: &[Rule]) {
        self(rules);
    }
}

/// An authoring session over one rule collection.
///
/// Composes the catalog, the rule store and the resolvers into the
/// operations a UI or CLI drives. The catalog is shared; the rules are owned
/// exclusively by the editor.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use qualify::{Attribute, FieldCatalog, RuleEditor, ValueShape};
///
/// let mut editor = RuleEditor::new(Arc::new(FieldCatalog::builtin()));
/// let id = editor.add();
/// editor.update(id, Attribute::Field, "cart_value");
/// editor.update(id, Attribute::Operator, "between");
///
/// assert_eq!(editor.value_shape("cart_value", "between"), ValueShape::NumberRange);
/// assert_eq!(editor.snapshot()[0].priority(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct RuleEditor {
    catalog: Arc<FieldCatalog>,
    store: RuleStore,
}

impl RuleEditor {
    #[must_use]
    pub fn new(catalog: Arc<FieldCatalog>) -> Self {
        Self {
            catalog,
            store: RuleStore::new(),
        }
    }

    /// Resume a session from previously saved rules.
    #[must_use]
    pub fn from_snapshot(catalog: Arc<FieldCatalog>, rules: Vec<Rule>) -> Self {
        let store = RuleStore::from_rules(&catalog, rules);
        Self { catalog, store }
    }

    #[must_use]
    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    /// Apply a raw action. Returns the new rule's id for [`Action::Add`].
    pub fn dispatch(&mut self, action: &Action) -> Option<RuleId> {
        let added = matches!(action, Action::Add).then(|| self.store.next_id());
        let state = std::mem::take(&mut self.store);
        self.store = store::reduce(&self.catalog, state, action);
        added
    }

    /// Append a new empty rule and return its id.
    pub fn add(&mut self) -> RuleId {
        let id = self.store.next_id();
        self.dispatch(&Action::Add);
        id
    }

    /// Remove a rule. Unknown ids are ignored.
    pub fn remove(&mut self, id: RuleId) {
        self.dispatch(&Action::Remove(id));
    }

    /// Change one attribute of a rule. Unknown ids are ignored.
    ///
    /// Advisory constraints are not enforced here; use
    /// [`update_checked`](Self::update_checked) to reject disabled choices.
    pub fn update(&mut self, id: RuleId, attribute: Attribute, value: impl Into<String>) {
        self.dispatch(&Action::update(id, attribute, value));
    }

    /// Like [`update`](Self::update), but rejects edits the constraint
    /// resolver would disable, and reports unknown rules, fields and
    /// operators instead of ignoring them.
    ///
    /// The rule being edited is not counted against itself. Value edits are
    /// never rejected.
    ///
    /// # Errors
    ///
    /// Returns [`EditError`] and leaves the rules untouched if the edit is
    /// not allowed.
    pub fn update_checked(
        &mut self,
        id: RuleId,
        attribute: Attribute,
        value: impl Into<String>,
    ) -> Result<(), EditError> {
        let value = value.into();
        self.check(id, attribute, &value)?;
        self.dispatch(&Action::Update {
            id,
            attribute,
            value,
        });
        Ok(())
    }

    fn check(&self, id: RuleId, attribute: Attribute, value: &str) -> Result<(), EditError> {
        let rule = self.store.get(id).ok_or(EditError::UnknownRule { id })?;
        let others: Vec<Rule> = self
            .store
            .rules()
            .iter()
            .filter(|r| r.id != id)
            .cloned()
            .collect();

        match attribute {
            Attribute::Field => {
                if value.is_empty() {
                    return Ok(());
                }
                if self.catalog.lookup(value).is_none() {
                    return Err(EditError::UnknownField {
                        field: value.to_owned(),
                    });
                }
                if constraint::is_field_disabled(&self.catalog, value, &others) {
                    return Err(EditError::FieldDisabled {
                        field: value.to_owned(),
                        partner: self.partner(value),
                    });
                }
            }
            Attribute::Operator => {
                if rule.field.is_empty() {
                    return Err(EditError::NoFieldSelected { id });
                }
                if value.is_empty() {
                    return Ok(());
                }
                let operator = self.catalog.operator(&rule.field, value).ok_or_else(|| {
                    EditError::UnknownOperator {
                        field: rule.field.clone(),
                        operator: value.to_owned(),
                    }
                })?;
                if constraint::is_operator_disabled(&self.catalog, &rule.field, operator, &others) {
                    return Err(EditError::OperatorDisabled {
                        field: rule.field.clone(),
                        operator: value.to_owned(),
                        partner: self.partner(&rule.field),
                    });
                }
            }
            Attribute::Value | Attribute::SecondValue => {}
        }
        Ok(())
    }

    fn partner(&self, field_id: &str) -> String {
        self.catalog
            .partner_of(field_id)
            .unwrap_or_default()
            .to_owned()
    }

    /// All catalog fields, flagged against the current rules.
    #[must_use]
    pub fn field_options(&self) -> Vec<FieldOption<'_>> {
        constraint::field_options(&self.catalog, self.store.rules())
    }

    /// The operators of `field_id`, flagged against the current rules.
    #[must_use]
    pub fn operator_options(&self, field_id: &str) -> Vec<OperatorOption<'_>> {
        constraint::operator_options(&self.catalog, field_id, self.store.rules())
    }

    #[must_use]
    pub fn is_field_disabled(&self, field_id: &str) -> bool {
        constraint::is_field_disabled(&self.catalog, field_id, self.store.rules())
    }

    #[must_use]
    pub fn value_shape(&self, field_id: &str, operator_id: &str) -> ValueShape {
        crate::shape::shape_of(&self.catalog, field_id, operator_id)
    }

    /// Input hint for a rule's value slot, if it has one.
    #[must_use]
    pub fn placeholder(&self, id: RuleId) -> Option<String> {
        let rule = self.store.get(id)?;
        let shape = self.value_shape(&rule.field, &rule.operator);
        crate::shape::placeholder(&rule.field, shape)
    }

    #[must_use]
    pub fn get(&self, id: RuleId) -> Option<&Rule> {
        self.store.get(id)
    }

    #[must_use]
    pub fn state_of(&self, id: RuleId) -> Option<RuleState> {
        self.store.get(id).map(|r| r.state(&self.catalog))
    }

    /// Ids of rules that still need input, in rule order.
    #[must_use]
    pub fn incomplete(&self) -> Vec<RuleId> {
        self.store
            .rules()
            .iter()
            .filter(|r| r.state(&self.catalog) != RuleState::Complete)
            .map(Rule::id)
            .collect()
    }

    /// The current rules, in order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        self.store.rules()
    }

    /// An owned copy of the current rules, in order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Rule> {
        self.store.snapshot()
    }

    /// Hand the current rules to `handler`. Incomplete rules are included.
    pub fn save(&self, handler: &mut impl SaveHandler) {
        debug!(
            rules = self.store.len(),
            incomplete = self.incomplete().len(),
            "handing off rules"
        );
        handler.save(self.store.rules());
    }
}

impl fmt::Display for RuleEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RuleEditor({} rules, {} incomplete)",
            self.store.len(),
            self.incomplete().len(),
        )
    }
}
