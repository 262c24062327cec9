use tracing::debug;

use crate::{Attribute, FieldCatalog, Rule, RuleId};

/// A state transition applied by [`reduce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Append a new empty rule.
    Add,
    /// Delete a rule. Unknown ids are ignored.
    Remove(RuleId),
    /// Change one attribute of a rule. Unknown ids are ignored.
    Update {
        id: RuleId,
        attribute: Attribute,
        value: String,
    },
}

impl Action {
    pub fn update(id: RuleId, attribute: Attribute, value: impl Into<String>) -> Self {
        Action::Update {
            id,
            attribute,
            value: value.into(),
        }
    }
}

/// The ordered rule collection.
///
/// Always sorted ascending by priority. Among equal priorities, rules appear
/// in the order in which they took on that priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleStore {
    rules: Vec<Rule>,
    next_id: u64,
}

impl Default for RuleStore {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            next_id: 1,
        }
    }
}

impl RuleStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from previously saved rules.
    ///
    /// Priorities are re-derived from `catalog`, the collection is re-sorted
    /// with ties kept in the given order, and new ids continue after the
    /// largest restored id.
    #[must_use]
    pub fn from_rules(catalog: &FieldCatalog, mut rules: Vec<Rule>) -> Self {
        for rule in &mut rules {
            rule.priority = catalog.priority_of(&rule.field);
        }
        let next_id = rules.iter().map(|r| r.id.0 + 1).max().unwrap_or(1);
        let mut store = Self { rules, next_id };
        store.sort();
        store
    }

    /// The id the next [`Action::Add`] will assign.
    #[must_use]
    pub fn next_id(&self) -> RuleId {
        RuleId(self.next_id)
    }

    /// The current rules, in order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// An owned copy of the current rules, in order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Rule> {
        self.rules.clone()
    }

    #[must_use]
    pub fn get(&self, id: RuleId) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn position(&self, id: RuleId) -> Option<usize> {
        self.rules.iter().position(|r| r.id == id)
    }

    // `sort_by_key` is stable: equal priorities keep their current relative order.
    fn sort(&mut self) {
        self.rules.sort_by_key(|r| r.priority);
    }
}

/// Apply `action` to `state`, returning the next state.
///
/// Selecting a field clears the operator and both values and re-derives the
/// priority; selecting an operator clears both values. The collection is
/// re-sorted after every applied action. A rule whose priority changed is
/// moved behind every other rule before sorting, so it lands last among its
/// new priority peers.
#[must_use]
pub fn reduce(catalog: &FieldCatalog, mut state: RuleStore, action: &Action) -> RuleStore {
    match action {
        Action::Add => {
            let id = RuleId(state.next_id);
            state.next_id += 1;
            state.rules.push(Rule::new(id));
            debug!(rule = %id, "added rule");
        }
        Action::Remove(id) => {
            let before = state.rules.len();
            state.rules.retain(|r| r.id != *id);
            if state.rules.len() == before {
                debug!(rule = %id, "ignoring remove of unknown rule");
                return state;
            }
            debug!(rule = %id, "removed rule");
        }
        Action::Update {
            id,
            attribute,
            value,
        } => {
            let Some(pos) = state.position(*id) else {
                debug!(rule = %id, %attribute, "ignoring update of unknown rule");
                return state;
            };
            let rule = &mut state.rules[pos];
            let old_priority = rule.priority;
            apply(catalog, rule, *attribute, value);
            let new_priority = rule.priority;
            debug!(
                rule = %id,
                %attribute,
                value = %value,
                priority = new_priority,
                "updated rule"
            );
            if new_priority != old_priority {
                let moved = state.rules.remove(pos);
                state.rules.push(moved);
            }
        }
    }
    state.sort();
    state
}

fn apply(catalog: &FieldCatalog, rule: &mut Rule, attribute: Attribute, value: &str) {
    match attribute {
        Attribute::Field => {
            value.clone_into(&mut rule.field);
            rule.priority = catalog.priority_of(value);
            rule.operator.clear();
            rule.value.clear();
            rule.second_value.clear();
        }
        Attribute::Operator => {
            value.clone_into(&mut rule.operator);
            rule.value.clear();
            rule.second_value.clear();
        }
        Attribute::Value => value.clone_into(&mut rule.value),
        Attribute::SecondValue => value.clone_into(&mut rule.second_value),
    }
}
