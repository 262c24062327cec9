
use std::collections::HashSet;

use proptest::prelude::*;
use qualify::{Attribute, FieldCatalog, OperatorKind, RuleId, ValueShape};
use strategies::{apply, arb_op, arb_script, resolve_slot, run, GenOp, FIELDS, OPERATORS};

// ---------------------------------------------------------------------------
// Invariant 1: Sort order
//
// Every snapshot is non-decreasing in priority, and every priority equals the
// catalog priority of the rule's field (0 when empty or unknown).
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn snapshot_sorted_by_priority(script in arb_script()) {
        let editor = run(&script);
        let snapshot = editor.snapshot();
        for window in snapshot.windows(2) {
            prop_assert!(
                window[0].priority() <= window[1].priority(),
                "rule {} (priority {}) before rule {} (priority {})",
                window[0].id(),
                window[0].priority(),
                window[1].id(),
                window[1].priority(),
            );
        }
    }

    #[test]
    fn priority_mirrors_catalog(script in arb_script()) {
        let editor = run(&script);
        let catalog = FieldCatalog::builtin();
        for rule in editor.rules() {
            prop_assert_eq!(rule.priority(), catalog.priority_of(rule.field()));
        }
    }

    #[test]
    fn ids_unique(script in arb_script()) {
        let editor = run(&script);
        let mut seen = HashSet::new();
        for rule in editor.rules() {
            prop_assert!(seen.insert(rule.id()), "duplicate id {}", rule.id());
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant 2: Tie order
//
// Among equal priorities, rules appear in the order in which they most
// recently took on that priority. Checked against a simple model that stamps
// each rule whenever its priority changes.
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct ModelRule {
    id: RuleId,
    priority: u32,
    stamp: u64,
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn ties_follow_priority_arrival(script in arb_script()) {
        let catalog = FieldCatalog::builtin();
        let mut editor = run(&[]);
        let mut model: Vec<ModelRule> = Vec::new();
        let mut clock = 0_u64;

        for op in &script {
            clock += 1;
            match op {
                GenOp::Add => {
                    let id = editor.add();
                    model.push(ModelRule { id, priority: 0, stamp: clock });
                }
                GenOp::Remove { slot } => {
                    let id = resolve_slot(&editor, *slot);
                    editor.remove(id);
                    model.retain(|m| m.id != id);
                }
                GenOp::Update { slot, attribute, value } => {
                    let id = resolve_slot(&editor, *slot);
                    editor.update(id, *attribute, value.clone());
                    if *attribute == Attribute::Field {
                        if let Some(m) = model.iter_mut().find(|m| m.id == id) {
                            let priority = catalog.priority_of(value);
                            if priority != m.priority {
                                m.priority = priority;
                                m.stamp = clock;
                            }
                        }
                    }
                }
            }
        }

        model.sort_by_key(|m| (m.priority, m.stamp));
        let expected: Vec<RuleId> = model.iter().map(|m| m.id).collect();
        let actual: Vec<RuleId> = editor.rules().iter().map(|r| r.id()).collect();
        prop_assert_eq!(actual, expected);
    }
}

// ---------------------------------------------------------------------------
// Invariant 3: Cascading resets
//
// Setting a field clears operator and values; setting an operator clears
// values. Nothing else resets state.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn field_change_resets(
        script in arb_script(),
        field in prop::sample::select(FIELDS),
    ) {
        let mut editor = run(&script);
        let id = editor.add();
        editor.update(id, Attribute::Field, "cart_value");
        editor.update(id, Attribute::Operator, "between");
        editor.update(id, Attribute::Value, "5");
        editor.update(id, Attribute::SecondValue, "9");
        editor.update(id, Attribute::Field, field);

        let rule = editor.get(id).unwrap();
        prop_assert_eq!(rule.field(), field);
        prop_assert_eq!(rule.operator(), "");
        prop_assert_eq!(rule.value(), "");
        prop_assert_eq!(rule.second_value(), "");
        prop_assert_eq!(rule.priority(), FieldCatalog::builtin().priority_of(field));
    }

    #[test]
    fn operator_change_resets_values_only(
        script in arb_script(),
        operator in prop::sample::select(OPERATORS),
    ) {
        let mut editor = run(&script);
        let id = editor.add();
        editor.update(id, Attribute::Field, "cart_value");
        editor.update(id, Attribute::Operator, "between");
        editor.update(id, Attribute::Value, "5");
        editor.update(id, Attribute::SecondValue, "9");
        editor.update(id, Attribute::Operator, operator);

        let rule = editor.get(id).unwrap();
        prop_assert_eq!(rule.field(), "cart_value");
        prop_assert_eq!(rule.operator(), operator);
        prop_assert_eq!(rule.value(), "");
        prop_assert_eq!(rule.second_value(), "");
        prop_assert_eq!(rule.priority(), 6);
    }
}

// ---------------------------------------------------------------------------
// Invariant 4: Snapshot and no-op behaviour
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn snapshot_idempotent(script in arb_script()) {
        let editor = run(&script);
        prop_assert_eq!(editor.snapshot(), editor.snapshot());
    }

    #[test]
    fn unknown_ids_leave_snapshot_unchanged(script in arb_script(), op in arb_op()) {
        let mut editor = run(&script);
        let before = editor.snapshot();
        let ghost = RuleId::from(u64::MAX);
        editor.remove(ghost);
        prop_assert_eq!(&editor.snapshot(), &before);
        if let GenOp::Update { attribute, value, .. } = op {
            editor.update(ghost, attribute, value);
            prop_assert_eq!(&editor.snapshot(), &before);
        }
    }

    #[test]
    fn any_script_is_replayable(script in arb_script()) {
        let a = run(&script);
        let mut b = run(&[]);
        for op in &script {
            apply(&mut b, op);
        }
        prop_assert_eq!(a.snapshot(), b.snapshot());
    }
}

// ---------------------------------------------------------------------------
// Invariant 5: Exclusivity
//
// Any rule on one side of the collections/products pair disables the other
// field. Operator conflicts follow the first partner rule with an operator.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn exclusivity_symmetric(script in arb_script()) {
        let editor = run(&script);
        let uses = |f: &str| editor.rules().iter().any(|r| r.field() == f);
        prop_assert_eq!(editor.is_field_disabled("collections"), uses("products"));
        prop_assert_eq!(editor.is_field_disabled("products"), uses("collections"));
        prop_assert!(!editor.is_field_disabled("product_tags"));
        prop_assert!(!editor.is_field_disabled("cart_value"));
    }

    #[test]
    fn operator_conflicts_follow_first_committed_partner(script in arb_script()) {
        let editor = run(&script);
        let catalog = editor.catalog();

        for (field, partner) in [("collections", "products"), ("products", "collections")] {
            let related_kind = editor
                .rules()
                .iter()
                .find(|r| r.field() == partner && !r.operator().is_empty())
                .and_then(|r| catalog.operator(r.field(), r.operator()))
                .map(|op| op.kind);

            for option in editor.operator_options(field) {
                let expected = match related_kind {
                    Some(kind) => {
                        option.definition.kind == kind && kind != OperatorKind::Neutral
                    }
                    None => false,
                };
                prop_assert_eq!(
                    option.disabled,
                    expected,
                    "{}/{} against {:?}",
                    field,
                    option.id(),
                    related_kind
                );
            }
        }
    }

    #[test]
    fn neutral_operators_never_disabled(script in arb_script()) {
        let editor = run(&script);
        for def in editor.catalog().fields() {
            for option in editor.operator_options(&def.id) {
                if option.definition.kind == OperatorKind::Neutral {
                    prop_assert!(!option.disabled);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant 6: Value shape totality
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn value_shape_total(
        field in prop::sample::select(FIELDS),
        operator in prop::sample::select(OPERATORS),
    ) {
        let editor = run(&[]);
        let shape = editor.value_shape(field, operator);
        if field.is_empty() || operator.is_empty() {
            prop_assert_eq!(shape, ValueShape::None);
        } else if field == "subscribed" {
            prop_assert_eq!(shape, ValueShape::None);
        } else if field == "cart_value" {
            prop_assert!(shape.is_numeric());
            prop_assert_eq!(shape == ValueShape::NumberRange, operator == "between");
        } else {
            prop_assert_eq!(shape, ValueShape::Text);
        }
    }
}
