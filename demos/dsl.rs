use std::sync::Arc;

use qualify::{Attribute, FieldCatalog, RuleEditor};

fn main() {
    let catalog =
        FieldCatalog::from_file("demos/promotions.fields").expect("failed to load catalog");
    println!("{catalog}");

    let mut editor = RuleEditor::new(Arc::new(catalog));
    let id = editor.add();
    editor.update(id, Attribute::Field, "collections");
    editor.update(id, Attribute::Operator, "is_not");

    for option in editor.operator_options("products") {
        println!(
            "products / {} [{}] disabled={}",
            option.definition.label, option.definition.kind, option.disabled
        );
    }
}
