use std::sync::Arc;

use qualify::{Attribute, FieldCatalog, RuleEditor};

fn main() {
    let mut editor = RuleEditor::new(Arc::new(FieldCatalog::builtin()));

    let products = editor.add();
    editor
        .update_checked(products, Attribute::Field, "products")
        .expect("products is free");
    editor
        .update_checked(products, Attribute::Operator, "contains_any")
        .expect("nothing constrains products yet");

    let other = editor.add();
    match editor.update_checked(other, Attribute::Field, "collections") {
        Ok(()) => println!("collections accepted"),
        Err(e) => println!("rejected: {e}"),
    }

    // The advisory path still records the choice.
    editor.update(other, Attribute::Field, "collections");
    println!("{editor}");
    for rule in editor.rules() {
        println!("  {rule}");
    }
}
