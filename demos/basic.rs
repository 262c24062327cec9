use std::sync::Arc;

use qualify::{Attribute, FieldCatalog, Rule, RuleEditor};

fn main() {
    let catalog = Arc::new(FieldCatalog::builtin());
    println!("{catalog}");

    let mut editor = RuleEditor::new(catalog);

    let products = editor.add();
    editor.update(products, Attribute::Field, "products");
    editor.update(products, Attribute::Operator, "contains_any");
    editor.update(products, Attribute::Value, "sku-1, sku-2");

    let cart = editor.add();
    editor.update(cart, Attribute::Field, "cart_value");
    editor.update(cart, Attribute::Operator, "between");
    editor.update(cart, Attribute::Value, "10");

    // What a field picker would show for a third rule
    for option in editor.field_options() {
        let mark = if option.disabled { " (disabled)" } else { "" };
        println!("  {}{mark}", option.definition.label);
    }

    println!("{editor}");
    for id in editor.incomplete() {
        println!("incomplete: {id} -> {:?}", editor.placeholder(id));
    }

    editor.save(&mut |rules: &[Rule]| {
        for rule in rules {
            println!("saved {rule}");
        }
    });
}
