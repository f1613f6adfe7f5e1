/* demos/form.rs */

use iplocate::{EntryForm, Key};

/// Replays keystrokes against the form as a text field would deliver them:
/// each character produces the cell's new text, then the key event.
fn type_keys(form: &mut EntryForm, keys: &str) {
    for ch in keys.chars() {
        let cell = form.focus();
        if ch != '.' {
            let text = format!("{}{}", selected_text(form, cell), ch);
            form.input(cell, &text);
        }
        let name = ch.to_string();
        form.key(cell, Key::from_name(&name));
        println!(
            "  '{}' -> cells {:?}, focus {}",
            ch,
            form.octets().cells(),
            form.focus()
        );
    }
}

/// Typing over a selected cell replaces its contents.
fn selected_text(form: &EntryForm, cell: usize) -> String {
    if form.is_selected() {
        String::new()
    } else {
        form.octets().get(cell).unwrap_or_default().to_string()
    }
}

fn main() {
    println!("=== Octet Entry Examples ===\n");

    let mut form = EntryForm::new();
    println!("Typing 8.8.8.8");
    type_keys(&mut form, "8.8.8.8");
    println!("Submit: {:?}\n", form.submit());

    form.reset();
    println!("Typing 300.1 (clamped, incomplete)");
    type_keys(&mut form, "300.1");
    println!("Submit: {:?}\n", form.submit());

    form.load_address("203.0.113.7");
    println!("Loaded lookup result: {}", form.octets());
}
