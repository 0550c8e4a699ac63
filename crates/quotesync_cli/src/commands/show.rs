//! `show` - display a random quote.

use crate::Service;

/// Picks and prints a random quote.
///
/// An explicit `--category` becomes the remembered selection; otherwise the
/// previously selected category is used.
pub fn run(service: &Service, category: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let selected = {
        let mut store = service.store();
        match category {
            Some(category) => {
                store.set_selected_category(&category)?;
                category
            }
            None => store.selected_category()?,
        }
    };

    let store = service.store();
    match store.random(&selected) {
        Some(quote) => {
            println!("{}", quote.text);
            println!("# {}", quote.category);
        }
        None => println!("No quotes found for this category yet."),
    }
    Ok(())
}
