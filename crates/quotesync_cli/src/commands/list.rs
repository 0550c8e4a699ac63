//! `list` and `categories` - inspect the local collection.

use crate::Service;
use quotesync_core::ALL_CATEGORY;

/// Prints the collection, optionally filtered by category.
pub fn run(service: &Service, category: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let selected = category.unwrap_or_else(|| ALL_CATEGORY.to_string());
    let store = service.store();
    let quotes = store.filter_by_category(&selected);

    if quotes.is_empty() {
        println!("No quotes found for this category yet.");
        return Ok(());
    }

    for (index, quote) in quotes.iter().enumerate() {
        let marker = if quote.remote_id.is_some() { "" } else { " (local only)" };
        println!("{index:>3}. {}  [{}]{marker}", quote.text, quote.category);
    }
    Ok(())
}

/// Prints the unique categories in the collection.
pub fn categories(service: &Service) -> Result<(), Box<dyn std::error::Error>> {
    let store = service.store();
    println!("{ALL_CATEGORY}");
    for category in store.categories() {
        println!("{category}");
    }
    Ok(())
}
