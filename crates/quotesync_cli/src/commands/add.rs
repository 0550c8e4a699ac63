//! `add` - add a quote and submit it to the remote endpoint.

use crate::Service;

/// Adds a quote locally; unless `local_only` is set, also submits it.
///
/// A failed submit keeps the local record and is reported as a warning by
/// the service.
pub fn run(
    service: &Service,
    text: &str,
    category: &str,
    local_only: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let quote = if local_only {
        service.store().add(text, category)?
    } else {
        service.add_quote(text, category)?
    };

    println!("Quote added!");
    match quote.remote_id {
        Some(remote_id) => println!("Remote id: {remote_id}"),
        None => println!("Not yet submitted to the remote endpoint."),
    }
    Ok(())
}
