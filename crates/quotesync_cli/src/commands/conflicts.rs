//! `conflicts` and `resolve` - review and settle sync divergences.

use crate::Service;
use quotesync_sync::Resolution;

/// Prints the unresolved conflicts in pass order.
pub fn list(service: &Service) -> Result<(), Box<dyn std::error::Error>> {
    let conflicts = service.conflicts();
    if conflicts.is_empty() {
        println!("No conflicts pending.");
        return Ok(());
    }

    for (index, entry) in conflicts.iter().enumerate() {
        println!("{index}: [{}]", entry.local.category);
        println!("   local:  {}", entry.local.text);
        println!("   remote: {}", entry.remote.text);
    }
    println!("Resolve with `quotesync resolve <index> <local|remote>`.");
    Ok(())
}

/// Resolves one conflict with the given choice.
pub fn resolve(
    service: &Service,
    index: usize,
    resolution: Resolution,
) -> Result<(), Box<dyn std::error::Error>> {
    let quote = service.resolve_conflict(index, resolution)?;
    println!("Conflict {index} resolved; the record now reads:");
    println!("{}  [{}]", quote.text, quote.category);
    Ok(())
}
