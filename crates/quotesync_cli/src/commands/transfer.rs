//! `export` and `import` - move the collection through JSON files.

use crate::Service;
use quotesync_core::ImportMode;
use std::fs;
use std::path::Path;

/// Writes the collection to `path` as pretty-printed JSON.
pub fn export(service: &Service, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let store = service.store();
    let payload = store.export_json()?;
    fs::write(path, payload)?;
    println!("Exported {} quote(s) to {}", store.len(), path.display());
    Ok(())
}

/// Imports quotes from a JSON file.
///
/// Merges by default, skipping records whose identity is already present;
/// `--replace` swaps the whole collection instead.
pub fn import(
    service: &Service,
    path: &Path,
    replace: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = fs::read_to_string(path)?;
    let mode = if replace {
        ImportMode::Replace
    } else {
        ImportMode::Merge
    };

    let count = service.store().import_json(&raw, mode)?;
    println!("Imported {count} quote(s) from {}", path.display());
    Ok(())
}
