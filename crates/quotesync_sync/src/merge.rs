//! The merge engine: reconciles one fetched batch into the quote store.

use crate::conflict::ConflictEntry;
use crate::error::SyncResult;
use quotesync_core::{Quote, QuoteStore};
use tracing::debug;

/// Counts and conflicts produced by one merge pass.
#[derive(Debug, Default)]
pub struct MergeOutcome {
    /// Brand-new remote records appended to the store.
    pub added: usize,
    /// Local records updated from their remote counterpart.
    pub updated: usize,
    /// Divergences detected during the pass, in batch order.
    pub conflicts: Vec<ConflictEntry>,
}

/// Merges `batch` into `store`, remote-wins by default.
///
/// For each remote record, in batch order, two ordered and mutually
/// exclusive lookups select the local anchor:
///
/// 1. By remote id. Equal content is a no-op beyond refreshing `updated_at`
///    to the later of the two; diverging content records a conflict (local
///    pre-merge snapshot against the remote record) and applies the remote
///    values onto the anchor in place.
/// 2. By identity key. Equal content attaches the remote id and bumps
///    `updated_at`; diverging content (only reachable when the identity
///    normalization absorbed a case or whitespace difference) takes the same
///    conflict branch as above.
/// 3. No anchor: the record is appended as new.
///
/// Local-only quotes are never removed or mutated. The store persists
/// through its own mutators, so the collection on disk matches memory when
/// this returns.
///
/// # Errors
///
/// Returns an error when a store mutation cannot be persisted.
pub fn merge_batch(store: &mut QuoteStore, batch: &[Quote]) -> SyncResult<MergeOutcome> {
    let mut outcome = MergeOutcome::default();

    for remote in batch {
        let anchor_by_id = remote
            .remote_id
            .and_then(|id| store.position_by_remote_id(id));

        if let Some(index) = anchor_by_id {
            let Some(anchor) = store.get(index).cloned() else {
                continue;
            };
            if anchor.content_eq(remote) {
                if remote.updated_at > anchor.updated_at {
                    let mut refreshed = anchor;
                    refreshed.updated_at = remote.updated_at;
                    store.set(index, refreshed)?;
                }
            } else {
                debug!(
                    remote_id = remote.remote_id,
                    "remote record diverged from local anchor"
                );
                apply_remote(store, index, &anchor, remote, &mut outcome)?;
            }
        } else if let Some(index) = store.position_by_identity(&remote.identity_key()) {
            let Some(anchor) = store.get(index).cloned() else {
                continue;
            };
            if anchor.content_eq(remote) {
                let mut enriched = anchor;
                enriched.remote_id = remote.remote_id.or(enriched.remote_id);
                enriched.updated_at = enriched.updated_at.max(remote.updated_at);
                store.set(index, enriched)?;
                outcome.updated += 1;
            } else {
                // Same identity key but different raw content; the
                // normalization absorbed a case or whitespace difference.
                apply_remote(store, index, &anchor, remote, &mut outcome)?;
            }
        } else {
            store.append(remote.clone())?;
            outcome.added += 1;
        }
    }

    Ok(outcome)
}

fn apply_remote(
    store: &mut QuoteStore,
    index: usize,
    anchor: &Quote,
    remote: &Quote,
    outcome: &mut MergeOutcome,
) -> SyncResult<()> {
    outcome
        .conflicts
        .push(ConflictEntry::new(anchor.clone(), remote.clone()));

    let mut merged = remote.clone();
    merged.updated_at = anchor.updated_at.max(remote.updated_at);
    store.set(index, merged)?;
    outcome.updated += 1;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotesync_core::identity_key;
    use quotesync_storage::MemoryStateStore;

    fn empty_store() -> QuoteStore {
        let backend = MemoryStateStore::with_entries([("quotes".to_string(), "[]".to_string())]);
        QuoteStore::open(Box::new(backend)).unwrap()
    }

    fn quote(text: &str, category: &str, updated_at: u64, remote_id: Option<u64>) -> Quote {
        Quote {
            text: text.to_string(),
            category: category.to_string(),
            updated_at,
            remote_id,
        }
    }

    #[test]
    fn new_remote_record_is_appended() {
        let mut store = empty_store();
        store.add("Local one", "Here").unwrap();

        let batch = vec![quote("Fresh from afar", "Inspiration", 10, Some(1))];
        let outcome = merge_batch(&mut store, &batch).unwrap();

        assert_eq!(outcome.added, 1);
        assert_eq!(outcome.updated, 0);
        assert!(outcome.conflicts.is_empty());
        assert_eq!(store.len(), 2);
        assert_eq!(store.find_by_remote_id(1).unwrap().text, "Fresh from afar");
    }

    #[test]
    fn remote_id_divergence_records_conflict_and_applies_remote() {
        let mut store = empty_store();
        store.append(quote("A", "X", 5, Some(7))).unwrap();

        let batch = vec![quote("B", "X", 9, Some(7))];
        let outcome = merge_batch(&mut store, &batch).unwrap();

        assert_eq!(outcome.conflicts.len(), 1);
        assert_eq!(outcome.conflicts[0].local.text, "A");
        assert_eq!(outcome.conflicts[0].remote.text, "B");
        assert_eq!(outcome.updated, 1);
        assert_eq!(outcome.added, 0);

        let record = store.find_by_remote_id(7).unwrap();
        assert_eq!(record.text, "B");
        assert_eq!(record.category, "X");
    }

    #[test]
    fn matching_content_by_remote_id_is_a_noop() {
        let mut store = empty_store();
        store.append(quote("A", "X", 5, Some(7))).unwrap();

        let batch = vec![quote("A", "X", 9, Some(7))];
        let outcome = merge_batch(&mut store, &batch).unwrap();

        assert_eq!(outcome.added, 0);
        assert_eq!(outcome.updated, 0);
        assert!(outcome.conflicts.is_empty());
        // updated_at may still be refreshed to the later of the two.
        assert_eq!(store.find_by_remote_id(7).unwrap().updated_at, 9);
    }

    #[test]
    fn identity_match_attaches_remote_id() {
        let mut store = empty_store();
        store.append(quote("Shared words", "Life", 5, None)).unwrap();

        let batch = vec![quote("Shared words", "Life", 9, Some(42))];
        let outcome = merge_batch(&mut store, &batch).unwrap();

        assert_eq!(outcome.updated, 1);
        assert_eq!(outcome.added, 0);
        assert!(outcome.conflicts.is_empty());

        let record = store.find_by_remote_id(42).unwrap();
        assert_eq!(record.text, "Shared words");
        assert_eq!(record.updated_at, 9);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn identity_match_with_case_difference_is_a_conflict() {
        let mut store = empty_store();
        store.append(quote("Shared Words", "Life", 5, None)).unwrap();

        let batch = vec![quote("shared words", "Life", 9, Some(42))];
        let outcome = merge_batch(&mut store, &batch).unwrap();

        assert_eq!(outcome.conflicts.len(), 1);
        assert_eq!(outcome.conflicts[0].local.text, "Shared Words");
        assert_eq!(store.all()[0].text, "shared words");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn local_only_quotes_are_never_touched() {
        let mut store = empty_store();
        store.add("Mine alone", "Private").unwrap();
        let before = store
            .find_by_identity(&identity_key("Mine alone", "Private"))
            .cloned()
            .unwrap();

        let batch = vec![
            quote("Remote one", "Inspiration", 10, Some(1)),
            quote("Remote two", "Mindset", 10, Some(2)),
        ];
        merge_batch(&mut store, &batch).unwrap();

        let after = store
            .find_by_identity(&identity_key("Mine alone", "Private"))
            .cloned()
            .unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn merge_is_idempotent() {
        let mut store = empty_store();
        store.append(quote("A", "X", 5, Some(7))).unwrap();
        store.append(quote("Shared words", "Life", 5, None)).unwrap();
        store.add("Mine alone", "Private").unwrap();

        let batch = vec![
            quote("B", "X", 9, Some(7)),
            quote("Shared words", "Life", 9, Some(42)),
            quote("Brand new", "Mindset", 9, Some(43)),
        ];

        let first = merge_batch(&mut store, &batch).unwrap();
        assert_eq!(first.added, 1);
        assert_eq!(first.updated, 2);
        assert_eq!(first.conflicts.len(), 1);
        let size_after_first = store.len();

        let second = merge_batch(&mut store, &batch).unwrap();
        assert_eq!(second.added, 0);
        assert_eq!(second.updated, 0);
        assert!(second.conflicts.is_empty());
        assert_eq!(store.len(), size_after_first);
    }

    #[test]
    fn batch_order_is_preserved_for_appends() {
        let mut store = empty_store();
        let batch = vec![
            quote("First", "A", 1, Some(1)),
            quote("Second", "B", 1, Some(2)),
            quote("Third", "C", 1, Some(3)),
        ];
        merge_batch(&mut store, &batch).unwrap();

        let texts: Vec<&str> = store.all().iter().map(|q| q.text.as_str()).collect();
        assert_eq!(texts, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn conflict_keeps_later_timestamp() {
        let mut store = empty_store();
        store.append(quote("A", "X", 50, Some(7))).unwrap();

        let batch = vec![quote("B", "X", 9, Some(7))];
        merge_batch(&mut store, &batch).unwrap();

        // Remote content wins but the record keeps the most recent stamp.
        let record = store.find_by_remote_id(7).unwrap();
        assert_eq!(record.text, "B");
        assert_eq!(record.updated_at, 50);
    }
}
