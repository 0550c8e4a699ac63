//! The ordered, persistently backed quote collection.

use crate::error::{CoreError, CoreResult};
use crate::quote::{now_millis, Quote};
use quotesync_storage::{keys, StateStore};
use tracing::debug;

/// Sentinel category that selects the full store when filtering.
pub const ALL_CATEGORY: &str = "All";

/// The default quotes a fresh store is seeded with.
const SEED_QUOTES: &[(&str, &str)] = &[
    (
        "The only way to do great work is to love what you do.",
        "Inspiration",
    ),
    ("Simplicity is the soul of efficiency.", "Productivity"),
    (
        "Code is like humor. When you have to explain it, it’s bad.",
        "Programming",
    ),
    (
        "Whether you think you can or you think you can’t, you’re right.",
        "Mindset",
    ),
    (
        "The best time to plant a tree was 20 years ago. The second best time is now.",
        "Inspiration",
    ),
];

/// How [`QuoteStore::import_json`] treats the existing collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Drop the current collection and keep only the imported records.
    Replace,
    /// Keep the current collection and append imported records whose
    /// identity key is not already present.
    Merge,
}

/// An insertion-order-preserving collection of quotes with injected
/// persistence.
///
/// Every successful mutation is written through the [`StateStore`] before the
/// mutating call returns, so no reader can observe a stale snapshot once a
/// mutation (or a whole merge pass) has completed.
pub struct QuoteStore {
    quotes: Vec<Quote>,
    state: Box<dyn StateStore>,
}

impl QuoteStore {
    /// Opens a store over the given state backend.
    ///
    /// Loads the persisted collection when present; a missing or unparsable
    /// collection falls back to the fixed seed list. Loading is not a
    /// mutation - the seeds are only persisted by the first mutating call.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn open(state: Box<dyn StateStore>) -> CoreResult<Self> {
        let quotes = match state.get(keys::QUOTES)? {
            Some(raw) => match serde_json::from_str::<Vec<Quote>>(&raw) {
                Ok(parsed) => parsed,
                Err(e) => {
                    debug!("persisted quotes unparsable ({e}); seeding defaults");
                    seed_quotes()
                }
            },
            None => seed_quotes(),
        };

        Ok(Self { quotes, state })
    }

    /// Returns the full ordered collection.
    #[must_use]
    pub fn all(&self) -> &[Quote] {
        &self.quotes
    }

    /// Returns the number of quotes in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Returns true if the store holds no quotes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Returns the quote at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Quote> {
        self.quotes.get(index)
    }

    /// Returns the position of the record matching the given remote id.
    #[must_use]
    pub fn position_by_remote_id(&self, remote_id: u64) -> Option<usize> {
        self.quotes.iter().position(|q| q.remote_id == Some(remote_id))
    }

    /// Returns the position of the record matching the given identity key.
    #[must_use]
    pub fn position_by_identity(&self, key: &str) -> Option<usize> {
        self.quotes.iter().position(|q| q.identity_key() == key)
    }

    /// Returns the record matching the given identity key, if any.
    #[must_use]
    pub fn find_by_identity(&self, key: &str) -> Option<&Quote> {
        self.position_by_identity(key).and_then(|i| self.get(i))
    }

    /// Returns the record matching the given remote id, if any.
    #[must_use]
    pub fn find_by_remote_id(&self, remote_id: u64) -> Option<&Quote> {
        self.position_by_remote_id(remote_id).and_then(|i| self.get(i))
    }

    /// Validates, appends, and persists a new user-entered quote.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if text or category is empty after
    /// trimming, or a storage error if the write fails.
    pub fn add(&mut self, text: &str, category: &str) -> CoreResult<Quote> {
        let quote = Quote::new(text, category)?;
        self.quotes.push(quote.clone());
        self.persist()?;
        Ok(quote)
    }

    /// Appends an already constructed record and persists.
    ///
    /// Used by the merge engine for brand-new remote records.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if the record's text or category is
    /// empty after trimming, or a storage error if the write fails.
    pub fn append(&mut self, quote: Quote) -> CoreResult<()> {
        validate(&quote)?;
        self.quotes.push(quote);
        self.persist()
    }

    /// Overwrites the record at `index` in place and persists.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::IndexOutOfRange`] when `index` is out of range,
    /// [`CoreError::Validation`] for an invalid record, or a storage error if
    /// the write fails.
    pub fn set(&mut self, index: usize, quote: Quote) -> CoreResult<()> {
        validate(&quote)?;
        let len = self.quotes.len();
        let slot = self
            .quotes
            .get_mut(index)
            .ok_or(CoreError::IndexOutOfRange { index, len })?;
        *slot = quote;
        self.persist()
    }

    /// Overwrites the record matching `key` in place, preserving its
    /// position; appends when no record matches. Persists either way.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] for an invalid record, or a storage
    /// error if the write fails.
    pub fn replace(&mut self, key: &str, quote: Quote) -> CoreResult<()> {
        match self.position_by_identity(key) {
            Some(index) => self.set(index, quote),
            None => self.append(quote),
        }
    }

    /// Returns the quotes whose category matches `category` under
    /// case-insensitive, trimmed comparison.
    ///
    /// The [`ALL_CATEGORY`] sentinel returns the full store.
    #[must_use]
    pub fn filter_by_category(&self, category: &str) -> Vec<&Quote> {
        let wanted = category.trim();
        if wanted.eq_ignore_ascii_case(ALL_CATEGORY) {
            return self.quotes.iter().collect();
        }
        self.quotes
            .iter()
            .filter(|q| q.category.trim().eq_ignore_ascii_case(wanted))
            .collect()
    }

    /// Returns the unique trimmed categories present in the store, sorted.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut cats: Vec<String> = self
            .quotes
            .iter()
            .map(|q| q.category.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        cats.sort();
        cats.dedup();
        cats
    }

    /// Picks a uniformly random quote from the given category's pool.
    ///
    /// Returns `None` when the pool is empty.
    #[must_use]
    pub fn random_in_category<R: rand::Rng + ?Sized>(
        &self,
        category: &str,
        rng: &mut R,
    ) -> Option<&Quote> {
        let pool = self.filter_by_category(category);
        if pool.is_empty() {
            return None;
        }
        let pick = rng.gen_range(0..pool.len());
        Some(pool[pick])
    }

    /// Picks a random quote from the given category using the thread RNG.
    #[must_use]
    pub fn random(&self, category: &str) -> Option<&Quote> {
        self.random_in_category(category, &mut rand::thread_rng())
    }

    /// Serializes the full collection as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Serialize`] if serialization fails.
    pub fn export_json(&self) -> CoreResult<String> {
        serde_json::to_string_pretty(&self.quotes)
            .map_err(|e| CoreError::serialize(e.to_string()))
    }

    /// Imports a JSON array of quotes.
    ///
    /// Every record is validated before anything is applied; an invalid
    /// payload leaves the store untouched. Returns the number of records
    /// that entered the store.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Serialize`] for unparsable JSON,
    /// [`CoreError::Validation`] for a record with empty text or category,
    /// or a storage error if the write fails.
    pub fn import_json(&mut self, raw: &str, mode: ImportMode) -> CoreResult<usize> {
        let incoming: Vec<Quote> =
            serde_json::from_str(raw).map_err(|e| CoreError::serialize(e.to_string()))?;
        for quote in &incoming {
            validate(quote)?;
        }

        let imported = match mode {
            ImportMode::Replace => {
                let count = incoming.len();
                self.quotes = incoming;
                count
            }
            ImportMode::Merge => {
                let mut count = 0;
                for quote in incoming {
                    if self.position_by_identity(&quote.identity_key()).is_none() {
                        self.quotes.push(quote);
                        count += 1;
                    }
                }
                count
            }
        };

        self.persist()?;
        Ok(imported)
    }

    /// Returns the persisted category selection, defaulting to
    /// [`ALL_CATEGORY`].
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn selected_category(&self) -> CoreResult<String> {
        Ok(self
            .state
            .get(keys::SELECTED_CATEGORY)?
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| ALL_CATEGORY.to_string()))
    }

    /// Persists the category selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn set_selected_category(&mut self, category: &str) -> CoreResult<()> {
        self.state.set(keys::SELECTED_CATEGORY, category.trim())?;
        Ok(())
    }

    /// Returns the timestamp of the last successful sync pass, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn last_sync_at(&self) -> CoreResult<Option<u64>> {
        Ok(self
            .state
            .get(keys::LAST_SYNC_AT)?
            .and_then(|raw| raw.parse().ok()))
    }

    /// Persists the last-sync timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn set_last_sync_at(&mut self, at_millis: u64) -> CoreResult<()> {
        self.state
            .set(keys::LAST_SYNC_AT, &at_millis.to_string())?;
        Ok(())
    }

    fn persist(&mut self) -> CoreResult<()> {
        let raw = serde_json::to_string(&self.quotes)
            .map_err(|e| CoreError::serialize(e.to_string()))?;
        self.state.set(keys::QUOTES, &raw)?;
        Ok(())
    }
}

impl std::fmt::Debug for QuoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteStore")
            .field("quotes", &self.quotes.len())
            .finish()
    }
}

fn validate(quote: &Quote) -> CoreResult<()> {
    if quote.text.trim().is_empty() {
        return Err(CoreError::validation("quote text must not be empty"));
    }
    if quote.category.trim().is_empty() {
        return Err(CoreError::validation("quote category must not be empty"));
    }
    Ok(())
}

fn seed_quotes() -> Vec<Quote> {
    let stamped = now_millis();
    SEED_QUOTES
        .iter()
        .map(|(text, category)| Quote {
            text: (*text).to_string(),
            category: (*category).to_string(),
            updated_at: stamped,
            remote_id: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::identity_key;
    use quotesync_storage::{FileStateStore, MemoryStateStore};
    use tempfile::tempdir;

    fn memory_store() -> QuoteStore {
        QuoteStore::open(Box::new(MemoryStateStore::new())).unwrap()
    }

    #[test]
    fn open_seeds_defaults_when_empty() {
        let store = memory_store();
        assert_eq!(store.len(), 5);
        assert!(store
            .all()
            .iter()
            .any(|q| q.category == "Programming"));
    }

    #[test]
    fn open_seeds_defaults_when_corrupt() {
        let backend =
            MemoryStateStore::with_entries([(keys::QUOTES.to_string(), "{not json".to_string())]);
        let store = QuoteStore::open(Box::new(backend)).unwrap();
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn open_loads_persisted_collection() {
        let backend = MemoryStateStore::with_entries([(
            keys::QUOTES.to_string(),
            r#"[{"text":"One quote","category":"Solo"}]"#.to_string(),
        )]);
        let store = QuoteStore::open(Box::new(backend)).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.all()[0].text, "One quote");
    }

    #[test]
    fn add_validates_and_appends() {
        let mut store = memory_store();
        let before = store.len();

        let quote = store.add("  Stay hungry.  ", "Inspiration").unwrap();
        assert_eq!(quote.text, "Stay hungry.");
        assert_eq!(store.len(), before + 1);

        let result = store.add("   ", "Inspiration");
        assert!(matches!(result, Err(CoreError::Validation { .. })));
        assert_eq!(store.len(), before + 1);
    }

    #[test]
    fn mutations_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");

        {
            let backend = FileStateStore::open(&path).unwrap();
            let mut store = QuoteStore::open(Box::new(backend)).unwrap();
            store.add("Persisted quote", "Testing").unwrap();
        }

        let backend = FileStateStore::open(&path).unwrap();
        let store = QuoteStore::open(Box::new(backend)).unwrap();
        assert!(store
            .find_by_identity(&identity_key("Persisted quote", "Testing"))
            .is_some());
    }

    #[test]
    fn replace_preserves_position() {
        let mut store = memory_store();
        let key = store.all()[1].identity_key();
        let mut replacement = store.all()[1].clone();
        replacement.text = "Replaced text".to_string();

        store.replace(&key, replacement).unwrap();
        assert_eq!(store.all()[1].text, "Replaced text");
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn replace_appends_when_absent() {
        let mut store = memory_store();
        let quote = Quote::new("Brand new", "Fresh").unwrap();

        store.replace(&quote.identity_key(), quote.clone()).unwrap();
        assert_eq!(store.len(), 6);
        assert_eq!(store.all()[5].text, "Brand new");
    }

    #[test]
    fn set_out_of_range_fails() {
        let mut store = memory_store();
        let quote = Quote::new("x", "y").unwrap();
        let result = store.set(99, quote);
        assert!(matches!(result, Err(CoreError::IndexOutOfRange { .. })));
    }

    #[test]
    fn filter_matches_case_insensitively() {
        let mut store = memory_store();
        store.add("Extra", "  inspiration ").unwrap();

        let hits = store.filter_by_category("INSPIRATION");
        assert_eq!(hits.len(), 3);
        for quote in hits {
            assert!(quote.category.trim().eq_ignore_ascii_case("inspiration"));
        }
    }

    #[test]
    fn filter_all_returns_everything() {
        let store = memory_store();
        assert_eq!(store.filter_by_category(ALL_CATEGORY).len(), store.len());
        assert_eq!(store.filter_by_category("all").len(), store.len());
    }

    #[test]
    fn categories_are_sorted_and_unique() {
        let store = memory_store();
        let cats = store.categories();
        assert_eq!(
            cats,
            vec!["Inspiration", "Mindset", "Productivity", "Programming"]
        );
    }

    #[test]
    fn random_from_single_element_pool() {
        let mut store = memory_store();
        store.add("Only one here", "Lonely").unwrap();

        let pick = store.random("Lonely").unwrap();
        assert_eq!(pick.text, "Only one here");
        assert!(store.random("NoSuchCategory").is_none());
    }

    #[test]
    fn import_replace_swaps_collection() {
        let mut store = memory_store();
        let count = store
            .import_json(
                r#"[{"text":"Imported","category":"New"}]"#,
                ImportMode::Replace,
            )
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn import_merge_dedups_by_identity() {
        let mut store = memory_store();
        let payload = r#"[
            {"text":"Simplicity is the soul of efficiency.","category":"Productivity"},
            {"text":"Imported","category":"New"}
        ]"#;

        let count = store.import_json(payload, ImportMode::Merge).unwrap();
        assert_eq!(count, 1);
        assert_eq!(store.len(), 6);
    }

    #[test]
    fn import_invalid_record_leaves_store_untouched() {
        let mut store = memory_store();
        let result = store.import_json(
            r#"[{"text":"","category":"New"}]"#,
            ImportMode::Replace,
        );
        assert!(matches!(result, Err(CoreError::Validation { .. })));
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn selected_category_defaults_to_all() {
        let mut store = memory_store();
        assert_eq!(store.selected_category().unwrap(), ALL_CATEGORY);

        store.set_selected_category("Mindset").unwrap();
        assert_eq!(store.selected_category().unwrap(), "Mindset");
    }

    #[test]
    fn last_sync_roundtrip() {
        let mut store = memory_store();
        assert_eq!(store.last_sync_at().unwrap(), None);

        store.set_last_sync_at(1_700_000_000_000).unwrap();
        assert_eq!(store.last_sync_at().unwrap(), Some(1_700_000_000_000));
    }
}
