//! One-time migration of the legacy JSON file cache into the stores.
//!
//! Earlier versions of the app kept each user's data on disk as two JSON
//! blobs: a `{date_key: [expense, ...]}` map and a category list. The first
//! session initialization after signing in sweeps whatever is left of that
//! cache into the expense and category stores, then clears it.
//!
//! The sweep is best-effort by design: per-item insert failures are logged
//! and swallowed, and both cache keys are cleared even when some inserts
//! failed, so a partially failed migration silently drops the unmigrated
//! items. This lossy behavior is inherited from the predecessor and pinned
//! down by the tests here rather than silently "fixed".

use std::{collections::BTreeMap, fs, io, path::PathBuf};

use serde::Deserialize;

use crate::{
    auth::UserID,
    category::{CategoryStore, DEFAULT_CATEGORIES},
    date_key::parse_date_key,
    expense::ExpenseStore,
};

/// The cache key holding the legacy expense collection.
pub const EXPENSES_CACHE_KEY: &str = "expenses";
/// The cache key holding the legacy category list.
pub const CATEGORIES_CACHE_KEY: &str = "expense-categories";

/// A simple key-value text store holding the legacy JSON payloads.
pub trait LocalCache {
    /// The raw text stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Delete the entry stored under `key`. Deleting an absent key is fine.
    fn remove(&mut self, key: &str);
}

/// A [LocalCache] where each key is a `<key>.json` file in one directory.
#[derive(Debug, Clone)]
pub struct JsonFileCache {
    dir: PathBuf,
}

impl JsonFileCache {
    /// Create a cache over the files in `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl LocalCache for JsonFileCache {
    fn get(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Some(text),
            Err(error) if error.kind() == io::ErrorKind::NotFound => None,
            Err(error) => {
                tracing::warn!("Could not read the cache entry \"{key}\": {error}");
                None
            }
        }
    }

    fn remove(&mut self, key: &str) {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => {}
            Err(error) if error.kind() == io::ErrorKind::NotFound => {}
            Err(error) => {
                tracing::warn!("Could not clear the cache entry \"{key}\": {error}");
            }
        }
    }
}

/// The shape of one expense in the legacy cache.
#[derive(Debug, Deserialize)]
struct CachedExpense {
    amount: f64,
    category: String,
    #[serde(default)]
    description: Option<String>,
}

/// Sweep the legacy cache into the stores for `user_id`, then clear it.
///
/// Runs once per session initialization, before the first fetch, and only
/// for an authenticated user. Nothing here blocks or fails the session:
/// every failure is logged and swallowed, and both cache keys are removed
/// unconditionally once their payload has been attempted.
pub fn migrate_local_cache<L, E, C>(
    cache: &mut L,
    expense_store: &E,
    category_store: &C,
    user_id: UserID,
) where
    L: LocalCache,
    E: ExpenseStore,
    C: CategoryStore,
{
    if let Some(raw) = cache.get(EXPENSES_CACHE_KEY) {
        migrate_expenses(&raw, expense_store, user_id);
        cache.remove(EXPENSES_CACHE_KEY);
    }

    if let Some(raw) = cache.get(CATEGORIES_CACHE_KEY) {
        migrate_categories(&raw, category_store, user_id);
        cache.remove(CATEGORIES_CACHE_KEY);
    }
}

fn migrate_expenses<E: ExpenseStore>(raw: &str, expense_store: &E, user_id: UserID) {
    let buckets: BTreeMap<String, Vec<CachedExpense>> = match serde_json::from_str(raw) {
        Ok(buckets) => buckets,
        Err(error) => {
            tracing::warn!("Could not parse the cached expenses, dropping them: {error}");
            return;
        }
    };

    for (date_key, entries) in buckets {
        let date = match parse_date_key(&date_key) {
            Ok(date) => date,
            Err(error) => {
                tracing::warn!("Skipping a cached expense bucket: {error}");
                continue;
            }
        };

        for entry in entries {
            let description = entry.description.as_deref().unwrap_or_default();

            if let Err(error) =
                expense_store.create(user_id, date, entry.amount, &entry.category, description)
            {
                tracing::warn!("Could not migrate a cached expense from {date_key}: {error}");
            }
        }
    }
}

fn migrate_categories<C: CategoryStore>(raw: &str, category_store: &C, user_id: UserID) {
    let categories: Vec<String> = match serde_json::from_str(raw) {
        Ok(categories) => categories,
        Err(error) => {
            tracing::warn!("Could not parse the cached categories, dropping them: {error}");
            return;
        }
    };

    let custom: Vec<String> = categories
        .into_iter()
        .filter(|category| !DEFAULT_CATEGORIES.contains(&category.as_str()))
        .collect();

    if custom.is_empty() {
        return;
    }

    if let Err(error) = category_store.create_many(user_id, &custom) {
        tracing::warn!("Could not migrate the cached categories: {error}");
    }
}
