//! The authoritative in-memory expense collection and category set for the
//! active session.
//!
//! The session is owned by the application state and shared by every
//! handler. All mutations go store-first: an operation only touches the
//! in-memory state after its store call has resolved successfully, so a
//! failed write leaves the session exactly as it was.
//!
//! Each reset of the session identity bumps an internal generation counter,
//! and results are applied only if the generation they were started under
//! is still current. A fetch that resolves after the user has signed out or
//! switched accounts is discarded instead of clobbering the newer state.

use std::sync::{Arc, Mutex};

use crate::{
    Error,
    auth::UserID,
    category::{CategoryStore, default_categories},
    date_key::parse_date_key,
    expense::{ExpenseCollection, ExpenseId, ExpenseStore, fetch_all},
    migration::{LocalCache, migrate_local_cache},
};

/// The in-memory state for the signed-in user: their expense collection,
/// category set, and a loading flag for the views.
///
/// Cloning the session clones the handle, not the state.
#[derive(Debug, Clone)]
pub struct ExpenseSession {
    inner: Arc<Mutex<SessionInner>>,
}

#[derive(Debug)]
struct SessionInner {
    user: Option<UserID>,
    generation: u64,
    expenses: ExpenseCollection,
    categories: Vec<String>,
    loading: bool,
}

/// A point-in-time copy of the session contents for rendering views.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// The expense collection at the time of the snapshot.
    pub expenses: ExpenseCollection,
    /// The category set at the time of the snapshot.
    pub categories: Vec<String>,
    /// Whether the session is currently (re)fetching its contents.
    pub loading: bool,
}

impl Default for ExpenseSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpenseSession {
    /// Create a session with no user: an empty collection and the default
    /// categories.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionInner {
                user: None,
                generation: 0,
                expenses: ExpenseCollection::new(),
                categories: default_categories(),
                loading: false,
            })),
        }
    }

    /// The user the session currently belongs to, if any.
    pub fn user(&self) -> Option<UserID> {
        self.inner.lock().unwrap().user
    }

    /// Whether the session is currently (re)fetching its contents.
    pub fn is_loading(&self) -> bool {
        self.inner.lock().unwrap().loading
    }

    /// Copy out the session contents for rendering.
    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.inner.lock().unwrap();

        SessionSnapshot {
            expenses: inner.expenses.clone(),
            categories: inner.categories.clone(),
            loading: inner.loading,
        }
    }

    /// Discard the session contents: no user, empty collection, default
    /// categories.
    ///
    /// Results of operations started before the sign-out will not be
    /// applied.
    pub fn sign_out(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.generation += 1;
        inner.user = None;
        inner.expenses = ExpenseCollection::new();
        inner.categories = default_categories();
        inner.loading = false;
    }

    /// Point the session at `user` and populate it from the stores.
    ///
    /// With no user this is a reset to the signed-out state. With a user,
    /// the session is marked loading, the legacy cache migration runs, and
    /// the fetched collection and categories replace the in-memory state.
    /// If the session identity changed in the meantime, the fetched results
    /// are discarded instead.
    pub async fn initialize<E, C, L>(
        &self,
        user: Option<UserID>,
        expense_store: &E,
        category_store: &C,
        cache: &mut L,
    ) where
        E: ExpenseStore,
        C: CategoryStore,
        L: LocalCache,
    {
        let Some(user_id) = user else {
            self.sign_out();
            return;
        };

        let generation = {
            let mut inner = self.inner.lock().unwrap();
            inner.generation += 1;
            inner.user = Some(user_id);
            inner.loading = true;
            inner.generation
        };

        migrate_local_cache(cache, expense_store, category_store, user_id);
        let (expenses, categories) = fetch_all(expense_store, category_store, user_id);

        let mut inner = self.inner.lock().unwrap();
        if inner.generation != generation {
            tracing::debug!("Discarding a fetch that resolved after the session identity changed");
            return;
        }

        inner.expenses = expenses;
        inner.categories = categories;
        inner.loading = false;
    }

    /// Initialize the session for `user_id` if it does not already belong
    /// to that user.
    ///
    /// Handlers call this on every authenticated request so that a change
    /// of identity (sign-in, account switch) re-populates the session.
    pub async fn ensure_user<E, C, L>(
        &self,
        user_id: UserID,
        expense_store: &E,
        category_store: &C,
        cache: &mut L,
    ) where
        E: ExpenseStore,
        C: CategoryStore,
        L: LocalCache,
    {
        if self.user() != Some(user_id) {
            self.initialize(Some(user_id), expense_store, category_store, cache)
                .await;
        }
    }

    /// Persist a new expense for the bucket at `date_key` and, on success,
    /// append it to the in-memory bucket (created on demand).
    ///
    /// On any failure the in-memory state is unchanged, and an invalid
    /// amount or date key is rejected without a store call.
    ///
    /// # Errors
    ///
    /// - [Error::InvalidDateKey] if `date_key` is not a `YYYY-MM-DD` key.
    /// - [Error::InvalidAmount] if `amount` is not finite and non-negative.
    /// - [Error::StoreUnavailable] if no user is signed in.
    /// - [Error::WriteFailed] if the store rejected the write.
    pub async fn add_expense<E>(
        &self,
        expense_store: &E,
        date_key: &str,
        amount: f64,
        category: &str,
        description: &str,
    ) -> Result<(), Error>
    where
        E: ExpenseStore,
    {
        let date = parse_date_key(date_key)?;

        if !(amount.is_finite() && amount >= 0.0) {
            tracing::warn!("Skipping an expense with an invalid amount: {amount}");
            return Err(Error::InvalidAmount(amount));
        }

        let (user_id, generation) = self.current_user_and_generation()?;

        let expense = expense_store
            .create(user_id, date, amount, category, description)
            .inspect_err(|error| tracing::error!("Could not add an expense: {error}"))?;

        let mut inner = self.inner.lock().unwrap();
        if inner.generation == generation {
            inner.expenses.insert(expense);
        }

        Ok(())
    }

    /// Delete the expense with `id` from the store and, on success, from
    /// the in-memory bucket at `date_key`. The bucket key is removed when
    /// its last expense goes.
    ///
    /// On failure the in-memory state is unchanged.
    ///
    /// # Errors
    ///
    /// - [Error::StoreUnavailable] if no user is signed in.
    /// - [Error::NotFound] if the store has no expense with `id`.
    /// - [Error::WriteFailed] if the store rejected the delete.
    pub async fn delete_expense<E>(
        &self,
        expense_store: &E,
        date_key: &str,
        id: ExpenseId,
    ) -> Result<(), Error>
    where
        E: ExpenseStore,
    {
        let (_, generation) = self.current_user_and_generation()?;

        expense_store
            .delete(id)
            .inspect_err(|error| tracing::error!("Could not delete expense {id}: {error}"))?;

        let mut inner = self.inner.lock().unwrap();
        if inner.generation == generation {
            inner.expenses.remove(date_key, id);
        }

        Ok(())
    }

    /// Record a new custom category and, on success, append it to the
    /// in-memory category set.
    ///
    /// A name that is blank after trimming, or already present in the
    /// category set (case-sensitive), is a no-op: no store call is made and
    /// `Ok` is returned.
    ///
    /// # Errors
    ///
    /// - [Error::StoreUnavailable] if no user is signed in.
    /// - [Error::WriteFailed] if the store rejected the write.
    pub async fn add_category<C>(&self, category_store: &C, category: &str) -> Result<(), Error>
    where
        C: CategoryStore,
    {
        let category = category.trim();
        if category.is_empty() {
            return Ok(());
        }

        let (user_id, generation) = {
            let inner = self.inner.lock().unwrap();
            if inner.categories.iter().any(|existing| existing == category) {
                return Ok(());
            }

            match inner.user {
                Some(user_id) => (user_id, inner.generation),
                None => {
                    return Err(Error::StoreUnavailable(
                        "no authenticated user".to_owned(),
                    ));
                }
            }
        };

        category_store
            .create(user_id, category)
            .inspect_err(|error| tracing::error!("Could not add category \"{category}\": {error}"))?;

        let mut inner = self.inner.lock().unwrap();
        if inner.generation == generation && !inner.categories.iter().any(|existing| existing == category)
        {
            inner.categories.push(category.to_owned());
        }

        Ok(())
    }

    fn current_user_and_generation(&self) -> Result<(UserID, u64), Error> {
        let inner = self.inner.lock().unwrap();

        match inner.user {
            Some(user_id) => Ok((user_id, inner.generation)),
            None => Err(Error::StoreUnavailable("no authenticated user".to_owned())),
        }
    }
}
