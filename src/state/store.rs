use super::{Action, AppState};
use crate::core::model::{NewBudget, NewSavingsGoal, NewTransaction};
use crate::core::storage::{Collection, FinanceStorage, StorageKind};
use anyhow::Result;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error};

/// Owner of the application state and the storage used to populate it.
///
/// Operations never return errors. A failure is logged and recorded in
/// [`AppState::error`], leaving the collections as they were. Loads from the
/// in-memory backend never clear a recorded error.
pub struct FinanceStore {
    storage: Arc<dyn FinanceStorage>,
    state: Mutex<AppState>,
}

impl FinanceStore {
    pub fn new(storage: Arc<dyn FinanceStorage>) -> Self {
        Self {
            storage,
            state: Mutex::new(AppState::default()),
        }
    }

    pub fn storage_kind(&self) -> StorageKind {
        self.storage.kind()
    }

    /// Returns a copy of the current state.
    pub async fn snapshot(&self) -> AppState {
        self.state.lock().await.clone()
    }

    pub async fn error(&self) -> Option<String> {
        self.state.lock().await.error.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.is_loading()
    }

    pub async fn clear_error(&self) {
        self.dispatch(Action::ClearError).await;
    }

    async fn dispatch(&self, action: Action) {
        let mut state = self.state.lock().await;
        *state = std::mem::take(&mut *state).reduce(action);
    }

    /// Marks a fetch as started and returns its sequence number.
    async fn begin_fetch(&self, collection: Collection) -> u64 {
        let mut state = self.state.lock().await;
        *state = std::mem::take(&mut *state).reduce(Action::FetchStarted(collection));
        state.requests(collection).issued
    }

    async fn load<T, F>(
        &self,
        collection: Collection,
        fetch: F,
        loaded: impl FnOnce(u64, Vec<T>, bool) -> Action,
    ) where
        F: Future<Output = Result<Vec<T>>>,
    {
        let seq = self.begin_fetch(collection).await;
        match fetch.await {
            Ok(items) => {
                debug!(seq, count = items.len(), "Loaded {}", collection);
                let clears_error = self.storage_kind() == StorageKind::Remote;
                self.dispatch(loaded(seq, items, clears_error)).await;
            }
            Err(e) => {
                error!(seq, error = ?e, "Error fetching {}", collection);
                self.dispatch(Action::FetchFailed {
                    collection,
                    seq,
                    message: format!("{e:#}"),
                })
                .await;
            }
        }
        self.dispatch(Action::Finished).await;
    }

    /// Inserts a record and re-fetches its collection.
    ///
    /// Returns whether the insert itself succeeded. A failed re-fetch after a
    /// successful insert is recorded in the error field but still returns true.
    async fn add<T, F>(&self, collection: Collection, owner: &str, insert: F) -> bool
    where
        F: Future<Output = Result<T>>,
    {
        self.dispatch(Action::InsertStarted(collection)).await;
        let inserted = match insert.await {
            Ok(_) => {
                debug!("Added to {}, refreshing", collection);
                self.fetch(collection, owner).await;
                true
            }
            Err(e) => {
                error!(error = ?e, "Error adding to {}", collection);
                self.dispatch(Action::InsertFailed {
                    collection,
                    message: format!("{e:#}"),
                })
                .await;
                false
            }
        };
        self.dispatch(Action::Finished).await;
        inserted
    }

    /// Re-fetches a single collection.
    pub async fn fetch(&self, collection: Collection, owner: &str) {
        match collection {
            Collection::Transactions => self.fetch_transactions(owner).await,
            Collection::Budgets => self.fetch_budgets(owner).await,
            Collection::SavingsGoals => self.fetch_savings_goals(owner).await,
        }
    }

    pub async fn fetch_transactions(&self, owner: &str) {
        self.load(
            Collection::Transactions,
            self.storage.fetch_transactions(owner),
            |seq, items, clears_error| Action::TransactionsLoaded {
                seq,
                items,
                clears_error,
            },
        )
        .await
    }

    pub async fn fetch_budgets(&self, owner: &str) {
        self.load(
            Collection::Budgets,
            self.storage.fetch_budgets(owner),
            |seq, items, clears_error| Action::BudgetsLoaded {
                seq,
                items,
                clears_error,
            },
        )
        .await
    }

    pub async fn fetch_savings_goals(&self, owner: &str) {
        self.load(
            Collection::SavingsGoals,
            self.storage.fetch_savings_goals(owner),
            |seq, items, clears_error| Action::SavingsGoalsLoaded {
                seq,
                items,
                clears_error,
            },
        )
        .await
    }

    /// Fetches all three collections concurrently.
    pub async fn refresh_all(&self, owner: &str) {
        futures::join!(
            self.fetch_transactions(owner),
            self.fetch_budgets(owner),
            self.fetch_savings_goals(owner),
        );
    }

    /// Returns whether the record was stored; see the error field for details.
    pub async fn add_transaction(&self, owner: &str, draft: NewTransaction) -> bool {
        self.add(
            Collection::Transactions,
            owner,
            self.storage.insert_transaction(owner, draft),
        )
        .await
    }

    pub async fn add_budget(&self, owner: &str, draft: NewBudget) -> bool {
        self.add(
            Collection::Budgets,
            owner,
            self.storage.insert_budget(owner, draft),
        )
        .await
    }

    pub async fn add_savings_goal(&self, owner: &str, draft: NewSavingsGoal) -> bool {
        self.add(
            Collection::SavingsGoals,
            owner,
            self.storage.insert_savings_goal(owner, draft),
        )
        .await
    }
}
