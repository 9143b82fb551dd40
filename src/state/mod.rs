//! Application state and its transitions.
//!
//! `AppState` is a plain value; every change goes through [`AppState::reduce`],
//! which takes the previous state and an [`Action`] and returns the next one.
//! Fetch outcomes carry the sequence number of the fetch that produced them,
//! and an outcome older than the last one applied is dropped, whether it is
//! data or a failure.

pub mod store;

use crate::core::model::{Budget, SavingsGoal, Transaction};
use crate::core::storage::Collection;

pub use store::FinanceStore;

/// Issue/apply counters for fetches of one collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestSequence {
    pub issued: u64,
    pub applied: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    pub savings_goals: Vec<SavingsGoal>,
    pub error: Option<String>,
    in_flight: usize,
    transaction_requests: RequestSequence,
    budget_requests: RequestSequence,
    savings_goal_requests: RequestSequence,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A fetch was issued; allocates the next sequence number.
    FetchStarted(Collection),
    /// An insert was issued.
    InsertStarted(Collection),
    /// `clears_error` is false for in-memory loads, which leave the error as is.
    TransactionsLoaded {
        seq: u64,
        items: Vec<Transaction>,
        clears_error: bool,
    },
    BudgetsLoaded {
        seq: u64,
        items: Vec<Budget>,
        clears_error: bool,
    },
    SavingsGoalsLoaded {
        seq: u64,
        items: Vec<SavingsGoal>,
        clears_error: bool,
    },
    FetchFailed {
        collection: Collection,
        seq: u64,
        message: String,
    },
    InsertFailed {
        collection: Collection,
        message: String,
    },
    Finished,
    ClearError,
}

impl AppState {
    /// Whether any fetch or insert is currently running.
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn requests(&self, collection: Collection) -> RequestSequence {
        match collection {
            Collection::Transactions => self.transaction_requests,
            Collection::Budgets => self.budget_requests,
            Collection::SavingsGoals => self.savings_goal_requests,
        }
    }

    fn requests_mut(&mut self, collection: Collection) -> &mut RequestSequence {
        match collection {
            Collection::Transactions => &mut self.transaction_requests,
            Collection::Budgets => &mut self.budget_requests,
            Collection::SavingsGoals => &mut self.savings_goal_requests,
        }
    }

    /// Records `seq` as applied if it is newer than the last applied outcome.
    fn accept(&mut self, collection: Collection, seq: u64) -> bool {
        let requests = self.requests_mut(collection);
        if seq <= requests.applied {
            return false;
        }
        requests.applied = seq;
        true
    }

    fn loaded(&mut self, clears_error: bool) {
        if clears_error {
            self.error = None;
        }
    }

    pub fn reduce(mut self, action: Action) -> AppState {
        match action {
            Action::FetchStarted(collection) => {
                self.in_flight += 1;
                self.requests_mut(collection).issued += 1;
            }
            Action::InsertStarted(_) => {
                self.in_flight += 1;
            }
            Action::TransactionsLoaded {
                seq,
                items,
                clears_error,
            } => {
                if self.accept(Collection::Transactions, seq) {
                    self.transactions = items;
                    self.loaded(clears_error);
                }
            }
            Action::BudgetsLoaded {
                seq,
                items,
                clears_error,
            } => {
                if self.accept(Collection::Budgets, seq) {
                    self.budgets = items;
                    self.loaded(clears_error);
                }
            }
            Action::SavingsGoalsLoaded {
                seq,
                items,
                clears_error,
            } => {
                if self.accept(Collection::SavingsGoals, seq) {
                    self.savings_goals = items;
                    self.loaded(clears_error);
                }
            }
            Action::FetchFailed {
                collection,
                seq,
                message,
            } => {
                if self.accept(collection, seq) {
                    self.error = Some(message);
                }
            }
            Action::InsertFailed { message, .. } => {
                self.error = Some(message);
            }
            Action::Finished => {
                self.in_flight = self.in_flight.saturating_sub(1);
            }
            Action::ClearError => {
                self.error = None;
            }
        }
        self
    }
}
