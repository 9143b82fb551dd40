//! Core business logic abstractions

pub mod analytics;
pub mod config;
pub mod log;
pub mod model;
pub mod storage;

// Re-export main types for cleaner imports
pub use model::{
    Budget, BudgetPeriod, Category, NewBudget, NewSavingsGoal, NewTransaction, SavingsGoal,
    Transaction, TransactionType,
};
pub use storage::{Collection, FinanceStorage, StorageKind};
