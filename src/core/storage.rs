//! Storage abstractions shared by the remote and in-memory backends

use crate::core::model::{
    Budget, NewBudget, NewSavingsGoal, NewTransaction, SavingsGoal, Transaction,
};
use anyhow::Result;
use async_trait::async_trait;
use std::fmt::Display;

/// The three record collections held by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Transactions,
    Budgets,
    SavingsGoals,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Transactions,
        Collection::Budgets,
        Collection::SavingsGoals,
    ];

    /// Name of the remote table backing this collection.
    pub fn table(&self) -> &'static str {
        match self {
            Collection::Transactions => "transactions",
            Collection::Budgets => "budgets",
            Collection::SavingsGoals => "savings_goals",
        }
    }

    /// Natural ordering requested when selecting the collection.
    pub fn order(&self) -> &'static str {
        match self {
            Collection::Transactions => "date.desc",
            Collection::Budgets => "created_at.asc",
            Collection::SavingsGoals => "target_date.asc",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Collection::Transactions => "transactions",
                Collection::Budgets => "budgets",
                Collection::SavingsGoals => "savings goals",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Remote,
    Local,
}

/// Persistence capability injected into the state store.
///
/// Every operation is scoped to an explicit owner. Inserts return the stored
/// record including identity and creation timestamp.
#[async_trait]
pub trait FinanceStorage: Send + Sync {
    fn kind(&self) -> StorageKind;

    async fn fetch_transactions(&self, owner: &str) -> Result<Vec<Transaction>>;
    async fn insert_transaction(&self, owner: &str, draft: NewTransaction) -> Result<Transaction>;

    async fn fetch_budgets(&self, owner: &str) -> Result<Vec<Budget>>;
    async fn insert_budget(&self, owner: &str, draft: NewBudget) -> Result<Budget>;

    async fn fetch_savings_goals(&self, owner: &str) -> Result<Vec<SavingsGoal>>;
    async fn insert_savings_goal(&self, owner: &str, draft: NewSavingsGoal)
    -> Result<SavingsGoal>;
}
