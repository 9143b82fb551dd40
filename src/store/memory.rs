use super::sample;
use crate::core::model::{
    Budget, NewBudget, NewSavingsGoal, NewTransaction, SavingsGoal, Transaction,
};
use crate::core::storage::{FinanceStorage, StorageKind};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

#[derive(Default)]
struct Collections {
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
    savings_goals: Vec<SavingsGoal>,
}

/// In-process storage used when no hosted datastore is configured.
///
/// Records live only for the lifetime of the process. New records are
/// prepended, so fetches return them newest first ahead of the seed data.
pub struct MemoryStorage {
    inner: Arc<Mutex<Collections>>,
}

impl MemoryStorage {
    /// Creates an empty storage
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Collections::default())),
        }
    }

    /// Creates a storage holding the demo records for `owner`
    pub fn seeded(owner: &str) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Collections {
                transactions: sample::transactions(owner),
                budgets: sample::budgets(owner),
                savings_goals: sample::savings_goals(owner),
            })),
        }
    }

    fn new_id() -> String {
        Uuid::new_v4().simple().to_string()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn owned_by<T: Clone>(items: &[T], owner: &str, user_of: impl Fn(&T) -> &str) -> Vec<T> {
    items
        .iter()
        .filter(|item| user_of(item) == owner)
        .cloned()
        .collect()
}

#[async_trait]
impl FinanceStorage for MemoryStorage {
    fn kind(&self) -> StorageKind {
        StorageKind::Local
    }

    async fn fetch_transactions(&self, owner: &str) -> Result<Vec<Transaction>> {
        debug!("Using in-memory transactions");
        let inner = self.inner.lock().await;
        Ok(owned_by(&inner.transactions, owner, |t| t.user_id.as_str()))
    }

    async fn insert_transaction(&self, owner: &str, draft: NewTransaction) -> Result<Transaction> {
        draft.validate()?;
        let record = draft.into_record(Self::new_id(), owner, Utc::now());
        let mut inner = self.inner.lock().await;
        inner.transactions.insert(0, record.clone());
        debug!(id = %record.id, "Stored transaction in memory");
        Ok(record)
    }

    async fn fetch_budgets(&self, owner: &str) -> Result<Vec<Budget>> {
        debug!("Using in-memory budgets");
        let inner = self.inner.lock().await;
        Ok(owned_by(&inner.budgets, owner, |b| b.user_id.as_str()))
    }

    async fn insert_budget(&self, owner: &str, draft: NewBudget) -> Result<Budget> {
        draft.validate()?;
        let record = draft.into_record(Self::new_id(), owner, Utc::now());
        let mut inner = self.inner.lock().await;
        inner.budgets.insert(0, record.clone());
        debug!(id = %record.id, "Stored budget in memory");
        Ok(record)
    }

    async fn fetch_savings_goals(&self, owner: &str) -> Result<Vec<SavingsGoal>> {
        debug!("Using in-memory savings goals");
        let inner = self.inner.lock().await;
        Ok(owned_by(&inner.savings_goals, owner, |g| g.user_id.as_str()))
    }

    async fn insert_savings_goal(
        &self,
        owner: &str,
        draft: NewSavingsGoal,
    ) -> Result<SavingsGoal> {
        draft.validate()?;
        let record = draft.into_record(Self::new_id(), owner, Utc::now());
        let mut inner = self.inner.lock().await;
        inner.savings_goals.insert(0, record.clone());
        debug!(id = %record.id, "Stored savings goal in memory");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{BudgetPeriod, TransactionType};
    use chrono::NaiveDate;
    use std::collections::HashSet;

    fn draft(amount: f64) -> NewTransaction {
        NewTransaction {
            amount,
            kind: TransactionType::Expense,
            category: "Utilities".to_string(),
            description: "Power bill".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_seeded_fetch_returns_demo_records() {
        let storage = MemoryStorage::seeded("1");

        let transactions = storage.fetch_transactions("1").await.unwrap();
        assert_eq!(transactions.len(), 3);
        assert_eq!(transactions[0].description, "Monthly salary");
        assert_eq!(storage.fetch_budgets("1").await.unwrap().len(), 2);
        assert_eq!(storage.fetch_savings_goals("1").await.unwrap().len(), 2);

        // Repeated fetches are stable
        assert_eq!(storage.fetch_transactions("1").await.unwrap(), transactions);
    }

    #[tokio::test]
    async fn test_fetch_is_scoped_to_owner() {
        let storage = MemoryStorage::seeded("alice");
        assert!(storage.fetch_transactions("bob").await.unwrap().is_empty());

        storage.insert_transaction("bob", draft(12.0)).await.unwrap();
        assert_eq!(storage.fetch_transactions("bob").await.unwrap().len(), 1);
        assert_eq!(storage.fetch_transactions("alice").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_insert_prepends_with_unique_id() {
        let storage = MemoryStorage::seeded("1");

        let first = storage.insert_transaction("1", draft(10.0)).await.unwrap();
        let second = storage.insert_transaction("1", draft(20.0)).await.unwrap();

        let transactions = storage.fetch_transactions("1").await.unwrap();
        assert_eq!(transactions[0], second);
        assert_eq!(transactions[1], first);
        assert_eq!(second.user_id, "1");

        let ids: HashSet<_> = transactions.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), transactions.len());
        assert!(!second.id.is_empty());
    }

    #[tokio::test]
    async fn test_insert_rejects_invalid_draft() {
        let storage = MemoryStorage::new();
        assert!(storage.insert_transaction("1", draft(-5.0)).await.is_err());
        assert!(storage.fetch_transactions("1").await.unwrap().is_empty());

        let budget = NewBudget {
            category: "Food".to_string(),
            amount: -1.0,
            period: BudgetPeriod::Monthly,
        };
        assert!(storage.insert_budget("1", budget).await.is_err());
    }

    #[tokio::test]
    async fn test_insert_budget_and_goal() {
        let storage = MemoryStorage::seeded("1");

        let budget = storage
            .insert_budget(
                "1",
                NewBudget {
                    category: "Transportation".to_string(),
                    amount: 120.0,
                    period: BudgetPeriod::Monthly,
                },
            )
            .await
            .unwrap();
        let budgets = storage.fetch_budgets("1").await.unwrap();
        assert_eq!(budgets.len(), 3);
        assert_eq!(budgets[0], budget);

        let goal = storage
            .insert_savings_goal(
                "1",
                NewSavingsGoal {
                    name: "Bike".to_string(),
                    target_amount: 800.0,
                    current_amount: 0.0,
                    target_date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
                },
            )
            .await
            .unwrap();
        assert_eq!(storage.fetch_savings_goals("1").await.unwrap()[0], goal);
    }
}
