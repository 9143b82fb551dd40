//! The add-transaction form.
use super::{dashboard, ui};
use crate::core::model::{Category, NewTransaction, TransactionType};
use crate::state::FinanceStore;
use anyhow::{Context, Result, anyhow, bail};
use chrono::{NaiveDate, Utc};
use tracing::{error, info, warn};

/// Raw user input for a new transaction, validated on submit.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionForm {
    pub amount: String,
    pub kind: TransactionType,
    pub category: Category,
    pub description: String,
    pub date: String,
}

impl Default for TransactionForm {
    fn default() -> Self {
        Self {
            amount: String::new(),
            kind: TransactionType::Expense,
            category: Category::ALL[0],
            description: String::new(),
            date: Utc::now().date_naive().format("%Y-%m-%d").to_string(),
        }
    }
}

impl TransactionForm {
    /// Converts the input into a draft, rejecting malformed amounts and dates.
    pub fn to_draft(&self) -> Result<NewTransaction> {
        let amount: f64 = self
            .amount
            .trim()
            .parse()
            .with_context(|| format!("Invalid amount: '{}'", self.amount))?;
        if !amount.is_finite() || amount < 0.0 {
            bail!("Amount must be zero or more, got {}", self.amount);
        }
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .with_context(|| format!("Invalid date: '{}' (expected YYYY-MM-DD)", self.date))?;

        Ok(NewTransaction {
            amount,
            kind: self.kind,
            category: self.category.to_string(),
            description: self.description.trim().to_string(),
            date,
        })
    }

    /// Submits the form through the store.
    ///
    /// Once the record is stored the form is reset to its defaults, even if
    /// refreshing the list afterwards fails. If the insert fails the form keeps
    /// its input and the store's error is returned.
    pub async fn submit(&mut self, store: &FinanceStore, owner: &str) -> Result<()> {
        let draft = self.to_draft()?;
        store.clear_error().await;

        if !store.add_transaction(owner, draft).await {
            let message = store.error().await.unwrap_or_default();
            error!(%message, "Failed to add transaction");
            return Err(anyhow!("Failed to add transaction: {message}"));
        }
        if let Some(message) = store.error().await {
            warn!(%message, "Transaction stored but refreshing failed");
        }
        *self = Self::default();
        Ok(())
    }
}

pub async fn run(
    store: &FinanceStore,
    mut form: TransactionForm,
    owner: &str,
    currency: &str,
) -> Result<()> {
    store.refresh_all(owner).await;
    form.submit(store, owner).await?;
    info!("Transaction added");

    println!(
        "{}\n",
        ui::style_text("Transaction saved", ui::StyleType::TotalValue)
    );
    dashboard::show(store, currency).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStorage;
    use std::sync::Arc;

    fn filled_form() -> TransactionForm {
        TransactionForm {
            amount: "19.99".to_string(),
            kind: TransactionType::Expense,
            category: Category::Entertainment,
            description: " Cinema ".to_string(),
            date: "2024-02-10".to_string(),
        }
    }

    #[test]
    fn test_form_defaults() {
        let form = TransactionForm::default();
        assert!(form.amount.is_empty());
        assert_eq!(form.kind, TransactionType::Expense);
        assert_eq!(form.category, Category::Salary);
        assert!(NaiveDate::parse_from_str(&form.date, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn test_to_draft() {
        let draft = filled_form().to_draft().unwrap();
        assert_eq!(draft.amount, 19.99);
        assert_eq!(draft.category, "Entertainment");
        assert_eq!(draft.description, "Cinema");
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
    }

    #[test]
    fn test_to_draft_rejects_bad_input() {
        let mut form = filled_form();
        form.amount = "abc".to_string();
        assert!(form.to_draft().unwrap_err().to_string().contains("Invalid amount"));

        form.amount = "-3".to_string();
        assert!(form.to_draft().is_err());

        form.amount = "3".to_string();
        form.date = "10.02.2024".to_string();
        assert!(form.to_draft().unwrap_err().to_string().contains("Invalid date"));
    }

    #[tokio::test]
    async fn test_submit_clears_form_on_success() {
        let store = FinanceStore::new(Arc::new(MemoryStorage::seeded("1")));
        let mut form = filled_form();

        form.submit(&store, "1").await.unwrap();

        assert_eq!(form, TransactionForm::default());
        let state = store.snapshot().await;
        assert_eq!(state.transactions[0].description, "Cinema");
    }

    #[tokio::test]
    async fn test_submit_surfaces_failure_and_keeps_input() {
        let store = FinanceStore::new(Arc::new(MemoryStorage::seeded("1")));
        let mut form = filled_form();
        form.amount = "not a number".to_string();

        let err = form.submit(&store, "1").await.unwrap_err();
        assert!(err.to_string().contains("Invalid amount"));
        assert_eq!(form.amount, "not a number");
    }

    #[tokio::test]
    async fn test_submit_succeeds_when_only_refresh_fails() {
        use crate::providers::postgrest::PostgrestStorage;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/transactions"))
            .respond_with(ResponseTemplate::new(201).set_body_string(
                r#"[{"id": "r1", "user_id": "1", "amount": 19.99, "type": "expense", "category": "Entertainment", "description": "Cinema", "date": "2024-02-10", "created_at": "2024-02-10T00:00:00Z"}]"#,
            ))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/transactions"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let storage = PostgrestStorage::new(&mock_server.uri(), "key").unwrap();
        let store = FinanceStore::new(Arc::new(storage));
        let mut form = filled_form();

        form.submit(&store, "1").await.unwrap();

        assert_eq!(form, TransactionForm::default());
        assert!(store.error().await.unwrap().contains("503"));
    }
}
