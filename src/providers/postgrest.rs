use crate::core::model::{
    Budget, NewBudget, NewSavingsGoal, NewTransaction, SavingsGoal, Transaction,
};
use crate::core::storage::{Collection, FinanceStorage, StorageKind};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, error, instrument};

/// Storage backed by a hosted PostgREST endpoint (e.g. a Supabase project).
pub struct PostgrestStorage {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

/// Row sent on insert: the draft fields plus the owning user.
#[derive(Serialize)]
struct InsertRow<'a, T: Serialize> {
    user_id: &'a str,
    #[serde(flatten)]
    fields: &'a T,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    details: Option<String>,
}

impl PostgrestStorage {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("fintrack/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    fn table_url(&self, collection: Collection) -> String {
        format!("{}/rest/v1/{}", self.base_url, collection.table())
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Turns a non-success response into an error carrying the server message.
    async fn check(response: reqwest::Response, collection: Collection) -> Result<String> {
        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read {collection} response"))?;

        if status.is_success() {
            return Ok(body);
        }

        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|e| match (e.message, e.details) {
                (Some(m), Some(d)) => Some(format!("{m} ({d})")),
                (m, _) => m,
            })
            .unwrap_or_else(|| status.to_string());
        error!(%status, response = %body, "Datastore request for {} failed", collection);
        Err(anyhow!("{message}"))
    }

    async fn select<T>(&self, collection: Collection, owner: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        let owner_filter = format!("eq.{owner}");
        let url = reqwest::Url::parse_with_params(
            &self.table_url(collection),
            &[
                ("select", "*"),
                ("user_id", owner_filter.as_str()),
                ("order", collection.order()),
            ],
        )
        .with_context(|| format!("Invalid datastore URL: {}", self.base_url))?;
        debug!("Requesting {} from {}", collection, url);

        let response = self
            .authorized(self.client.get(url))
            .send()
            .await
            .with_context(|| format!("Failed to send request for {collection}"))?;
        let body = Self::check(response, collection).await?;

        let rows: Vec<T> = serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse {collection} response. Response: '{body}'"))?;
        debug!("Fetched {} {}", rows.len(), collection);
        Ok(rows)
    }

    async fn insert<D, T>(&self, collection: Collection, owner: &str, draft: &D) -> Result<T>
    where
        D: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        let payload = [InsertRow {
            user_id: owner,
            fields: draft,
        }];

        let response = self
            .authorized(self.client.post(self.table_url(collection)))
            .header("Prefer", "return=representation")
            .json(&payload)
            .send()
            .await
            .with_context(|| format!("Failed to send insert for {collection}"))?;
        let body = Self::check(response, collection).await?;

        let mut rows: Vec<T> = serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse inserted {collection}. Response: '{body}'"))?;
        if rows.is_empty() {
            return Err(anyhow!("Insert into {} returned no rows", collection));
        }
        Ok(rows.swap_remove(0))
    }
}

#[async_trait]
impl FinanceStorage for PostgrestStorage {
    fn kind(&self) -> StorageKind {
        StorageKind::Remote
    }

    #[instrument(name = "FetchTransactions", skip(self))]
    async fn fetch_transactions(&self, owner: &str) -> Result<Vec<Transaction>> {
        self.select(Collection::Transactions, owner).await
    }

    #[instrument(name = "InsertTransaction", skip(self, draft))]
    async fn insert_transaction(&self, owner: &str, draft: NewTransaction) -> Result<Transaction> {
        draft.validate()?;
        self.insert(Collection::Transactions, owner, &draft).await
    }

    #[instrument(name = "FetchBudgets", skip(self))]
    async fn fetch_budgets(&self, owner: &str) -> Result<Vec<Budget>> {
        self.select(Collection::Budgets, owner).await
    }

    #[instrument(name = "InsertBudget", skip(self, draft))]
    async fn insert_budget(&self, owner: &str, draft: NewBudget) -> Result<Budget> {
        draft.validate()?;
        self.insert(Collection::Budgets, owner, &draft).await
    }

    #[instrument(name = "FetchSavingsGoals", skip(self))]
    async fn fetch_savings_goals(&self, owner: &str) -> Result<Vec<SavingsGoal>> {
        self.select(Collection::SavingsGoals, owner).await
    }

    #[instrument(name = "InsertSavingsGoal", skip(self, draft))]
    async fn insert_savings_goal(
        &self,
        owner: &str,
        draft: NewSavingsGoal,
    ) -> Result<SavingsGoal> {
        draft.validate()?;
        self.insert(Collection::SavingsGoals, owner, &draft).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{BudgetPeriod, TransactionType};
    use chrono::NaiveDate;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const API_KEY: &str = "test-anon-key";

    const TRANSACTIONS_JSON: &str = r#"[
        {
            "id": "b7f1c2a0-0000-4000-8000-000000000002",
            "user_id": "u1",
            "amount": 500,
            "type": "expense",
            "category": "Rent",
            "description": "Monthly rent",
            "date": "2024-02-02",
            "created_at": "2024-02-02T08:00:00.000000+00:00"
        },
        {
            "id": "b7f1c2a0-0000-4000-8000-000000000001",
            "user_id": "u1",
            "amount": 3000,
            "type": "income",
            "category": "Salary",
            "description": "Monthly salary",
            "date": "2024-02-01",
            "created_at": "2024-02-01T08:00:00+00:00"
        }
    ]"#;

    async fn create_select_mock_server(
        table: &str,
        order: &str,
        mock_response: &str,
        status_code: u16,
    ) -> MockServer {
        let mock_server = MockServer::start().await;
        let expected_path = format!("/rest/v1/{table}");

        Mock::given(method("GET"))
            .and(path(&expected_path))
            .and(query_param("select", "*"))
            .and(query_param("user_id", "eq.u1"))
            .and(query_param("order", order))
            .and(header("apikey", API_KEY))
            .and(header("authorization", format!("Bearer {API_KEY}").as_str()))
            .respond_with(ResponseTemplate::new(status_code).set_body_string(mock_response))
            .mount(&mock_server)
            .await;
        mock_server
    }

    #[tokio::test]
    async fn test_fetch_transactions() {
        let mock_server =
            create_select_mock_server("transactions", "date.desc", TRANSACTIONS_JSON, 200).await;
        let storage = PostgrestStorage::new(&mock_server.uri(), API_KEY).unwrap();

        let transactions = storage.fetch_transactions("u1").await.unwrap();

        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].kind, TransactionType::Expense);
        assert_eq!(transactions[0].amount, 500.0);
        assert_eq!(transactions[1].category, "Salary");
        assert_eq!(
            transactions[1].date,
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
    }

    #[tokio::test]
    async fn test_fetch_budgets_and_goals() {
        let budgets_json = r#"[{"id": "b1", "user_id": "u1", "category": "Food", "amount": 400, "period": "monthly", "created_at": "2024-02-01T00:00:00Z"}]"#;
        let mock_server =
            create_select_mock_server("budgets", "created_at.asc", budgets_json, 200).await;
        let storage = PostgrestStorage::new(&mock_server.uri(), API_KEY).unwrap();
        let budgets = storage.fetch_budgets("u1").await.unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].period, BudgetPeriod::Monthly);

        let goals_json = r#"[{"id": "g1", "user_id": "u1", "name": "Vacation", "target_amount": 5000, "current_amount": 1000, "target_date": "2024-08-31", "created_at": "2024-02-01T00:00:00Z"}]"#;
        let mock_server =
            create_select_mock_server("savings_goals", "target_date.asc", goals_json, 200).await;
        let storage = PostgrestStorage::new(&mock_server.uri(), API_KEY).unwrap();
        let goals = storage.fetch_savings_goals("u1").await.unwrap();
        assert_eq!(goals[0].name, "Vacation");
        assert_eq!(goals[0].target_amount, 5000.0);
    }

    #[tokio::test]
    async fn test_fetch_error_uses_server_message() {
        let mock_server = create_select_mock_server(
            "transactions",
            "date.desc",
            r#"{"code": "42501", "message": "permission denied for table transactions", "details": null, "hint": null}"#,
            401,
        )
        .await;
        let storage = PostgrestStorage::new(&mock_server.uri(), API_KEY).unwrap();

        let err = storage.fetch_transactions("u1").await.unwrap_err();
        assert_eq!(err.to_string(), "permission denied for table transactions");
    }

    #[tokio::test]
    async fn test_fetch_error_without_body_uses_status() {
        let mock_server =
            create_select_mock_server("transactions", "date.desc", "", 503).await;
        let storage = PostgrestStorage::new(&mock_server.uri(), API_KEY).unwrap();

        let err = storage.fetch_transactions("u1").await.unwrap_err();
        assert!(err.to_string().contains("503"), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_fetch_malformed_response() {
        let mock_server =
            create_select_mock_server("transactions", "date.desc", "not json", 200).await;
        let storage = PostgrestStorage::new(&mock_server.uri(), API_KEY).unwrap();

        let err = storage.fetch_transactions("u1").await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse transactions response"));
    }

    #[tokio::test]
    async fn test_insert_transaction() {
        let mock_server = MockServer::start().await;
        let expected_body = serde_json::json!([{
            "user_id": "u1",
            "amount": 42.0,
            "type": "expense",
            "category": "Groceries",
            "description": "Market",
            "date": "2024-02-05"
        }]);
        let response = r#"[{"id": "srv-1", "user_id": "u1", "amount": 42.0, "type": "expense", "category": "Groceries", "description": "Market", "date": "2024-02-05", "created_at": "2024-02-05T12:00:00+00:00"}]"#;

        Mock::given(method("POST"))
            .and(path("/rest/v1/transactions"))
            .and(header("prefer", "return=representation"))
            .and(header("apikey", API_KEY))
            .and(body_json(expected_body))
            .respond_with(ResponseTemplate::new(201).set_body_string(response))
            .expect(1)
            .mount(&mock_server)
            .await;

        let storage = PostgrestStorage::new(&mock_server.uri(), API_KEY).unwrap();
        let draft = NewTransaction {
            amount: 42.0,
            kind: TransactionType::Expense,
            category: "Groceries".to_string(),
            description: "Market".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 2, 5).unwrap(),
        };

        let inserted = storage.insert_transaction("u1", draft).await.unwrap();
        assert_eq!(inserted.id, "srv-1");
        assert_eq!(inserted.user_id, "u1");
    }

    #[tokio::test]
    async fn test_insert_rejected_by_server() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/budgets"))
            .respond_with(ResponseTemplate::new(400).set_body_string(
                r#"{"message": "new row violates check constraint", "details": "Failing row contains (...)"}"#,
            ))
            .mount(&mock_server)
            .await;

        let storage = PostgrestStorage::new(&mock_server.uri(), API_KEY).unwrap();
        let draft = NewBudget {
            category: "Food".to_string(),
            amount: 400.0,
            period: BudgetPeriod::Monthly,
        };

        let err = storage.insert_budget("u1", draft).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "new row violates check constraint (Failing row contains (...))"
        );
    }

    #[tokio::test]
    async fn test_insert_invalid_draft_is_not_sent() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201).set_body_string("[]"))
            .expect(0)
            .mount(&mock_server)
            .await;

        let storage = PostgrestStorage::new(&mock_server.uri(), API_KEY).unwrap();
        let draft = NewSavingsGoal {
            name: "House".to_string(),
            target_amount: 0.0,
            current_amount: 0.0,
            target_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
        };
        assert!(storage.insert_savings_goal("u1", draft).await.is_err());
    }

    #[tokio::test]
    async fn test_insert_with_empty_representation() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/savings_goals"))
            .respond_with(ResponseTemplate::new(201).set_body_string("[]"))
            .mount(&mock_server)
            .await;

        let storage = PostgrestStorage::new(&mock_server.uri(), API_KEY).unwrap();
        let draft = NewSavingsGoal {
            name: "House".to_string(),
            target_amount: 100000.0,
            current_amount: 0.0,
            target_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
        };
        let err = storage.insert_savings_goal("u1", draft).await.unwrap_err();
        assert!(err.to_string().contains("returned no rows"));
    }
}
