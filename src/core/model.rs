//! Record types for transactions, budgets and savings goals

use anyhow::{Result, anyhow, bail};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    /// Sign applied to a stored (always positive) amount.
    pub fn sign(&self) -> f64 {
        match self {
            TransactionType::Income => 1.0,
            TransactionType::Expense => -1.0,
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TransactionType::Income => "income",
                TransactionType::Expense => "expense",
            }
        )
    }
}

impl FromStr for TransactionType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(anyhow!("Invalid transaction type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Monthly,
    Yearly,
}

impl Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                BudgetPeriod::Monthly => "monthly",
                BudgetPeriod::Yearly => "yearly",
            }
        )
    }
}

impl FromStr for BudgetPeriod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monthly" => Ok(BudgetPeriod::Monthly),
            "yearly" => Ok(BudgetPeriod::Yearly),
            _ => Err(anyhow!("Invalid budget period: {}", s)),
        }
    }
}

/// Categories offered by the add-transaction form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Salary,
    Freelance,
    Investments,
    Rent,
    Utilities,
    Groceries,
    Transportation,
    Entertainment,
    Healthcare,
    Other,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Salary,
        Category::Freelance,
        Category::Investments,
        Category::Rent,
        Category::Utilities,
        Category::Groceries,
        Category::Transportation,
        Category::Entertainment,
        Category::Healthcare,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Salary => "Salary",
            Category::Freelance => "Freelance",
            Category::Investments => "Investments",
            Category::Rent => "Rent",
            Category::Utilities => "Utilities",
            Category::Groceries => "Groceries",
            Category::Transportation => "Transportation",
            Category::Entertainment => "Entertainment",
            Category::Healthcare => "Healthcare",
            Category::Other => "Other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let names: Vec<_> = Category::ALL.iter().map(|c| c.as_str()).collect();
                anyhow!("Invalid category: {} (expected one of {})", s, names.join(", "))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Amount with the sign implied by the transaction type.
    pub fn signed_amount(&self) -> f64 {
        self.kind.sign() * self.amount
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: String,
    pub user_id: String,
    pub category: String,
    pub amount: f64,
    pub period: BudgetPeriod,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub target_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied by the caller when recording a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBudget {
    pub category: String,
    pub amount: f64,
    pub period: BudgetPeriod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSavingsGoal {
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub target_date: NaiveDate,
}

fn ensure_non_negative(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        bail!("{field} must be a non-negative number, got {value}");
    }
    Ok(())
}

fn ensure_positive(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        bail!("{field} must be a positive number, got {value}");
    }
    Ok(())
}

impl NewTransaction {
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("amount", self.amount)
    }

    pub fn into_record(self, id: String, user_id: &str, created_at: DateTime<Utc>) -> Transaction {
        Transaction {
            id,
            user_id: user_id.to_string(),
            amount: self.amount,
            kind: self.kind,
            category: self.category,
            description: self.description,
            date: self.date,
            created_at,
        }
    }
}

impl NewBudget {
    pub fn validate(&self) -> Result<()> {
        if self.category.trim().is_empty() {
            bail!("category must not be empty");
        }
        ensure_positive("amount", self.amount)
    }

    pub fn into_record(self, id: String, user_id: &str, created_at: DateTime<Utc>) -> Budget {
        Budget {
            id,
            user_id: user_id.to_string(),
            category: self.category,
            amount: self.amount,
            period: self.period,
            created_at,
        }
    }
}

impl NewSavingsGoal {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("name must not be empty");
        }
        ensure_positive("target_amount", self.target_amount)?;
        ensure_non_negative("current_amount", self.current_amount)
    }

    pub fn into_record(self, id: String, user_id: &str, created_at: DateTime<Utc>) -> SavingsGoal {
        SavingsGoal {
            id,
            user_id: user_id.to_string(),
            name: self.name,
            target_amount: self.target_amount,
            current_amount: self.current_amount,
            target_date: self.target_date,
            created_at,
        }
    }
}
