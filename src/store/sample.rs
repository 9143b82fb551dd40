//! Demo records used when no hosted datastore is configured

use crate::core::model::{
    Budget, BudgetPeriod, SavingsGoal, Transaction, TransactionType,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn midnight(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

pub fn transactions(owner: &str) -> Vec<Transaction> {
    let entry = |id: &str, amount, kind, category: &str, description: &str, d| Transaction {
        id: id.to_string(),
        user_id: owner.to_string(),
        amount,
        kind,
        category: category.to_string(),
        description: description.to_string(),
        date: day(2024, 2, d),
        created_at: midnight(2024, 2, d),
    };
    vec![
        entry("1", 3000.0, TransactionType::Income, "Salary", "Monthly salary", 1),
        entry("2", 500.0, TransactionType::Expense, "Rent", "Monthly rent", 2),
        entry("3", 100.0, TransactionType::Expense, "Groceries", "Weekly groceries", 3),
    ]
}

pub fn budgets(owner: &str) -> Vec<Budget> {
    let entry = |id: &str, category: &str, amount| Budget {
        id: id.to_string(),
        user_id: owner.to_string(),
        category: category.to_string(),
        amount,
        period: BudgetPeriod::Monthly,
        created_at: midnight(2024, 2, 1),
    };
    vec![entry("1", "Food", 400.0), entry("2", "Entertainment", 200.0)]
}

pub fn savings_goals(owner: &str) -> Vec<SavingsGoal> {
    let entry = |id: &str, name: &str, target_amount, current_amount, target_date| SavingsGoal {
        id: id.to_string(),
        user_id: owner.to_string(),
        name: name.to_string(),
        target_amount,
        current_amount,
        target_date,
        created_at: midnight(2024, 2, 1),
    };
    vec![
        entry("1", "Emergency Fund", 10000.0, 2000.0, day(2024, 12, 31)),
        entry("2", "Vacation", 5000.0, 1000.0, day(2024, 8, 31)),
    ]
}
