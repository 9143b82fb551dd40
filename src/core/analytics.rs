//! Derived values computed from the in-memory collections.
//!
//! Everything here is a pure function of its inputs. Malformed numbers are not
//! rejected: a non-finite amount yields a non-finite total.
use crate::core::model::{Budget, BudgetPeriod, SavingsGoal, Transaction, TransactionType};
use chrono::{Datelike, NaiveDate};

/// Number of transactions shown in the recent list.
pub const RECENT_LIMIT: usize = 5;

/// Label format used for cashflow points.
pub const CHART_DATE_FORMAT: &str = "%d.%m.%y";

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
}

/// A single point of the cashflow chart.
#[derive(Debug, Clone, PartialEq)]
pub struct CashflowPoint {
    pub date: NaiveDate,
    pub label: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalProgress {
    pub name: String,
    pub current_amount: f64,
    pub target_amount: f64,
    pub target_date: NaiveDate,
    /// Percentage of the target reached, `None` for a zero target.
    pub percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetUsage {
    pub category: String,
    pub period: BudgetPeriod,
    pub limit: f64,
    pub spent: f64,
    pub remaining: f64,
}

/// Everything the dashboard renders, derived from one state snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub totals: Totals,
    pub cashflow: Vec<CashflowPoint>,
    pub recent: Vec<Transaction>,
    pub budget_count: usize,
    pub savings_goal_count: usize,
}

fn sum_of(transactions: &[Transaction], kind: TransactionType) -> f64 {
    transactions
        .iter()
        .filter(|t| t.kind == kind)
        .map(|t| t.amount)
        .sum()
}

pub fn totals(transactions: &[Transaction]) -> Totals {
    let income = sum_of(transactions, TransactionType::Income);
    let expenses = sum_of(transactions, TransactionType::Expense);
    Totals {
        income,
        expenses,
        balance: income - expenses,
    }
}

/// Builds the cashflow series in ascending date order.
///
/// The sort is stable, so transactions sharing a date keep the relative order
/// they have in the collection.
pub fn cashflow_series(transactions: &[Transaction]) -> Vec<CashflowPoint> {
    let mut ordered: Vec<&Transaction> = transactions.iter().collect();
    ordered.sort_by_key(|t| t.date);
    ordered
        .into_iter()
        .map(|t| CashflowPoint {
            date: t.date,
            label: t.date.format(CHART_DATE_FORMAT).to_string(),
            amount: t.signed_amount(),
        })
        .collect()
}

/// The head of the collection as stored, without re-sorting.
pub fn recent_transactions(transactions: &[Transaction], limit: usize) -> &[Transaction] {
    &transactions[..transactions.len().min(limit)]
}

pub fn goal_progress(goal: &SavingsGoal) -> GoalProgress {
    let percent = (goal.target_amount != 0.0)
        .then(|| goal.current_amount / goal.target_amount * 100.0);
    GoalProgress {
        name: goal.name.clone(),
        current_amount: goal.current_amount,
        target_amount: goal.target_amount,
        target_date: goal.target_date,
        percent,
    }
}

fn in_period(date: NaiveDate, period: BudgetPeriod, reference: NaiveDate) -> bool {
    match period {
        BudgetPeriod::Monthly => date.year() == reference.year() && date.month() == reference.month(),
        BudgetPeriod::Yearly => date.year() == reference.year(),
    }
}

/// Spending against each budget for the period containing `reference`.
pub fn budget_usage(
    budgets: &[Budget],
    transactions: &[Transaction],
    reference: NaiveDate,
) -> Vec<BudgetUsage> {
    budgets
        .iter()
        .map(|budget| {
            let spent: f64 = transactions
                .iter()
                .filter(|t| t.kind == TransactionType::Expense)
                .filter(|t| t.category.eq_ignore_ascii_case(&budget.category))
                .filter(|t| in_period(t.date, budget.period, reference))
                .map(|t| t.amount)
                .sum();
            BudgetUsage {
                category: budget.category.clone(),
                period: budget.period,
                limit: budget.amount,
                spent,
                remaining: budget.amount - spent,
            }
        })
        .collect()
}

pub fn dashboard_view(
    transactions: &[Transaction],
    budgets: &[Budget],
    savings_goals: &[SavingsGoal],
) -> DashboardView {
    DashboardView {
        totals: totals(transactions),
        cashflow: cashflow_series(transactions),
        recent: recent_transactions(transactions, RECENT_LIMIT).to_vec(),
        budget_count: budgets.len(),
        savings_goal_count: savings_goals.len(),
    }
}
