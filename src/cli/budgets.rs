use super::ui;
use crate::core::analytics::{self, BudgetUsage};
use crate::core::model::NewBudget;
use crate::state::FinanceStore;
use anyhow::{Result, anyhow};
use chrono::Utc;
use comfy_table::Cell;

fn usage_table(usage: &[BudgetUsage], currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Category"),
        ui::header_cell("Period"),
        ui::header_cell("Budget"),
        ui::header_cell("Spent"),
        ui::header_cell("Remaining"),
    ]);
    for u in usage {
        table.add_row(vec![
            Cell::new(&u.category),
            Cell::new(u.period),
            ui::number_cell(ui::format_money(u.limit, currency)),
            ui::number_cell(ui::format_money(u.spent, currency)),
            ui::amount_cell(u.remaining, currency),
        ]);
    }
    table.to_string()
}

pub async fn run(store: &FinanceStore, owner: &str, currency: &str) {
    let pb = ui::new_spinner("Loading budgets...");
    futures::join!(store.fetch_budgets(owner), store.fetch_transactions(owner));
    pb.finish_and_clear();

    let state = store.snapshot().await;
    println!("{}\n", ui::style_text("Budgets", ui::StyleType::Title));
    if state.budgets.is_empty() {
        println!("{}", ui::style_text("No budgets defined", ui::StyleType::Subtle));
    } else {
        let usage = analytics::budget_usage(
            &state.budgets,
            &state.transactions,
            Utc::now().date_naive(),
        );
        println!("{}", usage_table(&usage, currency));
    }

    if let Some(error) = &state.error {
        println!(
            "\n{}",
            ui::style_text(&format!("Last error: {error}"), ui::StyleType::Error)
        );
    }
}

pub async fn add(store: &FinanceStore, owner: &str, draft: NewBudget, currency: &str) -> Result<()> {
    store.clear_error().await;
    if !store.add_budget(owner, draft).await {
        let message = store.error().await.unwrap_or_default();
        return Err(anyhow!("Failed to add budget: {message}"));
    }
    println!("{}\n", ui::style_text("Budget saved", ui::StyleType::TotalValue));
    run(store, owner, currency).await;
    Ok(())
}
