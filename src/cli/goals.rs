use super::ui;
use crate::core::analytics::{self, GoalProgress};
use crate::core::model::NewSavingsGoal;
use crate::state::FinanceStore;
use anyhow::{Result, anyhow};
use comfy_table::Cell;

fn progress_table(goals: &[GoalProgress], currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Goal"),
        ui::header_cell("Saved"),
        ui::header_cell("Target"),
        ui::header_cell("Progress"),
        ui::header_cell("Target Date"),
    ]);
    for goal in goals {
        table.add_row(vec![
            Cell::new(&goal.name),
            ui::number_cell(ui::format_money(goal.current_amount, currency)),
            ui::number_cell(ui::format_money(goal.target_amount, currency)),
            ui::percent_cell(goal.percent),
            Cell::new(goal.target_date.format("%d.%m.%Y")),
        ]);
    }
    table.to_string()
}

pub async fn run(store: &FinanceStore, owner: &str, currency: &str) {
    let pb = ui::new_spinner("Loading savings goals...");
    store.fetch_savings_goals(owner).await;
    pb.finish_and_clear();

    let state = store.snapshot().await;
    println!("{}\n", ui::style_text("Savings Goals", ui::StyleType::Title));
    if state.savings_goals.is_empty() {
        println!("{}", ui::style_text("No savings goals defined", ui::StyleType::Subtle));
    } else {
        let progress: Vec<_> = state
            .savings_goals
            .iter()
            .map(analytics::goal_progress)
            .collect();
        println!("{}", progress_table(&progress, currency));
    }

    if let Some(error) = &state.error {
        println!(
            "\n{}",
            ui::style_text(&format!("Last error: {error}"), ui::StyleType::Error)
        );
    }
}

pub async fn add(
    store: &FinanceStore,
    owner: &str,
    draft: NewSavingsGoal,
    currency: &str,
) -> Result<()> {
    store.clear_error().await;
    if !store.add_savings_goal(owner, draft).await {
        let message = store.error().await.unwrap_or_default();
        return Err(anyhow!("Failed to add savings goal: {message}"));
    }
    println!("{}\n", ui::style_text("Savings goal saved", ui::StyleType::TotalValue));
    run(store, owner, currency).await;
    Ok(())
}
