use super::ui;
use crate::core::analytics::{self, CashflowPoint, DashboardView};
use crate::core::model::Transaction;
use crate::state::FinanceStore;
use comfy_table::Cell;

const BAR_WIDTH: usize = 20;

fn summary_table(view: &DashboardView, currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Balance"),
        ui::header_cell("Income"),
        ui::header_cell("Expenses"),
        ui::header_cell("Active Budgets"),
        ui::header_cell("Savings Goals"),
    ]);
    table.add_row(vec![
        ui::amount_cell(view.totals.balance, currency),
        ui::number_cell(ui::format_money(view.totals.income, currency)),
        ui::number_cell(ui::format_money(view.totals.expenses, currency)),
        ui::number_cell(view.budget_count.to_string()),
        ui::number_cell(view.savings_goal_count.to_string()),
    ]);
    table.to_string()
}

fn cashflow_table(points: &[CashflowPoint], currency: &str) -> String {
    let max = points
        .iter()
        .map(|p| p.amount.abs())
        .filter(|a| a.is_finite())
        .fold(0.0, f64::max);

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Amount"),
        ui::header_cell(""),
    ]);
    for point in points {
        table.add_row(vec![
            Cell::new(&point.label),
            ui::amount_cell(point.amount, currency),
            Cell::new(ui::cashflow_bar(point.amount, max, BAR_WIDTH)),
        ]);
    }
    table.to_string()
}

/// Table of transactions with the full date and signed amount.
pub fn transactions_table(transactions: &[Transaction], currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Description"),
        ui::header_cell("Category"),
        ui::header_cell("Amount"),
    ]);
    for t in transactions {
        table.add_row(vec![
            Cell::new(t.date.format("%d.%m.%Y")),
            Cell::new(&t.description),
            Cell::new(&t.category),
            ui::amount_cell(t.signed_amount(), currency),
        ]);
    }
    table.to_string()
}

pub fn render(view: &DashboardView, currency: &str) -> String {
    let mut output = format!(
        "{}\n\n",
        ui::style_text("Finance Dashboard", ui::StyleType::Title)
    );
    output.push_str(&summary_table(view, currency));

    output.push_str(&format!(
        "\n\n{}\n",
        ui::style_text("Cashflow", ui::StyleType::TotalLabel)
    ));
    if view.cashflow.is_empty() {
        output.push_str(&ui::style_text("No transactions yet", ui::StyleType::Subtle));
    } else {
        output.push_str(&cashflow_table(&view.cashflow, currency));
    }

    output.push_str(&format!(
        "\n\n{}\n",
        ui::style_text("Recent Transactions", ui::StyleType::TotalLabel)
    ));
    if view.recent.is_empty() {
        output.push_str(&ui::style_text("No transactions yet", ui::StyleType::Subtle));
    } else {
        output.push_str(&transactions_table(&view.recent, currency));
    }
    output
}

/// Prints the dashboard for the store's current state.
pub async fn show(store: &FinanceStore, currency: &str) {
    let state = store.snapshot().await;
    let view = analytics::dashboard_view(&state.transactions, &state.budgets, &state.savings_goals);
    println!("{}", render(&view, currency));

    if let Some(error) = &state.error {
        println!(
            "\n{}",
            ui::style_text(&format!("Last error: {error}"), ui::StyleType::Error)
        );
    }
}

pub async fn run(store: &FinanceStore, owner: &str, currency: &str) {
    let pb = ui::new_spinner("Loading finances...");
    store.refresh_all(owner).await;
    pb.finish_and_clear();

    show(store, currency).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::sample;

    #[test]
    fn test_render_sample_dashboard() {
        console::set_colors_enabled(false);
        let view = analytics::dashboard_view(
            &sample::transactions("1"),
            &sample::budgets("1"),
            &sample::savings_goals("1"),
        );

        let output = render(&view, "€");
        assert!(output.contains("Finance Dashboard"));
        assert!(output.contains("+2400.00 €"));
        assert!(output.contains("600.00 €"));
        assert!(output.contains("01.02.24"));
        assert!(output.contains("-500.00 €"));
        assert!(output.contains("03.02.2024"));
        assert!(output.contains("Weekly groceries"));
    }

    #[test]
    fn test_render_empty_dashboard() {
        console::set_colors_enabled(false);
        let view = analytics::dashboard_view(&[], &[], &[]);
        let output = render(&view, "€");
        assert!(output.contains("+0.00 €"));
        assert!(output.contains("No transactions yet"));
    }
}
