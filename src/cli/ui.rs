use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    TotalValue,
    Negative,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
        StyleType::Negative => style(text).red().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Formats an amount with two decimals followed by the currency label.
pub fn format_money(value: f64, currency: &str) -> String {
    format!("{value:.2} {currency}")
}

/// Formats a signed amount with an explicit leading sign.
pub fn format_signed_money(value: f64, currency: &str) -> String {
    let sign = if value < 0.0 { '-' } else { '+' };
    format!("{sign}{:.2} {currency}", value.abs())
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Right-aligned plain cell.
pub fn number_cell(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// Creates a cell for a signed amount, green for money in and red for money out.
pub fn amount_cell(value: f64, currency: &str) -> Cell {
    let color = if value < 0.0 { Color::Red } else { Color::Green };
    Cell::new(format_signed_money(value, currency))
        .fg(color)
        .set_alignment(CellAlignment::Right)
}

/// Formats an `Option<f64>` percentage. `None` is displayed as "N/A".
pub fn percent_cell(value: Option<f64>) -> Cell {
    value.map_or(
        Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        |v| {
            let color = if v >= 100.0 { Color::Green } else { Color::Reset };
            Cell::new(format!("{v:.1}%"))
                .fg(color)
                .set_alignment(CellAlignment::Right)
        },
    )
}

/// Horizontal bar proportional to `value / max`, drawn left of a zero axis
/// for negative values and right of it for positive ones.
pub fn cashflow_bar(value: f64, max: f64, width: usize) -> String {
    let len = if max > 0.0 && value.is_finite() {
        ((value.abs() / max) * width as f64).round() as usize
    } else {
        0
    }
    .min(width);
    let pad = " ".repeat(width - len);
    let bar = "█".repeat(len);
    if value < 0.0 {
        format!("{}{}│{}", pad, style(bar).red(), " ".repeat(width))
    } else {
        format!("{}│{}{}", " ".repeat(width), style(bar).green(), pad)
    }
}

/// Creates a spinner shown while data is loading.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("\n{}", "─".repeat(term_width));
}
