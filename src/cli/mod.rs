pub mod budgets;
pub mod dashboard;
pub mod goals;
pub mod setup;
pub mod transaction;
pub mod ui;
