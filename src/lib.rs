pub mod cli;
pub mod core;
pub mod providers;
pub mod state;
pub mod store;

use crate::cli::transaction::TransactionForm;
use crate::core::config::AppConfig;
use crate::core::{NewBudget, NewSavingsGoal};
use crate::state::FinanceStore;
use anyhow::Result;
use tracing::{debug, info};

pub use crate::cli::setup::setup;

pub enum AppCommand {
    Dashboard,
    AddTransaction(TransactionForm),
    Budgets,
    AddBudget(NewBudget),
    Goals,
    AddSavingsGoal(NewSavingsGoal),
}

/// Loads the configuration and applies overrides from `env`.
pub fn load_config(
    config_path: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    Ok(config.with_env_overrides(env))
}

/// Runs a command with overrides read from the process environment.
pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    run_command_with_env(command, config_path, |key| std::env::var(key).ok()).await
}

pub async fn run_command_with_env(
    command: AppCommand,
    config_path: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    info!("Finance tracker starting...");

    let config = load_config(config_path, env)?;
    debug!(
        user_id = %config.user_id,
        remote = config.remote_endpoint().is_some(),
        "Loaded config"
    );

    let storage = store::open_storage(&config)?;
    let store = FinanceStore::new(storage);
    let owner = config.user_id.as_str();
    let currency = config.currency.as_str();

    match command {
        AppCommand::Dashboard => {
            cli::dashboard::run(&store, owner, currency).await;
            Ok(())
        }
        AppCommand::AddTransaction(form) => {
            cli::transaction::run(&store, form, owner, currency).await
        }
        AppCommand::Budgets => {
            cli::budgets::run(&store, owner, currency).await;
            Ok(())
        }
        AppCommand::AddBudget(draft) => cli::budgets::add(&store, owner, draft, currency).await,
        AppCommand::Goals => {
            cli::goals::run(&store, owner, currency).await;
            Ok(())
        }
        AppCommand::AddSavingsGoal(draft) => {
            cli::goals::add(&store, owner, draft, currency).await
        }
    }
}
