use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use fintrack::cli::transaction::TransactionForm;
use fintrack::core::log::init_logging;
use fintrack::core::{BudgetPeriod, Category, NewBudget, NewSavingsGoal, TransactionType};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display balance, cashflow and recent transactions
    Dashboard,
    /// Record an income or expense transaction
    Add {
        /// Amount, always positive
        #[arg(short, long)]
        amount: String,
        /// income or expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: TransactionType,
        /// One of Salary, Freelance, Investments, Rent, Utilities, Groceries,
        /// Transportation, Entertainment, Healthcare, Other
        #[arg(long, default_value = "Salary")]
        category: Category,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Date as YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// List budgets and their spending
    Budgets {
        #[command(subcommand)]
        action: Option<BudgetAction>,
    },
    /// List savings goals and their progress
    Goals {
        #[command(subcommand)]
        action: Option<GoalAction>,
    },
}

#[derive(Subcommand)]
enum BudgetAction {
    /// Define a spending cap for a category
    Add {
        #[arg(long)]
        category: String,
        #[arg(short, long)]
        amount: f64,
        /// monthly or yearly
        #[arg(short, long, default_value = "monthly")]
        period: BudgetPeriod,
    },
}

#[derive(Subcommand)]
enum GoalAction {
    /// Define an amount to save by a date
    Add {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        target: f64,
        #[arg(long, default_value_t = 0.0)]
        current: f64,
        /// Date as YYYY-MM-DD
        #[arg(long)]
        target_date: NaiveDate,
    },
}

impl From<Commands> for fintrack::AppCommand {
    fn from(cmd: Commands) -> fintrack::AppCommand {
        match cmd {
            Commands::Dashboard => fintrack::AppCommand::Dashboard,
            Commands::Add {
                amount,
                kind,
                category,
                description,
                date,
            } => {
                let defaults = TransactionForm::default();
                fintrack::AppCommand::AddTransaction(TransactionForm {
                    amount,
                    kind,
                    category,
                    description,
                    date: date.unwrap_or(defaults.date),
                })
            }
            Commands::Budgets { action: None } => fintrack::AppCommand::Budgets,
            Commands::Budgets {
                action:
                    Some(BudgetAction::Add {
                        category,
                        amount,
                        period,
                    }),
            } => fintrack::AppCommand::AddBudget(NewBudget {
                category,
                amount,
                period,
            }),
            Commands::Goals { action: None } => fintrack::AppCommand::Goals,
            Commands::Goals {
                action:
                    Some(GoalAction::Add {
                        name,
                        target,
                        current,
                        target_date,
                    }),
            } => fintrack::AppCommand::AddSavingsGoal(NewSavingsGoal {
                name,
                target_amount: target,
                current_amount: current,
                target_date,
            }),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fintrack::setup(),
        Some(cmd) => fintrack::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            fintrack::run_command(fintrack::AppCommand::Dashboard, cli.config_path.as_deref())
                .await
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
