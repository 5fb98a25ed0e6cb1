mod config;
mod db;
mod log;
mod models;
mod operations;
mod store;
mod ui;

use anyhow::{Context, Result, anyhow};
use chrono::{Local, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use config::AppConfig;
use models::transaction::TransactionType;
use operations::add::{TransactionInput, create_transaction};
use operations::aggregate::{by_category, by_month, format_currency, format_date, summary};
use operations::filter::{ListFilter, ListOutcome};
use std::path::PathBuf;
use store::RecordStore;
use ui::app::App;

#[derive(Parser)]
#[command(version, about = "Track income and expenses from the terminal")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding the database and log file
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum TypeArg {
    Income,
    Expense,
}

impl From<TypeArg> for TransactionType {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::Income => TransactionType::Income,
            TypeArg::Expense => TransactionType::Expense,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Record a transaction
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        amount: String,
        #[arg(long = "type", value_enum)]
        transaction_type: TypeArg,
        #[arg(long)]
        category: String,
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete a transaction by id
    Remove { id: String },
    /// Print transactions, newest first
    List {
        #[arg(long = "type", value_enum)]
        transaction_type: Option<TypeArg>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Print totals, the category breakdown and the six month trend
    Summary,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::resolve(cli.data_dir, cli.verbose)?;

    log::init_logging(&config.log_path(), config.verbose)
        .with_context(|| format!("Failed to open log file {}", config.log_path().display()))?;

    let result = run(&config, cli.command);
    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn run(config: &AppConfig, command: Option<Commands>) -> Result<()> {
    let conn = db::connection::establish_connection(&config.database_path())
        .with_context(|| format!("Failed to open database {}", config.database_path().display()))?;
    let mut store = RecordStore::open(conn);
    let today = Local::now().date_naive();

    match command {
        None => {
            let mut app = App::new(store, today);
            ui::terminal::run(&mut app).map_err(|e| anyhow!(e))?;
        }
        Some(Commands::Add {
            name,
            amount,
            transaction_type,
            category,
            date,
        }) => {
            let input = TransactionInput {
                name,
                amount,
                transaction_type: transaction_type.into(),
                category: Some(category),
                date: date.unwrap_or_else(|| today.format("%Y-%m-%d").to_string()),
            };
            let transaction = create_transaction(&input, Utc::now().timestamp_millis())?;
            let id = transaction.id.clone();
            store.add(transaction)?;
            println!("Transaction added: {}", id);
        }
        Some(Commands::Remove { id }) => {
            if store.remove(&id)? {
                println!("Transaction removed.");
            } else {
                println!("No transaction with ID {}.", id);
            }
        }
        Some(Commands::List {
            transaction_type,
            category,
        }) => {
            let filter = ListFilter {
                transaction_type: transaction_type.map(Into::into),
                category,
            };
            match filter.outcome(store.all()) {
                ListOutcome::Rows(rows) => {
                    for tx in rows {
                        let sign = if tx.is_income() { '+' } else { '-' };
                        println!(
                            "{:<13} {:<30} {:<14} {} {:>12}  {}",
                            format_date(tx.date),
                            tx.name,
                            tx.category,
                            sign,
                            format_currency(tx.amount),
                            tx.id
                        );
                    }
                }
                empty => println!("{}", empty.empty_message().unwrap_or_default()),
            }
        }
        Some(Commands::Summary) => {
            let totals = summary(store.all());
            println!("Balance:  {}", format_currency(totals.balance));
            println!("Income:   {}", format_currency(totals.income_total));
            println!("Expenses: {}", format_currency(totals.expense_total));

            println!();
            println!("Spending by category:");
            for group in by_category(store.all()) {
                println!("  {:<15} {:>12}", group.category, format_currency(group.total));
            }

            println!();
            println!("Last six months:");
            for month in by_month(store.all(), today) {
                println!(
                    "  {} {}  income {:>12}  expense {:>12}",
                    month.label,
                    month.year,
                    format_currency(month.income_total),
                    format_currency(month.expense_total)
                );
            }
        }
    }

    Ok(())
}
