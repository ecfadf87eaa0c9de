//! Northwind CLI - order totals, policy inspection and seeding.
//!
//! # Usage
//!
//! ```bash
//! # Subtotal and total of a stored order
//! nw-cli order totals 10248
//!
//! # Totals for an unsaved row (consults the database only if it has an id)
//! nw-cli order preview --json '{"order": {"id": 10248}, "freight": "12.50"}'
//!
//! # Can role 2 delete a row whose title is "Owner"?
//! nw-cli policy check --action deletable --role 2 --title Owner
//!
//! # Role x action matrix
//! nw-cli policy table
//!
//! # Field flags for the order edit form
//! nw-cli grid view --table order --mode edit
//!
//! # Seed the database (or only check the file with --dry-run)
//! nw-cli seed data/northwind.yaml
//! ```
//!
//! # Commands
//!
//! - `order` - Derived order totals
//! - `policy` - Role/action policy inspection
//! - `grid` - Grid view configuration
//! - `seed` - Seed the database from YAML

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use northwind_admin::AppError;
use northwind_core::{GridAction, OrderId};

mod commands;

#[derive(Parser)]
#[command(name = "nw-cli")]
#[command(author, version, about = "Northwind Admin CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute derived order values
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Inspect the role/action policy
    Policy {
        #[command(subcommand)]
        action: PolicyAction,
    },
    /// Inspect grid view configuration
    Grid {
        #[command(subcommand)]
        action: GridCommand,
    },
    /// Seed the database from a YAML file
    Seed {
        /// Path to the seed file
        file: PathBuf,

        /// Validate the file and log order totals without writing
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// Subtotal and total of a stored order
    Totals {
        /// Order ID
        id: OrderId,
    },
    /// Totals for a partial row given as JSON
    Preview {
        /// Row such as `{"id": 1}`, `{"order": {"id": 1}}` or `{"freight": "5.00"}`
        #[arg(long)]
        json: String,
    },
}

#[derive(Subcommand)]
enum PolicyAction {
    /// Check whether a role may perform an action
    Check {
        /// Grid action (`create`, `details`, `editable`, `deletable`)
        #[arg(short, long)]
        action: GridAction,

        /// Role ID
        #[arg(short, long)]
        role: u8,

        /// Title of the row the action applies to
        #[arg(short, long)]
        title: Option<String>,
    },
    /// Log the role x action matrix
    Table,
}

#[derive(Subcommand)]
enum GridCommand {
    /// Log readable and writable fields of a view
    View {
        /// Table name (e.g. `order`, `order_detail`)
        #[arg(short, long)]
        table: String,

        /// Grid mode (`list`, `details`, `create`, `edit`)
        #[arg(short, long)]
        mode: String,
    },
}

#[tokio::main]
async fn main() {
    // Load .env before reading logging configuration
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        if e.is_client_error() {
            tracing::warn!("Command rejected: {e}");
        } else {
            tracing::error!("Command failed: {e}");
        }
        std::process::exit(exit_code(&e));
    }
}

/// 2 for errors the caller can fix by changing its input, 1 otherwise.
const fn exit_code(err: &AppError) -> i32 {
    if err.is_client_error() { 2 } else { 1 }
}

fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "northwind_admin=info,northwind_cli=info".into());

    let json = northwind_admin::config::log_json_from_env();
    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Commands::Order { action } => match action {
            OrderAction::Totals { id } => commands::order::totals(id).await?,
            OrderAction::Preview { json } => commands::order::preview(&json).await?,
        },
        Commands::Policy { action } => match action {
            PolicyAction::Check {
                action,
                role,
                title,
            } => commands::policy::check(action, role, title.as_deref())?,
            PolicyAction::Table => commands::policy::table()?,
        },
        Commands::Grid { action } => match action {
            GridCommand::View { table, mode } => commands::grid::view(&table, &mode)?,
        },
        Commands::Seed { file, dry_run } => commands::seed::run(&file, dry_run).await?,
    }
    Ok(())
}
