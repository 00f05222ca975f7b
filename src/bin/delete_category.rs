//! Delete a category and its sub-categories from the command line.

use std::{
    process::ExitCode,
    sync::{Arc, Mutex},
};

use clap::Parser;
use rusqlite::Connection;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use bookkeeper_rs::{
    BroadcastEventBus, CategoryId, CompanyId, DeleteCategory, DeletionReport, SQLiteCategoryStore,
    SQLiteSettings, Translations, WarningSummary, initialize_db,
};

/// Delete a category of a company, together with every sub-category that
/// nothing else depends on.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The company that owns the category.
    #[arg(long)]
    company: CompanyId,

    /// The category to delete.
    #[arg(long)]
    category: CategoryId,

    /// Print the outcome as JSON instead of text.
    #[arg(long)]
    json: bool,
}

/// The outcome of a deletion as printed with `--json`.
#[derive(Debug, Serialize)]
struct Summary {
    deleted: Vec<CategoryId>,
    warnings: Vec<WarningSummary>,
    error: Option<String>,
}

impl From<&DeletionReport> for Summary {
    fn from(report: &DeletionReport) -> Self {
        Self {
            deleted: report.deleted.iter().map(|category| category.id).collect(),
            warnings: report.warnings.iter().map(WarningSummary::from).collect(),
            error: report.outcome.as_ref().err().map(|error| error.to_string()),
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let connection = match Connection::open(&args.db_path) {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not open database {}: {error}", args.db_path);
            return ExitCode::FAILURE;
        }
    };

    if let Err(error) = initialize_db(&connection) {
        tracing::error!("could not initialize database: {error}");
        return ExitCode::FAILURE;
    }

    let connection = Arc::new(Mutex::new(connection));
    let workflow = DeleteCategory::new(
        SQLiteCategoryStore::new(connection.clone()),
        SQLiteSettings::new(connection),
        BroadcastEventBus::new(),
        Translations::english(),
    );

    let report = workflow.delete(args.company, args.category);
    let summary = Summary::from(&report);

    if args.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(error) => {
                tracing::error!("could not serialize the report: {error}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("Deleted {} categories.", summary.deleted.len());

        for warning in &summary.warnings {
            println!("Kept category {}: {}", warning.category_id, warning.message);
        }

        if let Some(error) = &summary.error {
            println!("Could not delete category {}: {error}", args.category);
        }
    }

    if summary.error.is_some() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
