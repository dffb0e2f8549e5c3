//! Khata CLI - Expense extraction from Indian transaction emails
//!
//! Usage:
//!   khata check --file email.txt --subject "..."     Pre-filter an email
//!   khata extract --file email.txt --subject "..."   Extract expense JSON
//!   khata models                                     List models, check health
//!   khata summarize --file expenses.json             Batch analytics

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (warn)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Check {
            file,
            subject,
            sender,
            llm,
        } => commands::cmd_check(file.as_deref(), &subject, &sender, llm).await,
        Commands::Extract {
            file,
            subject,
            sender,
            model,
            no_filter,
        } => {
            commands::cmd_extract(
                file.as_deref(),
                &subject,
                &sender,
                model.as_deref(),
                no_filter,
            )
            .await
        }
        Commands::Classify {
            description,
            merchant,
        } => commands::cmd_classify(&description, &merchant),
        Commands::Models => commands::cmd_models().await,
        Commands::Summarize { file } => commands::cmd_summarize(file.as_deref()),
        Commands::Prompts { action } => match action {
            None | Some(PromptsAction::List) => commands::cmd_prompts_list(),
            Some(PromptsAction::Show { prompt_id }) => commands::cmd_prompts_show(&prompt_id),
            Some(PromptsAction::Path) => commands::cmd_prompts_path(),
        },
    }
}
