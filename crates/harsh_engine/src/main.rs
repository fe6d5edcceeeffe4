use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use harsh_engine::cli::Cli;
use harsh_engine::{commands, Config};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Values from `.env` never override variables already set
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr so command output stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "harsh_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::from_env();
    if let Some(database) = cli.database {
        config.database = database;
    }
    config.enable_foreign_keys |= cli.foreign_keys;

    tracing::debug!(?config, "configuration loaded");

    let outcome = commands::run(cli.command, &config, cli.format).await?;
    println!("{}", outcome.output);

    Ok(if outcome.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
