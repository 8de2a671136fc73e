//! servtrack CLI - start and stop service time tracking from the terminal
//!
//! Talks to the servtrack API; client details come from the user directory
//! when one is configured.

mod cli;
mod commands;
mod error;

#[cfg(test)]
mod tests;

use std::io::{self, Write};

use chrono::Utc;
use clap::Parser;
use servtrack_core::view::HttpClientLookup;
use servtrack_core::{HttpTimeTrackingService, TimeTrackingContext};

use crate::cli::{Cli, Commands};
use crate::commands::common::location;
use crate::commands::list::{run_list, ListFilter};
use crate::commands::note::run_note;
use crate::commands::show::run_show;
use crate::commands::start::{run_start, StartArgs};
use crate::commands::stop::run_stop;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        for detail in error.details() {
            eprintln!("  - {detail}");
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(
            "servtrack=info"
                .parse()
                .map_err(|error| CliError::Config(format!("{error}")))?,
        )
        .add_directive(
            "servtrack_core=warn"
                .parse()
                .map_err(|error| CliError::Config(format!("{error}")))?,
        );
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let context = TimeTrackingContext::new(HttpTimeTrackingService::new(&cli.api_url)?);
    let lookup = cli
        .users_url
        .as_deref()
        .map(HttpClientLookup::new)
        .transpose()?;

    let mut stdout = io::stdout().lock();
    match cli.command {
        Commands::List {
            client,
            employee,
            active,
            json,
        } => {
            let filter = ListFilter::from_args(client, employee);
            run_list(&context, &filter, active, json, &mut stdout).await?;
        }
        Commands::Start {
            employee,
            client,
            lat,
            long,
            notes,
        } => {
            let args = StartArgs {
                employee_id: employee,
                client_id: client,
                location: location(lat, long),
                notes,
            };
            run_start(&context, args, &mut stdout).await?;
        }
        Commands::Show { id, json } => {
            run_show(context, lookup, &id, json, &mut stdout).await?;
        }
        Commands::Stop { id, lat, long } => {
            run_stop(
                &context,
                lookup,
                &id,
                location(lat, long),
                Utc::now(),
                &mut stdout,
            )
            .await?;
        }
        Commands::Note { id, text } => run_note(&context, &id, &text, &mut stdout).await?,
    }
    stdout.flush()?;

    Ok(())
}
