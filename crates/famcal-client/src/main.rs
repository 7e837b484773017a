//! famcal CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use famcal_core::{EventDraft, EventPatch, TracingConfig, init_tracing_with_layer};
use famcal_service::JournalLayer;

use famcal_client::cli::{CacheAction, Cli, Command, ConfigAction, EventAction};
use famcal_client::commands;
use famcal_client::commands::holidays::HolidayOptions;
use famcal_client::config::ClientConfig;
use famcal_client::error::{ClientError, ClientResult};
use famcal_client::App;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    let config_path = cli.config.clone().unwrap_or_else(ClientConfig::default_path);
    let mut config = if cli.config.is_some() {
        ClientConfig::load_from(&config_path).map_err(ClientError::Config)?
    } else {
        ClientConfig::load().map_err(ClientError::Config)?
    };
    if let Some(country) = cli.country.clone() {
        config.country = country;
    }
    if let Some(store) = cli.store.clone() {
        config.storage.path = Some(store);
    }

    // Configuration commands work without a readable store.
    if let Some(Command::Config { action }) = &cli.command {
        return match action {
            ConfigAction::Dump => commands::config::dump(&config, &config_path),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(&config, &config_path),
        };
    }

    let app = App::open(config)?;
    init_logging(&cli, &app);

    match cli.command {
        None => commands::calendar::show(&app, &Default::default(), cli.json).await,
        Some(Command::Calendar(args)) => commands::calendar::show(&app, &args, cli.json).await,
        Some(Command::Holidays {
            year,
            month,
            sample,
        }) => {
            let options = HolidayOptions {
                year,
                month,
                sample,
                json: cli.json,
            };
            commands::holidays::run(&app, options).await
        }
        Some(Command::Members) => commands::calendar::members(cli.json),
        Some(Command::Event { action }) => match action {
            EventAction::Add {
                title,
                start,
                end,
                description,
                assignees,
                priority,
                created_by,
            } => {
                let draft = EventDraft {
                    description,
                    end,
                    assignees,
                    priority,
                    created_by,
                    ..EventDraft::new(title, start)
                };
                commands::event::add(&app, draft, cli.json)
            }
            EventAction::Update {
                id,
                title,
                start,
                end,
                description,
                assignees,
                unassign_all,
                priority,
            } => {
                let assignees = if unassign_all {
                    Some(Vec::new())
                } else {
                    Some(assignees).filter(|a| !a.is_empty())
                };
                let patch = EventPatch {
                    title,
                    description,
                    start,
                    end,
                    assignees,
                    priority,
                };
                commands::event::update(&app, &id, patch, cli.json)
            }
            EventAction::Delete { id } => commands::event::delete(&app, &id),
        },
        Some(Command::Cache { action }) => match action {
            CacheAction::Keys => commands::cache::keys(&app, cli.json),
            CacheAction::Clear => commands::cache::clear(&app),
        },
        Some(Command::Logs { limit, clear }) => {
            if clear {
                commands::logs::clear(&app)
            } else {
                commands::logs::show(&app, limit, cli.json)
            }
        }
        Some(Command::Config { .. }) => Ok(()),
    }
}

/// Installs the terminal logger and, when enabled, the store-backed journal.
fn init_logging(cli: &Cli, app: &App) {
    let tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::default()
    };

    let journal = app
        .config()
        .logging
        .journal
        .then(|| Box::new(JournalLayer::new(app.journal())) as famcal_core::BoxedLayer);

    if let Err(e) = init_tracing_with_layer(tracing_config, journal) {
        eprintln!("warning: {}", e);
    }
}
