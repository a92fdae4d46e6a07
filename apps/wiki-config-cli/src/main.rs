use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::info;

use wiki_config::api::rest::mapper;
use wiki_config::{Config, ConfigField, FieldValue, StoreConfig, WikiConfigModule};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Module configuration (YAML)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Settings file to use instead of the configured store
    #[arg(long)]
    store: Option<PathBuf>,

    /// Ignore WIKI_* override variables
    #[arg(long)]
    no_env: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every field with defaults applied
    Show {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
        /// Print sensitive values in clear
        #[arg(long)]
        reveal: bool,
    },
    /// Print one field
    Get { field: ConfigField },
    /// Assign one field and save
    Set { field: ConfigField, value: String },
    /// Exit with status 2 when the wiki must run setup
    Check,
    /// Set Installed = true and save
    CompleteSetup,
    /// Serve the configuration REST API
    Serve,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = ?e, "wiki-config failed");
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(path) = args.store {
        config.store = StoreConfig::File { path };
    }
    if args.no_env {
        config.env_overlay = false;
    }

    let module = Arc::new(WikiConfigModule::init(config).await?);
    let service = module.service();

    match args.command {
        Command::Show { json, reveal } => {
            let loaded = service.snapshot();
            if json {
                let mut response = mapper::configuration_response(&loaded);
                if reveal {
                    for item in &mut response.items {
                        if let Ok(field) = item.name.parse::<ConfigField>() {
                            item.value = mapper::value_to_json(&service.get(field));
                            item.redacted = false;
                        }
                    }
                }
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                for field in ConfigField::ALL {
                    let item = mapper::field_dto(field, &loaded);
                    let value = if reveal {
                        service.get(field).to_string()
                    } else {
                        match item.value {
                            serde_json::Value::String(text) => text,
                            other => other.to_string(),
                        }
                    };
                    let marker = if item.is_default { " (default)" } else { "" };
                    println!("{:<28} {}{}", field.name(), value, marker);
                }
            }
        }
        Command::Get { field } => {
            println!("{}", service.get(field));
        }
        Command::Set { field, value } => {
            let parsed = FieldValue::parse(field.kind(), &value).ok_or_else(|| {
                anyhow::anyhow!("{} expects a {} value, got '{}'", field, field.kind(), value)
            })?;
            let previous = service.set(field, parsed).await?;
            service.save().await?;
            info!(field = %field, "Configuration field saved");
            if !field.is_sensitive() {
                println!("{}: {} -> {}", field, previous, service.get(field));
            }
        }
        Command::Check => {
            let mode = service.startup_mode();
            println!("{}", mode);
            if mode.is_setup() {
                return Ok(ExitCode::from(2));
            }
        }
        Command::CompleteSetup => {
            service.complete_setup().await?;
            println!("{}", service.startup_mode());
        }
        Command::Serve => {
            let cancel = CancellationToken::new();
            let shutdown = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Shutdown requested");
                }
                shutdown.cancel();
            });
            module.serve(cancel).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
