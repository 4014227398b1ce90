//! Loan Tracker CLI
//!
//! Command-line entry point:
//! - Interactive terminal UI (default)
//! - List customers, partners or loans
//! - Add a record
//! - Print dashboard totals
//! - Generate a config file

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use loan_tracker::api::{self, ApiClient, Backend};
use loan_tracker::config::{generate_default_config, Config, LoggingConfig};
use loan_tracker::dashboard::format_money;
use loan_tracker::forms::Form;
use loan_tracker::models::{Customer, EntityKind, Loan, Partner};
use loan_tracker::store::AppStore;
use loan_tracker::{table, tui};

#[derive(Parser)]
#[command(name = "loan-tracker")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Track loan applications, customers and referral partners")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend base URL (overrides config and LOAN_TRACKER_BACKEND_URL)
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive terminal UI
    Ui,

    /// Print one collection as a table
    List {
        /// customers, partners or loans
        entity: EntityKind,
    },

    /// Create a record from key=value fields
    Add {
        /// customer, partner or loan
        entity: EntityKind,
        /// Fields in key=value format, e.g. first_name=Ann
        fields: Vec<String>,
    },

    /// Show funded-loan totals
    Dashboard,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, report) = match &cli.config {
        Some(path) => (Config::load_with_env(path)?, None),
        None => {
            let (config, report) = Config::load_default();
            (config, Some(report))
        }
    };
    if let Some(url) = cli.backend_url {
        config.backend.url = url;
    }

    let command = cli.command.unwrap_or(Commands::Ui);
    init_logging(&config.logging, matches!(command, Commands::Ui))?;
    if let Some(report) = &report {
        report.log();
    }

    let client = ApiClient::new(config.backend.client_config())?;
    tracing::debug!(backend = %client.base_url(), "Loan Tracker v{}", env!("CARGO_PKG_VERSION"));
    let backend: Arc<dyn Backend> = Arc::new(client);
    let store_config = config.ui.store_config();

    match command {
        Commands::Ui => {
            let store = AppStore::start(backend, store_config);
            tui::run(store, Duration::from_millis(config.ui.tick_rate_ms)).await?;
        }

        Commands::List { entity } => {
            let rendered = match entity {
                EntityKind::Customer => table::render_customers(
                    &api::fetch_collection::<Customer>(backend.as_ref(), entity.path()).await?,
                ),
                EntityKind::Partner => table::render_partners(
                    &api::fetch_collection::<Partner>(backend.as_ref(), entity.path()).await?,
                ),
                EntityKind::Loan => table::render_loans(
                    &api::fetch_collection::<Loan>(backend.as_ref(), entity.path()).await?,
                ),
            };
            print!("{}", rendered.to_text());
        }

        Commands::Add { entity, fields } => {
            let mut form = Form::for_kind(entity);
            for field in &fields {
                let Some((key, value)) = field.split_once('=') else {
                    bail!("Expected key=value, got {:?}", field);
                };
                form.set(key.trim(), value)?;
            }

            let store = AppStore::new(backend, store_config);
            let submission = form.submit(|s| s)?;
            let result = store.submit(submission).await;

            if let Some(banner) = store.snapshot().message {
                println!("{}", banner);
            }
            result?;
        }

        Commands::Dashboard => {
            let store = AppStore::new(backend, store_config);
            store.refresh().await?;

            let totals = store.snapshot().totals();
            println!("Funded Loans:  {}", totals.funded_count);
            println!("Funded Volume: {}", format_money(totals.funded_amount));
            println!("Commission:    {}", format_money(totals.commission));
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

/// Set up tracing. The terminal UI only logs when a log file is configured.
fn init_logging(config: &LoggingConfig, ui_mode: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("loan_tracker={}", config.level)));

    let writer = match (&config.file, ui_mode) {
        (Some(path), _) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path))?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        (None, true) => BoxMakeWriter::new(io::sink),
        (None, false) => BoxMakeWriter::new(io::stderr),
    };

    let registry = tracing_subscriber::registry().with(filter);
    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(writer))
            .init();
    }

    Ok(())
}
