use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use regdesk::application::registry::{PaymentRequest, RegistrationService};
use regdesk::config::Config;
use regdesk::domain::coordinator::{Coordinator, Role};
use regdesk::infrastructure::Stores;
use regdesk::interfaces::csv::ledger_writer::LedgerWriter;
use regdesk::interfaces::csv::registration_reader::RegistrationReader;
use regdesk::interfaces::http::{self, AppState};
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON config file
    #[arg(long, env = "REGDESK_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "REGDESK_DB_PATH", global = true)]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the REST API
    Serve {
        /// Address to listen on, e.g. 0.0.0.0:5000
        #[arg(long, env = "REGDESK_BIND")]
        bind: Option<String>,

        /// Token for the default admin when no coordinators are configured
        #[arg(long, env = "REGDESK_ADMIN_TOKEN")]
        admin_token: Option<String>,
    },
    /// Import registrations from CSV, then print the payment ledger
    Import {
        /// Input registrations CSV file
        input: PathBuf,

        /// Coordinator credited with payments found in the file
        #[arg(long, default_value = "import")]
        coordinator: String,
    },
    /// Print the payment ledger as CSV
    Export,
}

fn init_tracing() {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

async fn import(registry: &RegistrationService, input: PathBuf, coordinator: &str) -> Result<()> {
    let desk = Coordinator::new(coordinator, coordinator, Role::Coordinator, String::new());
    let file = File::open(&input).into_diagnostic()?;
    let (mut imported, mut skipped) = (0usize, 0usize);

    for (line, row) in RegistrationReader::new(file).rows().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!(row = line + 1, error = %e, "Skipping unreadable registration");
                skipped += 1;
                continue;
            }
        };

        let registration = match registry.register(row.signup()).await {
            Ok(registration) => registration,
            Err(e) => {
                warn!(user_id = %row.user_id, error = %e, "Skipping rejected registration");
                skipped += 1;
                continue;
            }
        };
        imported += 1;

        if let Some((amount, method)) = row.collected() {
            let request = PaymentRequest {
                amount,
                method,
                notes: Some(format!("Imported from {}", input.display())),
                transaction_id: None,
            };
            if let Err(e) = registry
                .process_payment(registration.register_id.as_str(), &desk, request)
                .await
            {
                warn!(register_id = %registration.register_id, error = %e, "Payment not recorded");
            }
        }
    }

    info!(imported, skipped, "Import finished");
    Ok(())
}

async fn export(registry: &RegistrationService) -> Result<()> {
    let registrations = registry.all().await.into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = LedgerWriter::new(stdout.lock());
    writer.write_ledger(registrations).into_diagnostic()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).into_diagnostic()?;
    let db_path = cli.db_path.or_else(|| config.db_path.clone());
    let stores = Stores::open(db_path.as_deref()).into_diagnostic()?;

    match cli.command {
        Command::Serve { bind, admin_token } => {
            config
                .seed_coordinators(&stores.coordinators, admin_token)
                .await
                .into_diagnostic()?;
            let state = AppState::new(stores, config.fees.clone());
            let router = http::router(state, &config.cors_origins).into_diagnostic()?;
            let bind = bind.unwrap_or(config.bind);
            http::serve(router, &bind).await.into_diagnostic()?;
        }
        Command::Import { input, coordinator } => {
            let registry = RegistrationService::new(stores.registrations, config.fees);
            import(&registry, input, &coordinator).await?;
            export(&registry).await?;
        }
        Command::Export => {
            let registry = RegistrationService::new(stores.registrations, config.fees);
            export(&registry).await?;
        }
    }

    Ok(())
}
