use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use std::io;
use std::path::PathBuf;
use storefront::application::ledger::Ledger;
use storefront::application::session::SessionController;
use storefront::domain::ports::{PaymentStoreBox, UserStoreBox};
use storefront::domain::user::Username;
use storefront::infrastructure::in_memory::{InMemoryPaymentStore, InMemoryUserStore};
use storefront::infrastructure::sqlite::SqliteStore;
use storefront::interfaces::export::{ExportFormat, PaymentWriter};
use storefront::interfaces::shell::Shell;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the SQLite database
    #[arg(long, env = "STOREFRONT_DB", default_value = "store.db")]
    db_path: PathBuf,

    /// Keep everything in memory; nothing is written to disk
    #[arg(long)]
    in_memory: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive signup/login/pay loop (default)
    Shell,
    /// Print a user's payment history
    History {
        username: String,

        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
    },
}

fn open_stores(cli: &Cli) -> Result<(UserStoreBox, PaymentStoreBox)> {
    if cli.in_memory {
        tracing::info!("using in-memory storage");
        return Ok((
            Box::new(InMemoryUserStore::new()),
            Box::new(InMemoryPaymentStore::new()),
        ));
    }
    let store = SqliteStore::open(&cli.db_path).into_diagnostic()?;
    Ok((Box::new(store.clone()), Box::new(store)))
}

/// Storage for `history`, which only reads.
///
/// A missing database means nobody has paid yet, so nothing is created.
fn open_history_store(cli: &Cli) -> Result<PaymentStoreBox> {
    if cli.in_memory {
        return Ok(Box::new(InMemoryPaymentStore::new()));
    }
    if !cli.db_path.exists() {
        tracing::warn!(path = %cli.db_path.display(), "no database; history is empty");
        return Ok(Box::new(InMemoryPaymentStore::new()));
    }
    let store = SqliteStore::open_read_only(&cli.db_path).into_diagnostic()?;
    Ok(Box::new(store))
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("storefront=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command.as_ref().unwrap_or(&Command::Shell) {
        Command::Shell => {
            let (users, payments) = open_stores(&cli)?;
            let controller = SessionController::with_stores(users, payments);
            let stdin = io::stdin();
            let stdout = io::stdout();
            let mut shell = Shell::new(controller, stdin.lock(), stdout.lock());
            shell.run().await.into_diagnostic()?;
        }
        Command::History { username, format } => {
            let username = Username::new(username).into_diagnostic()?;
            let history = Ledger::new(open_history_store(&cli)?)
                .history(&username)
                .await
                .into_diagnostic()?;
            let stdout = io::stdout();
            PaymentWriter::new(stdout.lock())
                .write(*format, &history)
                .into_diagnostic()?;
        }
    }

    Ok(())
}
