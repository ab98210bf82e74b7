use std::path::PathBuf;

use aideon_contacts::config::{SyncConfig, UpdateMode};
use aideon_contacts::directory::DryRun;
use aideon_contacts::reconcile::ReconcileOptions;
use aideon_contacts::{Result, SyncError, erase, sync};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    init_logging()?;
    let mut config = SyncConfig::load(cli.config.as_deref())?;
    if let Some(token) = cli.token {
        config.token = token;
    }
    if let Some(secret) = cli.client_secret {
        config.client_secret = secret;
    }

    match cli.command.unwrap_or_default() {
        Command::Sync(args) => execute_sync(config, args),
        Command::Erase(args) => execute_erase(config, args),
        Command::ListLocal(args) => {
            let input = args.input.unwrap_or(config.input);
            for line in sync::list_local(&input)? {
                println!("{line}");
            }
            Ok(())
        }
        Command::ListRemote => {
            let mut client = sync::connect(&config)?;
            for line in sync::list_remote(&mut client)? {
                println!("{line}");
            }
            Ok(())
        }
    }
}

fn execute_sync(mut config: SyncConfig, args: SyncArgs) -> Result<()> {
    if let Some(input) = args.input {
        config.input = input;
    }
    if let Some(mode) = args.update_mode {
        config.update_mode = mode.into();
    }
    let options = ReconcileOptions {
        update_mode: config.update_mode,
        ..ReconcileOptions::default()
    };

    println!("start updating contacts ...");
    let client = sync::connect(&config)?;
    if args.dry_run {
        sync::sync_file(&config.input, DryRun::new(client), options)?;
    } else {
        sync::sync_file(&config.input, client, options)?;
    }
    println!("update completed");
    Ok(())
}

fn execute_erase(mut config: SyncConfig, args: EraseArgs) -> Result<()> {
    if !args.yes {
        return Err(SyncError::Config(
            "erase deletes every remote contact; pass --yes to confirm".into(),
        ));
    }
    if let Some(grace) = args.grace_secs {
        config.erase.grace_secs = grace;
    }
    let mut client = sync::connect(&config)?;
    let summary = erase::erase_all(&mut client, &config.erase)?;
    println!("All contacts have been deleted ({} moved).", summary.moved);
    Ok(())
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| SyncError::Logging(error.to_string()))
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "One-way synchronisation of an address book export into a contacts service."
)]
struct Cli {
    /// Configuration file. Defaults to contacts-sync.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Persisted authorization token.
    #[arg(long, global = true)]
    token: Option<PathBuf>,

    /// OAuth client secret used to refresh the token.
    #[arg(long, global = true)]
    client_secret: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Reconcile the address book into the contacts service.
    Sync(SyncArgs),
    /// Delete every remote contact through a temporary group.
    Erase(EraseArgs),
    /// Print the address book rows.
    ListLocal(ListLocalArgs),
    /// Print the remote contacts.
    ListRemote,
}

impl Default for Command {
    fn default() -> Self {
        Command::Sync(SyncArgs::default())
    }
}

#[derive(clap::Args, Default)]
struct SyncArgs {
    /// Address book export (CSV, header row first).
    #[arg(long)]
    input: Option<PathBuf>,

    /// How stale remote contacts are brought up to date.
    #[arg(long, value_enum)]
    update_mode: Option<UpdateModeKind>,

    /// Decide everything but only log the changes.
    #[arg(long)]
    dry_run: bool,
}

#[derive(clap::Args)]
struct EraseArgs {
    /// Confirm the deletion of every remote contact.
    #[arg(long)]
    yes: bool,

    /// Seconds to wait after creating the temporary group.
    #[arg(long)]
    grace_secs: Option<u64>,
}

#[derive(clap::Args)]
struct ListLocalArgs {
    #[arg(long)]
    input: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum UpdateModeKind {
    Replace,
    InPlace,
}

impl From<UpdateModeKind> for UpdateMode {
    fn from(kind: UpdateModeKind) -> Self {
        match kind {
            UpdateModeKind::Replace => UpdateMode::Replace,
            UpdateModeKind::InPlace => UpdateMode::InPlace,
        }
    }
}
