//! Binary entry point for the `tunroute` CLI.

use std::error::Error as _;
use std::io::{self, Write};
use std::process;

use clap::Parser;
use thiserror::Error;

use tunroute::{
    ApplyOutcome, ClientError, CloudflareClient, CloudflareConfig, ConfigError, Converger,
    ImportError, ImportId, ReadOutcome, ReconcileError, Resource, StateFile, StateRecord,
    StateStore, StateStoreError, TunnelRouteReconciler, fields, logging,
};

mod cli;

use cli::{ApplyCommand, Cli, ImportCommand, StateArgs};

type RouteConverger = Converger<TunnelRouteReconciler<CloudflareClient>>;

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("client error: {0}")]
    Client(#[from] ClientError),
    #[error("state error: {0}")]
    State(#[from] StateStoreError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Reconcile(#[from] ReconcileError<ClientError>),
    #[error(
        "cannot change {field} of tunnel route {id}: destroy it first or use another state file"
    )]
    KeyChange { field: &'static str, id: String },
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

#[tokio::main]
async fn main() {
    logging::init();
    let cli = Cli::parse();
    let exit_code = match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

async fn dispatch(cli: Cli) -> Result<(), CliError> {
    match cli {
        Cli::Apply(command) => apply(command).await,
        Cli::Refresh(args) => refresh(&args).await,
        Cli::Destroy(args) => destroy(&args).await,
        Cli::Import(command) => import(command).await,
    }
}

fn connect() -> Result<(CloudflareConfig, RouteConverger), CliError> {
    let config = CloudflareConfig::load_without_cli_args()?;
    let client = CloudflareClient::new(&config)?;
    Ok((config, Converger::new(TunnelRouteReconciler::new(client))))
}

async fn apply(command: ApplyCommand) -> Result<(), CliError> {
    let store = StateFile::new(command.state.state.as_str());
    let mut record = store.load()?;
    check_key_overrides(&record, &command)?;
    apply_overrides(&mut record, &command);

    let (config, converger) = connect()?;
    fill_account(&mut record, &config);
    let outcome = converger.apply(&mut record).await?;
    store.save(&record)?;

    let message = describe_apply(&outcome, record.id());
    writeln!(io::stdout(), "{message}")?;
    Ok(())
}

async fn refresh(args: &StateArgs) -> Result<(), CliError> {
    let store = StateFile::new(args.state.as_str());
    let mut record = store.load()?;
    let (config, converger) = connect()?;
    fill_account(&mut record, &config);

    let outcome = converger.refresh(&mut record).await?;
    store.save(&record)?;

    let message = match outcome {
        ReadOutcome::Found => format!("tunnel route {} is present", record.id()),
        ReadOutcome::NotFound => String::from("tunnel route no longer exists; identifier cleared"),
    };
    writeln!(io::stdout(), "{message}")?;
    Ok(())
}

async fn destroy(args: &StateArgs) -> Result<(), CliError> {
    let store = StateFile::new(args.state.as_str());
    let mut record = store.load()?;
    let (config, converger) = connect()?;
    fill_account(&mut record, &config);

    let id = record.id().to_owned();
    let deleted = converger.destroy(&mut record).await?;
    store.save(&record)?;

    let message = if deleted {
        format!("destroyed tunnel route {id}")
    } else {
        String::from("no tunnel route recorded; nothing to destroy")
    };
    writeln!(io::stdout(), "{message}")?;
    Ok(())
}

async fn import(command: ImportCommand) -> Result<(), CliError> {
    ImportId::parse(&command.id)?;
    let store = StateFile::new(command.state.state.as_str());
    let (_, converger) = connect()?;

    let record = converger.resource().import(&command.id).await?;
    let path = store.save(&record)?;

    writeln!(
        io::stdout(),
        "imported tunnel route {} into {path}",
        record.id()
    )?;
    Ok(())
}

/// Rejects flags that would move a recorded route to another account,
/// network or virtual network.
fn check_key_overrides(record: &StateRecord, command: &ApplyCommand) -> Result<(), CliError> {
    if !record.has_id() {
        return Ok(());
    }
    let keys = [
        (fields::ACCOUNT_ID, &command.account_id),
        (fields::NETWORK, &command.network),
        (fields::VIRTUAL_NETWORK_ID, &command.virtual_network_id),
    ];
    for (field, value) in keys {
        if let Some(requested) = value
            && requested.trim() != record.get_str(field)
        {
            return Err(CliError::KeyChange {
                field,
                id: record.id().to_owned(),
            });
        }
    }
    Ok(())
}

fn apply_overrides(record: &mut StateRecord, command: &ApplyCommand) {
    let overrides = [
        (fields::ACCOUNT_ID, &command.account_id),
        (fields::TUNNEL_ID, &command.tunnel_id),
        (fields::NETWORK, &command.network),
        (fields::VIRTUAL_NETWORK_ID, &command.virtual_network_id),
        (fields::COMMENT, &command.comment),
    ];
    for (field, value) in overrides {
        if let Some(value_str) = value {
            record.set_str(field, value_str.trim());
        }
    }
}

fn fill_account(record: &mut StateRecord, config: &CloudflareConfig) {
    if !record.get_str(fields::ACCOUNT_ID).is_empty() {
        return;
    }
    if let Some(account_id) = config.default_account_id() {
        record.set_str(fields::ACCOUNT_ID, account_id);
    }
}

fn describe_apply(outcome: &ApplyOutcome, id: &str) -> String {
    match outcome {
        ApplyOutcome::Created => format!("created tunnel route {id}"),
        ApplyOutcome::Updated { changed } => {
            format!("updated tunnel route {id} ({})", changed.join(", "))
        }
        ApplyOutcome::Unchanged => format!("tunnel route {id} is up to date"),
    }
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

/// Writes the error followed by any causes its message does not already
/// include.
fn write_error(mut target: impl Write, err: &CliError) {
    let mut message = err.to_string();
    let mut cause = err.source();
    while let Some(source) = cause {
        let text = source.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        cause = source.source();
    }
    writeln!(target, "{message}").ok();
}
