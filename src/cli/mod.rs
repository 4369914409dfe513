//! Command-line interface definitions for the `tunroute` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::{Args, Parser};

/// State file used when `--state` is not given.
pub(crate) const DEFAULT_STATE_PATH: &str = "tunroute.state.json";

/// Top-level CLI for the `tunroute` binary.
#[derive(Debug, Parser)]
#[command(
    name = "tunroute",
    about = "Reconcile Cloudflare tunnel routes against a local state file",
    arg_required_else_help = true
)]
pub(crate) enum Cli {
    /// Create or update the route described by the state file.
    #[command(name = "apply", about = "Create or update the route described by the state file")]
    Apply(ApplyCommand),
    /// Read the remote route back into the state file.
    #[command(name = "refresh", about = "Read the remote route back into the state file")]
    Refresh(StateArgs),
    /// Delete the route and clear its identifier.
    #[command(name = "destroy", about = "Delete the route and clear its identifier")]
    Destroy(StateArgs),
    /// Adopt an existing route into the state file.
    #[command(name = "import", about = "Adopt an existing route into the state file")]
    Import(ImportCommand),
}

/// Location of the state file, shared by every subcommand.
#[derive(Debug, Args)]
pub(crate) struct StateArgs {
    /// Path of the JSON state file.
    #[arg(long = "state", value_name = "PATH", default_value = DEFAULT_STATE_PATH)]
    pub(crate) state: String,
}

/// Arguments for the `tunroute apply` subcommand.
///
/// Every override is written into the state record before converging, so
/// later runs reuse it without repeating the flag.
#[derive(Debug, Args)]
pub(crate) struct ApplyCommand {
    #[command(flatten)]
    pub(crate) state: StateArgs,
    /// Account owning the route; defaults to the configured account.
    #[arg(long, value_name = "ID")]
    pub(crate) account_id: Option<String>,
    /// Tunnel that carries the routed traffic.
    #[arg(long, value_name = "ID")]
    pub(crate) tunnel_id: Option<String>,
    /// CIDR network to route, for example 192.168.0.0/26.
    #[arg(long, value_name = "CIDR")]
    pub(crate) network: Option<String>,
    /// Virtual network scoping the route.
    #[arg(long, value_name = "ID")]
    pub(crate) virtual_network_id: Option<String>,
    /// Free-text comment; pass an empty string to clear it.
    #[arg(long, value_name = "TEXT")]
    pub(crate) comment: Option<String>,
}

/// Arguments for the `tunroute import` subcommand.
#[derive(Debug, Args)]
pub(crate) struct ImportCommand {
    #[command(flatten)]
    pub(crate) state: StateArgs,
    /// Identifier in the form accountID/network or
    /// accountID/network/virtualNetworkID.
    #[arg(value_name = "ID")]
    pub(crate) id: String,
}
