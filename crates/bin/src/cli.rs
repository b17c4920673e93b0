//! CLI argument definitions for the Signet binary.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

/// Signed user-record server and offline verifier
#[derive(Parser, Debug)]
#[command(name = "signet")]
#[command(about = "Signet: signed user records, binary export and offline verification")]
#[command(version)]
pub struct Cli {
    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the user API server
    Serve(ServeArgs),
    /// Verify an exported user list against a public key
    Verify(VerifyArgs),
    /// Create or show the server signing keys
    Keys(KeysArgs),
    /// Check health of a running Signet server
    Health(HealthArgs),
}

/// Arguments for the serve command
#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value_t = 3000, env = "SIGNET_PORT")]
    pub port: u16,

    /// Bind address
    #[arg(long, default_value = "0.0.0.0", env = "SIGNET_HOST")]
    pub host: String,

    /// Data directory. Keys are kept in <data-dir>/keys,
    /// users in <data-dir>/users.json
    #[arg(short = 'D', long, default_value = ".", env = "SIGNET_DATA_DIR")]
    pub data_dir: PathBuf,
}

/// Arguments for the verify command
#[derive(clap::Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["input", "url"])))]
pub struct VerifyArgs {
    /// Export file (users.pb) to verify
    #[arg(short, long, requires = "public_key")]
    pub input: Option<PathBuf>,

    /// SPKI PEM public key file, used with --input
    #[arg(short = 'k', long)]
    pub public_key: Option<PathBuf>,

    /// Base URL of a server to fetch the export and public key from
    #[arg(short, long)]
    pub url: Option<String>,

    /// HTTP timeout in seconds, used with --url
    #[arg(short, long, default_value_t = 10)]
    pub timeout: u64,
}

/// Arguments for the keys command
#[derive(clap::Args, Debug)]
pub struct KeysArgs {
    /// Data directory whose keys/ subdirectory holds the keypair
    #[arg(short = 'D', long, default_value = ".", env = "SIGNET_DATA_DIR")]
    pub data_dir: PathBuf,
}

/// Arguments for the health command
#[derive(clap::Args, Debug)]
pub struct HealthArgs {
    /// Base URL of the server to check
    #[arg(short, long, default_value = "http://127.0.0.1:3000", env = "SIGNET_URL")]
    pub url: String,

    /// Timeout in seconds
    #[arg(short, long, default_value_t = 5)]
    pub timeout: u64,
}
