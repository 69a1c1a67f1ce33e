use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use bth_ledger::CategoryKind;

#[derive(Parser)]
#[command(
    name = "bth",
    about = "Blockthentic: register, verify and revoke content attestations",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Deployment state file (overrides `state_file` from the config)
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, global = true, default_value = "bth.toml")]
    pub config: PathBuf,

    /// Submitting account: 0x-prefixed address or a label
    #[arg(long = "as", global = true, value_name = "ACCOUNT")]
    pub account: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Deploy and link a new registry pair
    Deploy(DeployArgs),
    /// Register one record
    Register(RegisterArgs),
    /// Register every record listed in a JSON file
    RegisterBatch(RegisterBatchArgs),
    /// Check an id against a content hash
    Verify(VerifyArgs),
    /// Revoke one id
    Revoke(RevokeArgs),
    /// Revoke several ids with one reason
    RevokeBatch(RevokeBatchArgs),
    /// Show existence, validity and registration time of an id
    Status(IdArgs),
    /// Show the full record of an id
    Show(IdArgs),
    /// List every record in registration order
    List(ListArgs),
    /// Show addresses and roles of the deployment
    Info(InfoArgs),
    /// Hand the verification registry to a new owner
    TransferOwnership(AccountArgs),
    /// Replace the admin
    UpdateAdmin(AccountArgs),
    /// Show the event log, an id's history, or an audit
    Log(LogArgs),
}

#[derive(Args)]
pub struct DeployArgs {
    /// Category of the deployment (defaults to the configured one)
    #[arg(long)]
    pub category: Option<CategoryKind>,
    /// Admin account
    #[arg(long)]
    pub admin: String,
    /// Replace an existing state file
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct RegisterArgs {
    pub id: String,
    /// Content hash: 64 hex characters, or a label to hash
    pub hash: String,
    #[arg(long, default_value = "")]
    pub uri: String,
    #[command(flatten)]
    pub fields: FieldFlags,
}

/// Category-specific fields. Flags that do not apply are ignored.
#[derive(Args, Clone, Debug, Default)]
pub struct FieldFlags {
    #[arg(long)]
    pub metadata_hash: Option<String>,
    #[arg(long, default_value = "")]
    pub image_type: String,
    #[arg(long)]
    pub perceptual_hash: Option<String>,
    #[arg(long, default_value = "")]
    pub dataset_type: String,
}

#[derive(Args)]
pub struct RegisterBatchArgs {
    /// JSON array of `{ "id", "hash", "uri", ... }` objects
    pub file: PathBuf,
}

#[derive(Args)]
pub struct VerifyArgs {
    pub id: String,
    pub hash: String,
}

#[derive(Args)]
pub struct RevokeArgs {
    pub id: String,
    /// Reason code or label, e.g. `4` or `owner-request`
    #[arg(short, long)]
    pub reason: String,
}

#[derive(Args)]
pub struct RevokeBatchArgs {
    #[arg(required = true)]
    pub ids: Vec<String>,
    #[arg(short, long)]
    pub reason: String,
}

#[derive(Args)]
pub struct IdArgs {
    pub id: String,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only records that are still valid
    #[arg(long)]
    pub valid: bool,
}

#[derive(Args)]
pub struct InfoArgs {}

#[derive(Args)]
pub struct AccountArgs {
    /// New account: 20-byte hex or a label
    #[arg(value_name = "ACCOUNT")]
    pub target: String,
}

#[derive(Args)]
pub struct LogArgs {
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
    /// Reconstruct the history of one id from the log
    #[arg(long, conflicts_with = "audit")]
    pub history: Option<String>,
    /// Verify the hash chain and cross-check live state
    #[arg(long)]
    pub audit: bool,
}
