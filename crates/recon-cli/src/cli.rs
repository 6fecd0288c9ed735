//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use recon_core::{ComparisonOutcome, RecordType};
use uuid::Uuid;

/// Compare and sync CMS blocks and pages between content instances
#[derive(Parser, Debug)]
#[command(name = "recon")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Data directory holding instances, snapshots and run history
    #[arg(long, global = true, env = "RECON_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Config file (TOML, JSON or YAML)
    #[arg(long, global = true, env = "RECON_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Manage registered instances
    Instance {
        #[command(subcommand)]
        action: InstanceAction,
    },

    /// Fetch an instance's records and store them as a snapshot
    Refresh {
        /// Instance id
        instance: String,

        /// Record type (blocks or pages)
        #[arg(short = 't', long = "type")]
        record_type: RecordType,
    },

    /// Compare the snapshots of two instances
    ///
    /// Examples:
    ///   recon compare staging prod -t blocks
    ///   recon compare staging prod -t pages --refresh --show exists_both_different
    Compare {
        /// Source instance id
        source: String,

        /// Destination instance id
        destination: String,

        /// Record type (blocks or pages)
        #[arg(short = 't', long = "type")]
        record_type: RecordType,

        /// Refresh both snapshots first
        #[arg(long)]
        refresh: bool,

        /// Only list entries with this outcome
        #[arg(long)]
        show: Option<ComparisonOutcome>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show a field-by-field diff of one record
    Diff {
        /// Source instance id
        source: String,

        /// Destination instance id
        destination: String,

        /// Record type (blocks or pages)
        #[arg(short = 't', long = "type")]
        record_type: RecordType,

        /// Record identifier
        #[arg(short, long)]
        identifier: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Preview what a sync would write, without touching the destination
    Plan {
        /// Source instance id
        source: String,

        /// Destination instance id
        destination: String,

        /// Record type (blocks or pages)
        #[arg(short = 't', long = "type")]
        record_type: RecordType,

        #[command(flatten)]
        items: ItemArgs,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Push records from the source to the destination
    ///
    /// Examples:
    ///   recon sync staging prod -t blocks --create footer --update header
    ///   recon sync staging prod -t pages --update home --fields title,content
    ///   recon sync staging prod -t blocks --items items.json --store-map 1=3
    Sync {
        /// Source instance id
        source: String,

        /// Destination instance id
        destination: String,

        /// Record type (blocks or pages)
        #[arg(short = 't', long = "type")]
        record_type: RecordType,

        #[command(flatten)]
        items: ItemArgs,

        /// Items pushed at once (defaults to the configured value)
        #[arg(long)]
        concurrency: Option<usize>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List recorded sync runs, newest first
    History {
        /// Maximum number of runs to show
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show one sync run and its per-item outcomes
    Status {
        /// Run id
        run_id: Uuid,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

/// Instance management actions
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum InstanceAction {
    /// Register an instance
    Add {
        /// Instance id (used in other commands)
        id: String,

        /// Base URL of the store
        #[arg(long)]
        url: String,

        /// Integration access token
        #[arg(long, env = "RECON_API_TOKEN", hide_env_values = true)]
        token: String,

        /// Display name (defaults to the id)
        #[arg(long)]
        name: Option<String>,
    },

    /// List registered instances
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Remove an instance and its snapshots
    Remove {
        /// Instance id
        id: String,
    },

    /// Check that an instance's API answers
    Test {
        /// Instance id
        id: String,
    },
}

/// Which items to plan or sync
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemArgs {
    /// JSON file with a list of `{identifier, action, fields_to_sync}` items
    #[arg(long, value_name = "FILE", conflicts_with_all = ["create", "update", "fields"])]
    pub items: Option<PathBuf>,

    /// Identifier to create in the destination (repeatable)
    #[arg(long, value_name = "IDENTIFIER")]
    pub create: Vec<String>,

    /// Identifier to update in the destination (repeatable)
    #[arg(long, value_name = "IDENTIFIER")]
    pub update: Vec<String>,

    /// Restrict updates to these fields
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Map a source store id to a destination store id, as `SRC=DST`
    #[arg(long = "store-map", value_name = "SRC=DST", value_parser = parse_store_map)]
    pub store_map: Vec<(String, String)>,
}

fn parse_store_map(raw: &str) -> Result<(String, String), String> {
    let (from, to) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected SRC=DST, got '{raw}'"))?;
    let (from, to) = (from.trim(), to.trim());
    if from.is_empty() || to.is_empty() {
        return Err(format!("expected SRC=DST, got '{raw}'"));
    }
    Ok((from.to_string(), to.to_string()))
}
