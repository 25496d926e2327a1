use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "syncmerge",
    about = "Reconcile a local and a remote copy of the same record",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Print single-line JSON instead of pretty output
    #[arg(long, global = true)]
    pub compact: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Pick the more recently written record (last write wins)
    Resolve(ResolveArgs),
    /// Overlay remote fields onto local and union set-valued fields
    Merge(MergeArgs),
}

/// The two records to reconcile. `-` reads from stdin.
#[derive(Args, Debug)]
pub struct RecordPair {
    /// Local (cached) record, as a JSON file
    pub local: PathBuf,
    /// Remote (authoritative) record, as a JSON file
    pub remote: PathBuf,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub records: RecordPair,

    /// Print `{"resolution": ..., "winner": ...}` instead of just the winner
    #[arg(long)]
    pub explain: bool,
}

#[derive(Args, Debug)]
pub struct MergeArgs {
    #[command(flatten)]
    pub records: RecordPair,

    /// Field to union; repeat for several. Overrides SYNCMERGE_UNION_FIELDS
    #[arg(long = "union-field", value_name = "NAME")]
    pub union_fields: Vec<String>,
}
