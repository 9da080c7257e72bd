use clap::{Args, Parser, Subcommand};
use jiff::Timestamp;

pub const NODE_ID_ENV: &str = "BASE62FLAKE_NODE_ID";
pub const EPOCH_ENV: &str = "BASE62FLAKE_EPOCH";

pub const DEFAULT_COUNT: usize = 5;

#[derive(Debug, Parser)]
#[command(name = "base62flake", about = "Mint and inspect base62 snowflake ids")]
pub struct CLI {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print freshly minted ids, one per line
    Generate(GenerateArgs),
    /// Break ids down into timestamp, node id and sequence
    Inspect(InspectArgs),
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[arg(short = 'n', long, default_value_t = DEFAULT_COUNT)]
    pub count: usize,

    /// Node id in 0..=1023; the default node id is used when omitted
    #[arg(long, env = NODE_ID_ENV)]
    pub node_id: Option<u16>,

    /// Custom epoch as an RFC 3339 timestamp
    #[arg(long, env = EPOCH_ENV)]
    pub epoch: Option<Timestamp>,

    /// Pad ids to a fixed width so they sort lexicographically
    #[arg(long)]
    pub padded: bool,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Epoch the ids were minted against, as an RFC 3339 timestamp
    #[arg(long, env = EPOCH_ENV)]
    pub epoch: Option<Timestamp>,
}
