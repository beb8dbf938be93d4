use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Clone, Debug, Parser)]
#[command(name = "weft", version = env!("CARGO_PKG_VERSION"), about, long_about = None, propagate_version = true)]
pub struct App {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(alias = "i", name = "info", about = "Print the status of some node")]
    Info(InfoArg),
    #[command(alias = "hl", name = "hash-list", about = "Print the hash listing, newest first")]
    HashList(HashListArg),
    #[command(alias = "g", name = "get", about = "Fetch a payload by id")]
    Get(GetArg),
    #[command(alias = "n", name = "nodes", about = "Print the known nodes and their weights")]
    Nodes(NodesArg),
}

#[derive(Clone, Debug, Args)]
pub struct InfoArg {
    /// Keep retrying, backing off for a minute every hundred failures
    #[arg(long, short)]
    pub wait: bool,
}

#[derive(Clone, Debug, Args)]
pub struct HashListArg {
    /// Print at most N entries
    #[arg(long, short = 'n', value_name = "N")]
    pub limit: Option<usize>,
}

#[derive(Clone, Debug, Args)]
pub struct GetArg {
    /// Transaction id
    pub id: String,

    /// Reassemble the payload from its chunks
    #[arg(long, short, conflicts_with = "decode")]
    pub chunks: bool,

    /// Decode the body from base64url while streaming it
    #[arg(long, short)]
    pub decode: bool,

    /// Write to FILE instead of stdout
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Keep retrying, backing off for a minute every hundred failures
    #[arg(long, short)]
    pub wait: bool,
}

#[derive(Clone, Debug, Args)]
pub struct NodesArg {
    /// Query the bootstrap node for peers first
    #[arg(long)]
    pub discover: bool,
}
