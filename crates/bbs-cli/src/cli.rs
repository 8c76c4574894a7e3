use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "bbs",
    about = "Bulletin board server: text posts with optional image attachments",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML configuration file
    #[arg(short, long, global = true, env = "BBS_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve(ServeArgs),
    /// Print the resolved configuration as TOML and exit
    CheckConfig(ServeArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BlobBackendKind {
    Memory,
    Filesystem,
    S3,
}

/// Overrides applied on top of the configuration file.
#[derive(Args, Clone, Debug, Default)]
pub struct ServeArgs {
    /// Listen port
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,
    /// Listen address
    #[arg(long, env = "BIND_ADDR")]
    pub bind: Option<IpAddr>,
    /// Post store: `memory`, `sqlite:<path>`, or `mysql://...`
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
    #[arg(long, env = "BLOB_BACKEND", value_enum)]
    pub blob_backend: Option<BlobBackendKind>,
    /// Bucket for the s3 blob backend
    #[arg(long, env = "BLOB_BUCKET")]
    pub blob_bucket: Option<String>,
    /// Directory for the filesystem blob backend
    #[arg(long, env = "BLOB_ROOT")]
    pub blob_root: Option<PathBuf>,
    /// Public base URL that image addresses are built from
    #[arg(long, env = "BLOB_PUBLIC_URL")]
    pub blob_public_url: Option<String>,
    /// Custom endpoint for S3-compatible stores
    #[arg(long, env = "BLOB_ENDPOINT")]
    pub blob_endpoint: Option<String>,
    /// Largest accepted attachment, in bytes
    #[arg(long, env = "MAX_ATTACHMENT_SIZE")]
    pub max_attachment_size: Option<u64>,
}
