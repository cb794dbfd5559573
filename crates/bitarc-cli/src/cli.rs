//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bitarc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate compression settings and show the engine property list
    Plan(PlanArgs),
    /// List supported formats, their features and methods
    Formats,
    /// Generate shell completions
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct PlanArgs {
    /// Archive to be created; its extension selects the format
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Archive format, overriding the extension (7z, zip, tar, gzip, bzip2, xz, wim)
    #[arg(short = 'F', long)]
    pub format: Option<String>,

    /// Compression method (Copy, PPMd, LZMA, LZMA2, BZip2, Deflate, Deflate64)
    #[arg(short, long)]
    pub method: Option<String>,

    /// Compression level (0-9 or none, fastest, fast, normal, max, ultra)
    #[arg(short = 'l', long)]
    pub level: Option<String>,

    /// Dictionary size in bytes, with optional K, M or G suffix
    #[arg(short, long, value_parser = parse_byte_size)]
    pub dictionary: Option<u64>,

    /// Use solid compression
    #[arg(short, long)]
    pub solid: bool,

    /// Archive password
    #[arg(short, long)]
    pub password: Option<String>,

    /// Encrypt archive headers as well (requires --password)
    #[arg(long, requires = "password")]
    pub encrypt_headers: bool,

    /// Split into volumes of this size, with optional K, M, G or T suffix
    #[arg(long, value_parser = parse_byte_size)]
    pub volume_size: Option<u64>,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Parse byte size with optional suffix (K, M, G, T)
#[allow(clippy::option_if_let_else)]
fn parse_byte_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty byte size".to_string());
    }

    let (num_str, multiplier) = if let Some(stripped) = s.strip_suffix('T') {
        (stripped, 1024_u64.pow(4))
    } else if let Some(stripped) = s.strip_suffix('G') {
        (stripped, 1024_u64.pow(3))
    } else if let Some(stripped) = s.strip_suffix('M') {
        (stripped, 1024_u64.pow(2))
    } else if let Some(stripped) = s.strip_suffix('K') {
        (stripped, 1024)
    } else {
        (s, 1)
    };

    num_str
        .parse::<u64>()
        .map_err(|_| format!("invalid byte size: {s}"))
        .and_then(|n| {
            n.checked_mul(multiplier)
                .ok_or_else(|| format!("byte size overflow: {s}"))
        })
}
