//! Command-line interface

use clap::Parser;
use std::path::PathBuf;

/// Rica Local Server - visualize tedana output locally
///
/// Run it from a tedana output folder to browse the ICA components in Rica
/// without selecting the folder by hand.
#[derive(Debug, Parser)]
#[command(name = "rica-server", version, about, long_about = None)]
pub struct Cli {
    /// Port to serve on [default: 8000]
    #[arg(long)]
    pub port: Option<u16>,

    /// Don't auto-open the browser
    #[arg(long)]
    pub no_open: bool,

    /// Address to listen on
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Optional TOML settings file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log every request, not only failures
    #[arg(short, long)]
    pub verbose: bool,
}
