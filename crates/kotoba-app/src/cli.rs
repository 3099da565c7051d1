use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about = "Japanese vocabulary lookup server")]
pub struct Cli {
    /// JSON profile to load instead of ./config.json
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Force JSON log lines even on a terminal
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub cmd: Option<Cmd>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Cmd {
    /// Run the HTTP API (default)
    Serve,
    /// List LLM models that support content generation
    Models,
    /// Scrape one word and print the parsed cards
    Probe { word: String },
}
