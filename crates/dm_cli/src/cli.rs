use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dm_cli")]
#[command(about = "Document metadata extraction and audit CLI")]
pub struct Cli {
    /// JSON config file; defaults apply when omitted.
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Record database, overriding the config file and DOCMETA_DB.
    #[arg(long, global = true)]
    pub db: Option<String>,
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Extract and hash metadata without storing it.
    Extract {
        path: String,
        #[arg(long)]
        json: bool,
    },
    /// Extract metadata and append a record.
    Save { path: String },
    /// All records, newest first.
    List,
    Show { id: i64 },
    /// Re-extract a file and compare it with a stored record.
    Verify { id: i64, path: String },
    /// Records saved for one filename, newest first.
    History { filename: String },
}
