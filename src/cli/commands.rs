use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "p300", about = concat!("project300 v", env!("CARGO_PKG_VERSION"), " - three pages, three tasks, three levels"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Directory holding the page records (default: current directory)
    #[arg(short = 'C', long = "data-dir", global = true, env = "P300_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show one page, or all pages
    Show(ShowArgs),
    /// Change a page title
    Title(TitleArgs),
    /// Change the task on a row
    Task(TaskArgs),
    /// Set a level to a value between 0 and 100
    Level(LevelArgs),
    /// Raise a level by one
    Inc(StepArgs),
    /// Lower a level by one
    Dec(StepArgs),
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ShowArgs {
    /// Page number (1-3). Omit to show every page.
    pub page: Option<usize>,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TitleArgs {
    /// Page number (1-3)
    pub page: usize,
    /// New title
    pub text: String,
}

#[derive(Args)]
pub struct TaskArgs {
    /// Page number (1-3)
    pub page: usize,
    /// Row number (1-3)
    pub row: usize,
    /// Task or skill text (empty string clears it)
    pub text: String,
}

#[derive(Args)]
pub struct LevelArgs {
    /// Page number (1-3)
    pub page: usize,
    /// Row number (1-3)
    pub row: usize,
    /// Level number (1-3)
    pub level: usize,
    /// New value (0-100)
    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

#[derive(Args)]
pub struct StepArgs {
    /// Page number (1-3)
    pub page: usize,
    /// Row number (1-3)
    pub row: usize,
    /// Level number (1-3)
    pub level: usize,
}
