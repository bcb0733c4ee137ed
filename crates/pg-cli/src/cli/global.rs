use std::path::PathBuf;

use clap::ValueEnum;

/// How a hook report is printed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Code-review score, verified score and message, one per line.
    Review,
    Json,
    Raw,
}

/// Global flags available before or after subcommands.
#[derive(Clone, Debug)]
pub struct GlobalFlags {
    pub config: Option<PathBuf>,
    pub git_dir: Option<PathBuf>,
    pub format: OutputFormat,
    pub post_review: bool,
    pub header: Option<String>,
}
