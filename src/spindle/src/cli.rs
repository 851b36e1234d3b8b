use clap::{Parser, Subcommand};

use crate::cmd::*;

mod args;

/// The CLI interface for the Spindle application.
#[derive(Debug, Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
pub struct Cli {
    /// The selected command.
    #[clap(subcommand)]
    pub command: SpindleCommand,

    #[clap(flatten)]
    pub verbosity: args::Verbosity,
}

/// The top-level commands supported by Spindle.
#[derive(Debug, Subcommand)]
pub enum SpindleCommand {
    Join(join::Join),
    Run(run::Run),
    Write(write::Write),
}

impl Command for SpindleCommand {
    fn handle(self) -> eyre::Result<()> {
        match self {
            Self::Join(join) => join.handle(),
            Self::Run(run) => run.handle(),
            Self::Write(write) => write.handle(),
        }
    }
}
