use std::{
    io::{self, BufRead, BufReader, Write as _},
    path::PathBuf,
};

use clap::Args;
use eyre::Context;
use spindle_executor::Pump;
use spindle_utils::fs::write_file;

use super::Command;

/// Subcommand for replacing a file with what is read from stdin.
///
/// Stdin is read on its own thread while the file is being written.
/// The file is only replaced once all input was written, so an error
/// or an interrupted read leaves it as it was.
#[derive(Debug, Args)]
pub struct Write {
    /// The path to the file to replace. It is created if missing.
    path: PathBuf,
}

impl Command for Write {
    fn handle(self) -> eyre::Result<()> {
        let pump = Pump::from_env()?;
        let mut count = 0usize;

        write_file(&self.path, |out| {
            let lines = BufReader::new(io::stdin())
                .lines()
                .map(|line| line.wrap_err("failed to read stdin"));

            pump.run(lines, |line| {
                out.write_all(line.as_bytes())?;
                out.write_all(b"\n")?;
                count += 1;

                Ok(())
            })
        })
        .wrap_err_with(|| format!("failed to write '{}'", self.path.display()))?;

        log::info!("Wrote {count} lines to '{}'", self.path.display());
        Ok(())
    }
}
