use std::{
    io::{self, Write as _},
    ops::ControlFlow,
    process,
    sync::Arc,
};

use clap::Args;
use eyre::Context;
use spindle_executor::{parallel_with, wait};
use spindle_utils::exec::scan_command_output;

use super::Command;

/// Subcommand for running shell commands side by side.
///
/// Every output line is prefixed with the index of the command that
/// printed it.
#[derive(Debug, Args)]
pub struct Run {
    /// The shell that interprets the commands.
    #[clap(long, default_value = "sh")]
    shell: String,

    /// The commands to run.
    #[clap(required = true)]
    commands: Vec<String>,
}

fn run_one(shell: &str, index: usize, command: &str) -> eyre::Result<()> {
    let mut cmd = process::Command::new(shell);
    cmd.arg("-c").arg(command);

    let stdout = io::stdout();
    let code = scan_command_output(&mut cmd, b'\n', |line| {
        writeln!(stdout.lock(), "[{index}] {}", String::from_utf8_lossy(line))?;
        Ok(ControlFlow::Continue(()))
    })
    .wrap_err_with(|| format!("[{index}] `{command}` failed"))?;

    log::debug!("[{index}] `{command}` exited with code {code}");
    Ok(())
}

impl Command for Run {
    fn handle(self) -> eyre::Result<()> {
        let tasks = self
            .commands
            .into_iter()
            .enumerate()
            .map(|(index, command)| move |shell: Arc<str>| run_one(&shell, index, &command));

        let conduit = parallel_with(Arc::<str>::from(self.shell), tasks);
        wait(conduit).map_err(|failure| eyre::eyre!("{failure:#}"))
    }
}
