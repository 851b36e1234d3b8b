//! Running commands and scanning their output.

use std::{
    io::{self, BufRead, BufReader, Read},
    ops::ControlFlow,
    panic,
    process::{Command, Stdio},
    thread,
};

use thiserror::Error;

// Only this much of a command's stderr is kept for error messages.
const STDERR_LIMIT: usize = 4 * 1024;

/// Errors that may occur when scanning the output of a command.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Spawning the command, reading its output or the token callback
    /// failed.
    #[error("{0}")]
    Io(#[from] io::Error),

    /// The command exited unsuccessfully.
    ///
    /// `message` is what the command printed to stderr, or a
    /// description of its exit status when it printed nothing.
    #[error("{message}")]
    Failed { code: i32, message: String },
}

fn capture_limited<R: Read>(mut stderr: R) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    stderr
        .by_ref()
        .take(STDERR_LIMIT as u64)
        .read_to_end(&mut buf)?;

    // Keep the pipe flowing so the command never blocks on it.
    io::copy(&mut stderr, &mut io::sink())?;

    Ok(buf)
}

fn scan<R, F>(mut reader: R, delimiter: u8, f: &mut F) -> io::Result<()>
where
    R: BufRead,
    F: FnMut(&[u8]) -> io::Result<ControlFlow<()>>,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(delimiter, &mut buf)? == 0 {
            return Ok(());
        }

        let mut token = buf.strip_suffix(&[delimiter]).unwrap_or(&buf);
        if delimiter == b'\n' {
            token = token.strip_suffix(b"\r").unwrap_or(token);
        }

        match f(token) {
            Ok(ControlFlow::Continue(())) => {}

            Ok(ControlFlow::Break(())) => {
                io::copy(&mut reader, &mut io::sink())?;
                return Ok(());
            }

            Err(e) => {
                let _ = io::copy(&mut reader, &mut io::sink());
                return Err(e);
            }
        }
    }
}

/// Runs `cmd`, splits its stdout on `delimiter` and calls `f` once
/// per token.
///
/// With `b'\n'` as the delimiter, a trailing `\r` is removed from
/// every line as well.
///
/// `f` may return [`ControlFlow::Break`] to stop early, which is not
/// an error. The rest of the output is discarded either way.
///
/// On success, the exit code of the command is returned. `-1` stands
/// for a command that was terminated by a signal.
pub fn scan_command_output<F>(
    cmd: &mut Command,
    delimiter: u8,
    mut f: F,
) -> Result<i32, ScanError>
where
    F: FnMut(&[u8]) -> io::Result<ControlFlow<()>>,
{
    let mut child = cmd.stdout(Stdio::piped()).stderr(Stdio::piped()).spawn()?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("stdout of the command is not captured"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::other("stderr of the command is not captured"))?;

    let (scanned, captured) = thread::scope(|s| {
        let captured = s.spawn(move || capture_limited(stderr));
        let scanned = scan(BufReader::new(stdout), delimiter, &mut f);

        match captured.join() {
            Ok(captured) => (scanned, captured),
            Err(payload) => panic::resume_unwind(payload),
        }
    });

    if let Err(e) = scanned {
        if let Err(reap) = child.wait() {
            log::debug!("Failed to reap the command: {reap}");
        }
        return Err(e.into());
    }

    let status = child.wait()?;
    let code = status.code().unwrap_or(-1);
    if status.success() {
        return Ok(code);
    }

    let captured = captured.unwrap_or_else(|e| {
        log::debug!("Failed to capture stderr: {e}");
        Vec::new()
    });

    let message = match String::from_utf8_lossy(&captured).trim() {
        "" => status.to_string(),
        s => s.to_owned(),
    };

    Err(ScanError::Failed { code, message })
}
