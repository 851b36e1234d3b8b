//! Crash-safe replacement of files.

use std::{
    fs::{self, File, Permissions},
    io::{self, BufWriter},
    path::{Path, PathBuf},
};

use tempfile::Builder;
use thiserror::Error;

const TEMP_PREFIX: &str = "tmp-";

/// Reasons for refusing to replace an existing file.
#[derive(Debug, Error)]
pub enum DestinationError {
    /// The destination is a directory or another special file.
    #[error("'{}' is not a regular file", .0.display())]
    NotRegularFile(PathBuf),

    /// The destination has no write permission bits.
    #[error("'{}' is not writable", .0.display())]
    ReadOnly(PathBuf),
}

impl From<DestinationError> for io::Error {
    fn from(value: DestinationError) -> Self {
        let kind = match value {
            DestinationError::NotRegularFile(..) => io::ErrorKind::InvalidInput,
            DestinationError::ReadOnly(..) => io::ErrorKind::PermissionDenied,
        };

        io::Error::new(kind, value)
    }
}

fn destination_permissions(path: &Path) -> io::Result<Option<Permissions>> {
    match fs::metadata(path) {
        Ok(meta) if !meta.is_file() => Err(DestinationError::NotRegularFile(path.into()).into()),
        Ok(meta) if meta.permissions().readonly() => {
            Err(DestinationError::ReadOnly(path.into()).into())
        }
        Ok(meta) => Ok(Some(meta.permissions())),

        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Safely replaces the contents of the file at `path`.
///
/// `f` writes the new contents into a temporary file in the same
/// directory, which is then renamed over `path`. That keeps the
/// rename on one filesystem, where it is usually atomic.
///
/// When `path` already exists, it must be a writable regular file and
/// its permissions carry over to the replacement. A symlink is checked
/// by what it points to, but the rename replaces the link itself and
/// leaves its target alone.
///
/// If `f` fails or panics, the temporary file is removed and `path` is
/// left untouched.
pub fn write_file<P, F, E>(path: P, f: F) -> Result<(), E>
where
    P: AsRef<Path>,
    F: FnOnce(&mut BufWriter<File>) -> Result<(), E>,
    E: From<io::Error>,
{
    let path = path.as_ref();
    let permissions = destination_permissions(path)?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    // `temp` deletes the file when dropped, be it on an error path or
    // while unwinding from a panic in `f`.
    let (file, temp) = Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(dir)?
        .into_parts();

    let mut out = BufWriter::new(file);
    f(&mut out)?;

    let file = out.into_inner().map_err(io::IntoInnerError::into_error)?;
    if let Some(permissions) = permissions {
        file.set_permissions(permissions)?;
    }
    file.sync_all()?;
    drop(file);

    temp.persist(path).map_err(io::Error::from)?;
    log::debug!("Replaced '{}'", path.display());

    Ok(())
}
