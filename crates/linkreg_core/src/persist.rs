//! Whole-file reads and replacing writes.

use crate::error::{CoreError, CoreResult};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Reads `path` into memory. The file is closed before this returns.
pub(crate) fn read_text(path: &Path) -> CoreResult<String> {
    fs::read_to_string(path).map_err(|err| CoreError::open_failed(path, err))
}

/// Replaces `path` with the output of `write`.
///
/// Output goes to a sibling temp file that is synced and then renamed over
/// `path`, so a failed save leaves the previous file intact.
pub(crate) fn write_replacing<F>(path: &Path, write: F) -> CoreResult<()>
where
    F: FnOnce(&mut dyn Write) -> std::io::Result<()>,
{
    let temp_path = temp_path_for(path);
    let result = write_to(&temp_path, write).and_then(|()| {
        fs::rename(&temp_path, path)?;
        Ok(())
    });
    if result.is_err() {
        if let Err(err) = discard_temp(&temp_path) {
            warn!(path = %temp_path.display(), error = %err, "failed to remove temp file");
        }
    }
    result
}

/// Removes a leftover temp file. A temp file that was never created is fine.
fn discard_temp(temp_path: &Path) -> io::Result<()> {
    match fs::remove_file(temp_path) {
        Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
        _ => Ok(()),
    }
}

fn write_to<F>(temp_path: &Path, write: F) -> CoreResult<()>
where
    F: FnOnce(&mut dyn Write) -> std::io::Result<()>,
{
    let file = File::create(temp_path).map_err(|err| CoreError::open_failed(temp_path, err))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer)?;
    let file = writer.into_inner().map_err(|err| err.into_error())?;
    file.sync_all()?;
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
