//! Bounded external tool runs.

use std::fs;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::conf::DUR_POLL_INTERVAL;
use crate::spec::ConvertError;

/// Resolve `bin` on `PATH` (or as a path), mapping absence to `Unavailable`.
pub(crate) fn resolve_binary(bin: &str) -> Result<PathBuf, ConvertError> {
    which::which(bin).map_err(|e| ConvertError::Unavailable {
        tool: bin.to_string(),
        message: e.to_string(),
    })
}

/// Run `command` to completion within `timeout`; non-zero exit is `Failed`.
///
/// The child is killed when the timeout elapses.
pub(crate) fn run_with_timeout(
    mut command: Command,
    path_file_in: &Path,
    timeout: Duration,
) -> Result<(), ConvertError> {
    let c_program = command.get_program().to_string_lossy().into_owned();
    debug!(program = %c_program, args = ?command.get_args().collect::<Vec<_>>(), "spawn");

    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| ConvertError::Unavailable {
            tool: c_program.clone(),
            message: e.to_string(),
        })?;

    // Drain stderr concurrently; a full pipe stalls the child.
    let handle_stderr = child.stderr.take().map(|mut stderr| {
        std::thread::spawn(move || {
            let mut c_stderr = String::new();
            let _ = stderr.read_to_string(&mut c_stderr);
            c_stderr
        })
    });

    let t_start = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if t_start.elapsed() >= timeout => {
                let _ = child.kill();
                let _ = child.wait();
                // Reader left detached: a surviving grandchild may still hold the pipe.
                return Err(ConvertError::Failed {
                    path: path_file_in.to_path_buf(),
                    message: format!("{c_program} timed out after {}s", timeout.as_secs()),
                });
            }
            Ok(None) => std::thread::sleep(DUR_POLL_INTERVAL),
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ConvertError::Failed {
                    path: path_file_in.to_path_buf(),
                    message: format!("{c_program} wait failed: {e}"),
                });
            }
        }
    };

    let c_stderr = handle_stderr
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default();
    if status.success() {
        return Ok(());
    }
    Err(ConvertError::Failed {
        path: path_file_in.to_path_buf(),
        message: format!("{c_program} exited with {status}: {}", c_stderr.trim()),
    })
}

/// Remove a previous `path_file_out` so only a fresh tool run can satisfy
/// [`ensure_output`].
pub(crate) fn remove_stale_output(path_file_out: &Path) -> Result<(), ConvertError> {
    match fs::remove_file(path_file_out) {
        Ok(()) => {
            debug!(path = %path_file_out.display(), "stale output removed");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(source) => Err(ConvertError::Io {
            path: path_file_out.to_path_buf(),
            source,
        }),
    }
}

/// Require `path_file_out` to exist after a tool run.
pub(crate) fn ensure_output(
    path_file_in: &Path,
    path_file_out: PathBuf,
) -> Result<PathBuf, ConvertError> {
    if path_file_out.is_file() {
        return Ok(path_file_out);
    }
    Err(ConvertError::Failed {
        path: path_file_in.to_path_buf(),
        message: format!("expected output not created: {}", path_file_out.display()),
    })
}

/// `{dir_out}/{stem of path_file_in}.{ext}`.
pub(crate) fn derive_output_path(path_file_in: &Path, path_dir_out: &Path, ext: &str) -> PathBuf {
    let stem = path_file_in
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    path_dir_out.join(format!("{stem}.{ext}"))
}
