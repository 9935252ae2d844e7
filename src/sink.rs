//! Writes generated log lines to their target files.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Replaces `path` with exactly the given lines.
///
/// The parent directory is created if missing. The file is opened in
/// truncate mode, so content from earlier generation calls never survives
/// into the next one. The handle is flushed and closed before returning.
pub fn write_log_file(path: &Path, lines: &[String]) -> io::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    for line in lines {
        file.write_all(line.as_bytes())?;
    }
    file.flush()
}
