//! Session log persistence

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

/// Write the session transcript to `log_<timestamp>.txt` under `dir`,
/// trimmed of trailing whitespace. One file per run, written exactly once at
/// session end.
pub fn write_session_log(dir: &Path, transcript: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let path = dir.join(format!("log_{}.txt", timestamp));
    fs::write(&path, transcript.trim_end())?;

    info!("Transcript saved to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_trimmed_transcript() {
        let dir = tempfile::tempdir().unwrap();

        let path = write_session_log(dir.path(), "hello world  \n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello world");
    }

    #[test]
    fn test_filename_shape() {
        let dir = tempfile::tempdir().unwrap();

        let path = write_session_log(dir.path(), "x").unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("log_"));
        assert!(name.ends_with(".txt"));
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("logs").join("today");

        let path = write_session_log(&nested, "content").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_empty_transcript_writes_empty_file() {
        let dir = tempfile::tempdir().unwrap();

        let path = write_session_log(dir.path(), "").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }
}
