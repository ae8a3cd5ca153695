//! I/O utility functions

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Temporary sibling of `path` used while writing
fn temp_path(path: &Path) -> PathBuf {
    match path.extension() {
        Some(ext) => path.with_extension(format!("{}.tmp", ext.to_string_lossy())),
        None => path.with_extension("tmp"),
    }
}

/// Write content to a file atomically using write-then-rename pattern.
///
/// The content is first written to a temporary file next to the target, then
/// renamed over it, so readers never observe a half-written export.
pub fn atomic_write(path: &Path, content: &str) -> io::Result<()> {
    let temp_path = temp_path(path);
    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

/// Write `content` to `output` if given, otherwise to stdout
pub fn emit(output: Option<&Path>, content: &str) -> io::Result<()> {
    match output {
        Some(path) => {
            atomic_write(path, content)?;
            tracing::info!(path = %path.display(), bytes = content.len(), "wrote output file");
            Ok(())
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
            stdout.flush()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cohort.csv");

        atomic_write(&path, "month,survivors\n").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "month,survivors\n");

        // Temp file should not exist
        assert!(!dir.path().join("cohort.csv.tmp").exists());
    }

    #[test]
    fn test_atomic_write_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("summary.json");

        atomic_write(&path, "first").unwrap();
        atomic_write(&path, "second").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "second");
    }

    #[test]
    fn test_temp_path_without_extension() {
        assert_eq!(temp_path(Path::new("out")), PathBuf::from("out.tmp"));
        assert_eq!(temp_path(Path::new("a/b.json")), PathBuf::from("a/b.json.tmp"));
    }

    #[test]
    fn test_emit_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.txt");

        emit(Some(&path), "hello").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
    }
}
