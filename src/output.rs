//! Persists generated README text.

use crate::error::{Error, Result};
use crate::log_info;
use std::fs;
use std::path::{Path, PathBuf};

/// Write `content` to `dir/filename`, optionally backing up an existing
/// file to `<filename>.bak` first. Returns the path written.
pub fn write_readme(content: &str, dir: &Path, filename: &str, backup: bool) -> Result<PathBuf> {
    let target = dir.join(filename);

    if backup && target.exists() {
        let backup_path = dir.join(format!("{filename}.bak"));
        fs::copy(&target, &backup_path).map_err(|source| Error::Filesystem {
            path: backup_path.clone(),
            source,
        })?;
        log_info!("Backed up existing {} to {}", filename, backup_path.display());
    }

    fs::write(&target, content).map_err(|source| Error::Filesystem {
        path: target.clone(),
        source,
    })?;
    log_info!("README written to {}", target.display());
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_file() {
        let temp = TempDir::new().expect("tempdir");
        let path = write_readme("# Title", temp.path(), "README.md", false).expect("write");
        assert_eq!(fs::read_to_string(path).expect("read"), "# Title");
    }

    #[test]
    fn test_backup_preserves_previous_content() {
        let temp = TempDir::new().expect("tempdir");
        fs::write(temp.path().join("README.md"), "old").expect("seed");

        write_readme("new", temp.path(), "README.md", true).expect("write");
        assert_eq!(
            fs::read_to_string(temp.path().join("README.md")).expect("read"),
            "new"
        );
        assert_eq!(
            fs::read_to_string(temp.path().join("README.md.bak")).expect("read bak"),
            "old"
        );
    }

    #[test]
    fn test_no_backup_when_disabled() {
        let temp = TempDir::new().expect("tempdir");
        fs::write(temp.path().join("README.md"), "old").expect("seed");

        write_readme("new", temp.path(), "README.md", false).expect("write");
        assert!(!temp.path().join("README.md.bak").exists());
    }

    #[test]
    fn test_unwritable_dir_is_filesystem_error() {
        let err = write_readme("x", Path::new("/definitely/not/here"), "README.md", false)
            .expect_err("bad dir");
        assert_eq!(err.exit_code(), 3);
    }
}
