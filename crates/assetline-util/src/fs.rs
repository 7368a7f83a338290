use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Read a text file, replacing invalid UTF-8 with U+FFFD.
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn read_lossy(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

/// Replace the contents of `path` with `bytes` in one step.
///
/// The bytes go to a named temp file in the destination directory, which
/// is then persisted over `path`. Missing parent directories are created.
///
/// # Errors
/// Returns an error if the directory, temp file, or persist fails.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_read_lossy_valid_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("assetline.config.json");
        fs::write(&path, r#"{"rules": []}"#).unwrap();

        assert_eq!(read_lossy(&path).unwrap(), r#"{"rules": []}"#);
    }

    #[test]
    fn test_read_lossy_invalid_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, [b'{', b'}', 0xC3, 0x28]).unwrap();

        let text = read_lossy(&path).unwrap();
        assert!(text.starts_with("{}"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_read_lossy_missing_file() {
        assert!(read_lossy(Path::new("/nonexistent/assetline.config.json")).is_err());
    }

    #[test]
    fn test_write_atomic_creates_parents_and_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("pipeline.json");

        write_atomic(&path, b"first").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first");

        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_write_atomic_leaves_no_staging_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("pipeline.json");

        write_atomic(&path, b"{}").unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["pipeline.json".to_string()]);
    }
}
