//! Facilities for discovering input files and loading text corpora.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::IngestConfig;
use crate::error::{BpeError, Result};

/// Discovers files rooted at the provided input paths according to the ingest configuration.
///
/// Directories are traversed recursively by default; set [`IngestConfig::recursive`] to `false`
/// to limit discovery to the first level.  Symlink traversal is controlled through
/// [`IngestConfig::follow_symlinks`].  Files found inside a directory are sorted by path so
/// that training sees the same line order on every run.
pub fn collect_paths<P: AsRef<Path>>(inputs: &[P], cfg: &IngestConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        let path = input.as_ref();
        if !path.exists() {
            return Err(BpeError::InvalidConfig(format!(
                "input path {path:?} does not exist"
            )));
        }
        let metadata = path
            .metadata()
            .map_err(|err| BpeError::io(err, Some(path.to_path_buf())))?;
        if metadata.is_dir() {
            let mut found = Vec::new();
            if cfg.recursive {
                let walker = WalkDir::new(path).follow_links(cfg.follow_symlinks);
                for entry in walker {
                    let entry = entry.map_err(|err| {
                        let entry_path = err.path().map(Path::to_path_buf);
                        match err.into_io_error() {
                            Some(source) => BpeError::io(source, entry_path),
                            None => BpeError::InvalidConfig(format!(
                                "filesystem loop detected below {path:?}"
                            )),
                        }
                    })?;
                    if entry.file_type().is_file() {
                        found.push(entry.path().to_path_buf());
                    }
                }
            } else {
                for entry in
                    fs::read_dir(path).map_err(|err| BpeError::io(err, Some(path.to_path_buf())))?
                {
                    let entry = entry.map_err(|err| BpeError::io(err, Some(path.to_path_buf())))?;
                    let entry_path = entry.path();
                    if entry_path.is_file() {
                        found.push(entry_path);
                    }
                }
            }
            found.sort();
            files.extend(found);
        } else if metadata.is_file() {
            files.push(path.to_path_buf());
        }
    }
    if files.is_empty() {
        return Err(BpeError::InvalidConfig(
            "no files discovered in provided inputs".into(),
        ));
    }
    Ok(files)
}

/// Loads every line of every discovered file, in discovery order.
///
/// Files must be UTF-8.  Lines are returned without their terminators; blank lines are kept
/// since they simply contribute no words during vocabulary construction.
pub fn load_corpus_lines<P: AsRef<Path>>(inputs: &[P], cfg: &IngestConfig) -> Result<Vec<String>> {
    let file_paths = collect_paths(inputs, cfg)?;
    let mut lines = Vec::new();
    for file_path in file_paths {
        let text = fs::read_to_string(&file_path)
            .map_err(|err| BpeError::io(err, Some(file_path.clone())))?;
        lines.extend(text.lines().map(str::to_owned));
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn collect_paths_discovers_files_recursively() {
        let dir = tempdir().expect("tempdir");
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).expect("create nested directory");
        let file_a = dir.path().join("a.txt");
        let file_b = nested.join("b.txt");
        fs::write(&file_a, "A bɛ taa").expect("write a");
        fs::write(&file_b, "ka kɛ").expect("write b");

        let cfg = IngestConfig {
            recursive: true,
            ..IngestConfig::default()
        };
        let paths = collect_paths(&[dir.path()], &cfg).expect("collect paths");
        assert_eq!(paths, vec![file_a, file_b]);
    }

    #[test]
    fn collect_paths_skips_nested_without_recursion() {
        let dir = tempdir().expect("tempdir");
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).expect("create nested directory");
        let top = dir.path().join("top.txt");
        fs::write(&top, "i ni ce").expect("write top");
        fs::write(nested.join("deep.txt"), "a ni ce").expect("write deep");

        let cfg = IngestConfig::builder().recursive(false).build();
        let paths = collect_paths(&[dir.path()], &cfg).expect("collect paths");
        assert_eq!(paths, vec![top]);
    }

    #[test]
    fn collect_paths_rejects_missing_input() {
        let dir = tempdir().expect("tempdir");
        let missing = dir.path().join("missing.txt");
        let err = collect_paths(&[missing], &IngestConfig::default()).expect_err("should fail");
        assert!(matches!(err, BpeError::InvalidConfig(message) if message.contains("does not exist")));
    }

    #[test]
    fn collect_paths_rejects_empty_directory() {
        let dir = tempdir().expect("tempdir");
        let err = collect_paths(&[dir.path()], &IngestConfig::default()).expect_err("should fail");
        assert!(matches!(err, BpeError::InvalidConfig(_)));
    }

    #[test]
    fn load_corpus_lines_preserves_file_and_line_order() {
        let dir = tempdir().expect("tempdir");
        let first = dir.path().join("first.txt");
        let second = dir.path().join("second.txt");
        fs::write(&first, "A bɛ taa\nN'a fɛ ka kɛ nyɛ\n").expect("write first");
        fs::write(&second, "\ni ni ce").expect("write second");

        let lines = load_corpus_lines(&[&first, &second], &IngestConfig::default())
            .expect("load corpus");
        assert_eq!(lines, vec!["A bɛ taa", "N'a fɛ ka kɛ nyɛ", "", "i ni ce"]);
    }
}
