//! Plain-text vocabulary and merge files.
//!
//! The vocabulary file holds one `"<representation> <frequency>"` line per entry, e.g.
//! `t a a</w> 2`.  The merges file holds one `"<left> <right>"` line per merge in rank order,
//! e.g. `a </w>`.  Output is deterministic for a given training run.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{BpeError, Result};
use crate::model::MergeTable;
use crate::vocab::Vocabulary;

/// Writes the vocabulary in first-occurrence order.
pub fn write_vocab<W: Write>(vocab: &Vocabulary, writer: &mut W) -> std::io::Result<()> {
    for (representation, frequency) in vocab.iter() {
        writeln!(writer, "{representation} {frequency}")?;
    }
    Ok(())
}

/// Writes the merges in rank order.
pub fn write_merges<W: Write>(merges: &MergeTable, writer: &mut W) -> std::io::Result<()> {
    for (left, right, _) in merges.iter() {
        writeln!(writer, "{left} {right}")?;
    }
    Ok(())
}

fn write_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let file = File::create(path).map_err(|err| BpeError::io(err, Some(path.to_path_buf())))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer)
        .and_then(|()| writer.flush())
        .map_err(|err| BpeError::io(err, Some(path.to_path_buf())))
}

/// Persists the vocabulary to `vocab_path` and the merges to `merges_path`.
pub fn save_vocab_and_merges<P: AsRef<Path>, Q: AsRef<Path>>(
    vocab: &Vocabulary,
    merges: &MergeTable,
    vocab_path: P,
    merges_path: Q,
) -> Result<()> {
    write_file(vocab_path.as_ref(), |writer| write_vocab(vocab, writer))?;
    write_file(merges_path.as_ref(), |writer| write_merges(merges, writer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BpeTokenizer;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn writes_vocab_lines_in_first_occurrence_order() {
        let vocab = Vocabulary::from_lines(["taa ka taa"]);
        let mut out = Vec::new();
        write_vocab(&vocab, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "t a a </w> 2\nk a </w> 1\n");
    }

    #[test]
    fn save_writes_both_files() {
        let tokenizer = BpeTokenizer::learn_bpe(&["taa taa ka"], 2);
        let dir = tempdir().unwrap();
        let vocab_path = dir.path().join("vocab.txt");
        let merges_path = dir.path().join("merges.txt");
        tokenizer.save(&vocab_path, &merges_path).unwrap();

        let merges = fs::read_to_string(&merges_path).unwrap();
        assert_eq!(merges, "a </w>\nt a\n");
        let vocab = fs::read_to_string(&vocab_path).unwrap();
        assert_eq!(vocab, "ta a</w> 2\nk a</w> 1\n");
    }

    #[test]
    fn save_reports_unwritable_path() {
        let tokenizer = BpeTokenizer::new();
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing").join("vocab.txt");
        let err = tokenizer
            .save(&missing, dir.path().join("merges.txt"))
            .expect_err("parent directory does not exist");
        assert!(matches!(err, BpeError::Io { path: Some(path), .. } if path == missing));
    }
}
