//! Word-frequency vocabulary built from a raw text corpus.

use rustc_hash::FxHashMap;

use crate::trainer::word::Word;

#[derive(Debug, Clone)]
struct Entry {
    word: Word,
    key: String,
    count: usize,
}

/// Frequency table over symbol-sequence word representations.
///
/// Entries iterate in order of first occurrence in the corpus; that order decides ties when
/// the trainer picks the most frequent pair.  Keys are the symbols joined by single spaces,
/// e.g. `"b ɛ </w>"`.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    entries: Vec<Entry>,
    index: FxHashMap<String, usize>,
}

impl Vocabulary {
    /// Creates an empty vocabulary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a vocabulary from corpus lines, splitting each line on whitespace.
    ///
    /// No normalisation is applied: case, diacritics and apostrophes are kept as-is.
    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut vocab = Self::new();
        for line in lines {
            for word in line.as_ref().split_whitespace() {
                vocab.add_word(word);
            }
        }
        vocab
    }

    /// Counts one occurrence of `word`. Empty words are ignored.
    pub fn add_word(&mut self, word: &str) {
        if word.is_empty() {
            return;
        }
        let word = Word::from_word(word);
        let key = word.key();
        if let Some(&idx) = self.index.get(&key) {
            self.entries[idx].count += 1;
            return;
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push(Entry {
            word,
            key,
            count: 1,
        });
    }

    /// Number of distinct word representations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no words have been counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Frequency of the representation `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<usize> {
        self.index.get(key).map(|&idx| self.entries[idx].count)
    }

    /// Iterates `(representation, frequency)` in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.entries
            .iter()
            .map(|entry| (entry.key.as_str(), entry.count))
    }

    /// Total number of symbols across the corpus, weighting each entry by its frequency.
    #[must_use]
    pub fn total_symbols(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| entry.word.symbols().len() * entry.count)
            .sum()
    }

    pub(crate) fn words(&self) -> impl Iterator<Item = (&Word, usize)> + '_ {
        self.entries.iter().map(|entry| (&entry.word, entry.count))
    }

    /// Fuses `left right` in every entry and returns the number of occurrences replaced,
    /// weighted by frequency.
    pub(crate) fn merge_pair(&mut self, left: &str, right: &str) -> usize {
        let mut replaced = 0usize;
        let mut rekeyed = false;
        for entry in &mut self.entries {
            let merges = entry.word.merge(left, right);
            if merges > 0 {
                entry.key = entry.word.key();
                replaced += merges * entry.count;
                rekeyed = true;
            }
        }
        // Merging never changes a word's concatenated text, so keys stay unique.
        if rekeyed {
            self.index.clear();
            for (idx, entry) in self.entries.iter().enumerate() {
                self.index.insert(entry.key.clone(), idx);
            }
        }
        replaced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_character_representations_with_marker() {
        let vocab = Vocabulary::from_lines(["A bɛ taa"]);
        let entries: Vec<_> = vocab.iter().collect();
        assert_eq!(
            entries,
            vec![("A </w>", 1), ("b ɛ </w>", 1), ("t a a </w>", 1)]
        );
    }

    #[test]
    fn counts_repeated_words_and_keeps_first_occurrence_order() {
        let vocab = Vocabulary::from_lines(["ka taa ka", "  ", "", "taa  ka"]);
        let entries: Vec<_> = vocab.iter().collect();
        assert_eq!(entries, vec![("k a </w>", 3), ("t a a </w>", 2)]);
        assert_eq!(vocab.get("k a </w>"), Some(3));
        assert_eq!(vocab.get("missing </w>"), None);
    }

    #[test]
    fn keeps_apostrophes_and_case() {
        let vocab = Vocabulary::from_lines(["N'a n'a"]);
        let keys: Vec<_> = vocab.iter().map(|(key, _)| key.to_owned()).collect();
        assert_eq!(keys, vec!["N ' a </w>", "n ' a </w>"]);
    }

    #[test]
    fn empty_corpus_gives_empty_vocabulary() {
        let vocab = Vocabulary::from_lines(Vec::<String>::new());
        assert!(vocab.is_empty());
        assert_eq!(vocab.total_symbols(), 0);
    }

    #[test]
    fn merge_pair_rewrites_keys_and_preserves_counts() {
        let mut vocab = Vocabulary::from_lines(["taa taa ka"]);
        let replaced = vocab.merge_pair("a", "</w>");
        assert_eq!(replaced, 3);
        let entries: Vec<_> = vocab.iter().collect();
        assert_eq!(entries, vec![("t a a</w>", 2), ("k a</w>", 1)]);
        assert_eq!(vocab.get("t a a</w>"), Some(2));
        assert_eq!(vocab.get("t a a </w>"), None);
    }
}
