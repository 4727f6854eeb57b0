use crate::model::BOUNDARY_MARKER;

/// Symbol-sequence representation of a single word, terminated by [`BOUNDARY_MARKER`]
/// until the marker is absorbed into a merged symbol.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Word {
    symbols: Vec<String>,
}

impl Word {
    /// Splits `word` into one symbol per `char` and appends the boundary marker.
    pub(crate) fn from_word(word: &str) -> Self {
        let mut symbols: Vec<String> = word.chars().map(String::from).collect();
        symbols.push(BOUNDARY_MARKER.to_owned());
        Self { symbols }
    }

    pub(crate) fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub(crate) fn into_symbols(self) -> Vec<String> {
        self.symbols
    }

    /// Returns true when the word contains at least two symbols.
    pub(crate) fn has_pairs(&self) -> bool {
        self.symbols.len() >= 2
    }

    /// Space-joined form used as the vocabulary key.
    pub(crate) fn key(&self) -> String {
        self.symbols.join(" ")
    }

    /// Invokes the provided closure for each adjacent symbol pair, left to right.
    pub(crate) fn for_each_pair<F>(&self, mut f: F)
    where
        F: FnMut(&str, &str),
    {
        for window in self.symbols.windows(2) {
            f(&window[0], &window[1]);
        }
    }

    /// Fuses every non-overlapping `left right` occurrence in a single forward scan and
    /// returns the number of replacements.
    ///
    /// Only whole symbols match: `("a", "b")` never matches inside `"xa" "b"`.
    pub(crate) fn merge(&mut self, left: &str, right: &str) -> usize {
        let original_len = self.symbols.len();
        if original_len < 2 {
            return 0;
        }

        let mut merges = 0usize;
        let mut read = 0usize;
        let mut write = 0usize;
        while read < original_len {
            if read + 1 < original_len
                && self.symbols[read] == left
                && self.symbols[read + 1] == right
            {
                let mut fused = String::with_capacity(left.len() + right.len());
                fused.push_str(left);
                fused.push_str(right);
                self.symbols[write] = fused;
                read += 2;
                merges += 1;
            } else {
                if write != read {
                    self.symbols.swap(write, read);
                }
                read += 1;
            }
            write += 1;
        }

        self.symbols.truncate(write);
        merges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(word: &Word) -> Vec<&str> {
        word.symbols().iter().map(String::as_str).collect()
    }

    #[test]
    fn from_word_splits_chars_and_appends_marker() {
        let word = Word::from_word("bɛ");
        assert_eq!(symbols(&word), vec!["b", "ɛ", "</w>"]);
        assert_eq!(word.key(), "b ɛ </w>");
    }

    #[test]
    fn empty_word_is_only_the_marker() {
        let word = Word::from_word("");
        assert!(!word.has_pairs());
        assert_eq!(symbols(&word), vec!["</w>"]);
    }

    #[test]
    fn merge_replaces_all_pairs() {
        let mut word = Word::from_word("abab");
        let merged = word.merge("a", "b");
        assert_eq!(merged, 2);
        assert_eq!(symbols(&word), vec!["ab", "ab", "</w>"]);
    }

    #[test]
    fn merge_is_non_overlapping_left_to_right() {
        let mut word = Word::from_word("aaa");
        assert_eq!(word.merge("a", "a"), 1);
        assert_eq!(symbols(&word), vec!["aa", "a", "</w>"]);
    }

    #[test]
    fn merge_keeps_non_matching_symbols() {
        let mut word = Word::from_word("xaby");
        word.merge("a", "b");
        assert_eq!(symbols(&word), vec!["x", "ab", "y", "</w>"]);
    }

    #[test]
    fn merge_matches_whole_symbols_only() {
        let mut word = Word::from_word("xab");
        word.merge("x", "a");
        assert_eq!(word.merge("a", "b"), 0);
        assert_eq!(symbols(&word), vec!["xa", "b", "</w>"]);
    }

    #[test]
    fn merge_can_absorb_the_marker() {
        let mut word = Word::from_word("taa");
        word.merge("a", "</w>");
        assert_eq!(symbols(&word), vec!["t", "a", "a</w>"]);
    }

    #[test]
    fn enumerate_pairs_in_order() {
        let word = Word::from_word("ka");
        let mut collected = Vec::new();
        word.for_each_pair(|left, right| collected.push(format!("{left}+{right}")));
        assert_eq!(collected, vec!["k+a", "a+</w>"]);
    }
}
