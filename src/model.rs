//! Trained tokenizer: merge table, vocabulary, encoder and decoder.

use std::path::Path;

use log::debug;
use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::pairs::PairIndex;
use crate::serialization::save_vocab_and_merges;
use crate::trainer::learn_merges;
use crate::trainer::word::Word;
use crate::vocab::Vocabulary;

/// End-of-word symbol appended to every word before merging.
pub const BOUNDARY_MARKER: &str = "</w>";

/// Merge priority; lower ranks were learned earlier and are applied first.
pub type Rank = u32;

/// Ordered `(left, right)` symbol pair.
pub type SymbolPair = (String, String);

/// Learned merges in rank order, with constant-time rank lookup.
#[derive(Debug, Clone, Default)]
pub struct MergeTable {
    merges: Vec<(SymbolPair, Rank)>,
    ranks: PairIndex<Rank>,
}

impl MergeTable {
    /// Creates an empty merge table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `left right` at `rank` and returns the rank the pair ends up with.
    ///
    /// Ranks must be pushed in increasing order.  A pair that is learned a second time keeps
    /// its original, higher-priority rank.
    pub(crate) fn push(&mut self, left: &str, right: &str, rank: Rank) -> Rank {
        debug_assert!(self.merges.last().map_or(true, |(_, last)| *last < rank));
        let stored = self.ranks.get_or_insert(left, right, rank);
        if stored == rank {
            self.merges
                .push(((left.to_owned(), right.to_owned()), rank));
        }
        stored
    }

    /// Returns the rank of `left right`, or `None` if the pair was never learned.
    #[must_use]
    pub fn rank(&self, left: &str, right: &str) -> Option<Rank> {
        self.ranks.get(left, right)
    }

    /// Number of distinct learned merges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.merges.len()
    }

    /// Returns true when nothing has been learned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.merges.is_empty()
    }

    /// Iterates `(left, right, rank)` in increasing rank order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, Rank)> + '_ {
        self.merges
            .iter()
            .map(|((left, right), rank)| (left.as_str(), right.as_str(), *rank))
    }

    /// Splits a single word into subword tokens.  Never fails; see [`BpeTokenizer::encode_word`].
    fn apply(&self, text: &str) -> Vec<String> {
        let mut word = Word::from_word(text);
        while word.has_pairs() {
            let best = word
                .symbols()
                .windows(2)
                .enumerate()
                .filter_map(|(idx, pair)| self.rank(&pair[0], &pair[1]).map(|rank| (rank, idx)))
                .min();
            let Some((_, idx)) = best else {
                break;
            };
            let left = word.symbols()[idx].clone();
            let right = word.symbols()[idx + 1].clone();
            word.merge(&left, &right);
        }

        let mut tokens: Vec<String> = word
            .into_symbols()
            .into_iter()
            .map(|symbol| match symbol.strip_suffix(BOUNDARY_MARKER) {
                Some(stem) => stem.to_owned(),
                None => symbol,
            })
            .collect();
        while tokens.last().is_some_and(String::is_empty) {
            tokens.pop();
        }

        if covers_exactly(&tokens, text) {
            tokens
        } else {
            debug!("falling back to characters for {text:?}; merged tokens were {tokens:?}");
            text.chars().map(String::from).collect()
        }
    }
}

/// Checks that `tokens` rebuild `text` and can be decoded unambiguously.
fn covers_exactly(tokens: &[String], text: &str) -> bool {
    tokens
        .iter()
        .all(|token| !token.is_empty() && !token.ends_with(BOUNDARY_MARKER))
        && tokens.concat() == text
}

/// Byte pair encoding tokenizer owning its vocabulary, merge table and encode cache.
///
/// A tokenizer is built once, by training, and then only read: encoding fills the
/// per-instance cache, which is why it takes `&mut self`.  The cache is unbounded and lives
/// as long as the tokenizer.
///
/// ```
/// use bambara_bpe::BpeTokenizer;
///
/// let mut tokenizer = BpeTokenizer::learn_bpe(&["A bɛ taa", "N'a fɛ ka kɛ nyɛ"], 50);
/// let tokens = tokenizer.encode("A bɛ taa");
/// assert_eq!(tokenizer.decode(&tokens), "A bɛ taa");
/// ```
#[must_use]
#[derive(Debug, Clone, Default)]
pub struct BpeTokenizer {
    vocab: Vocabulary,
    merges: MergeTable,
    cache: FxHashMap<String, Vec<String>>,
}

impl BpeTokenizer {
    /// Creates an untrained tokenizer; it encodes every word as characters.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(vocab: Vocabulary, merges: MergeTable) -> Self {
        Self {
            vocab,
            merges,
            cache: FxHashMap::default(),
        }
    }

    /// Learns up to `num_merges` merges from `corpus` lines.
    ///
    /// Stops early, without error, once no adjacent pair remains.  Use
    /// [`Trainer`](crate::Trainer) for progress logging and metrics.
    pub fn learn_bpe<S: AsRef<str>>(corpus: &[S], num_merges: usize) -> Self {
        let limit = Rank::try_from(num_merges).unwrap_or(Rank::MAX);
        let mut vocab = Vocabulary::from_lines(corpus);
        let (merges, _) = learn_merges(&mut vocab, limit, false);
        Self::from_parts(vocab, merges)
    }

    /// Vocabulary as rewritten by the final merge.
    #[must_use]
    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Learned merges in rank order.
    #[must_use]
    pub fn merges(&self) -> &MergeTable {
        &self.merges
    }

    /// Rank of `left right`, if learned.
    #[must_use]
    pub fn rank(&self, left: &str, right: &str) -> Option<Rank> {
        self.merges.rank(left, right)
    }

    /// Number of distinct learned merges.
    #[must_use]
    pub fn num_merges(&self) -> usize {
        self.merges.len()
    }

    /// Number of words memoised by [`encode_word`](Self::encode_word).
    #[must_use]
    pub fn cached_words(&self) -> usize {
        self.cache.len()
    }

    /// Encodes one word (no whitespace) into subword tokens.
    ///
    /// Merges are applied lowest rank first until none applies.  The boundary marker is then
    /// stripped from the final token.  If the tokens would not concatenate back to `word`, the
    /// word is split into characters instead, so encoding never loses text.
    pub fn encode_word(&mut self, word: &str) -> Vec<String> {
        if let Some(tokens) = self.cache.get(word) {
            return tokens.clone();
        }
        let tokens = self.merges.apply(word);
        self.cache.insert(word.to_owned(), tokens.clone());
        tokens
    }

    /// Encodes whitespace-separated text, emitting [`BOUNDARY_MARKER`] after each word.
    pub fn encode(&mut self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        for word in text.split_whitespace() {
            tokens.extend(self.encode_word(word));
            tokens.push(BOUNDARY_MARKER.to_owned());
        }
        tokens
    }

    /// Rebuilds text from a token stream.  See [`decode_tokens`].
    #[must_use]
    pub fn decode<S: AsRef<str>>(&self, tokens: &[S]) -> String {
        decode_tokens(tokens)
    }

    /// Writes the vocabulary and the merge table as plain text.
    ///
    /// `vocab_path` gets one `"<representation> <frequency>"` line per entry in
    /// first-occurrence order; `merges_path` gets one `"<left> <right>"` line per merge in rank
    /// order.
    pub fn save<P: AsRef<Path>, Q: AsRef<Path>>(&self, vocab_path: P, merges_path: Q) -> Result<()> {
        save_vocab_and_merges(&self.vocab, &self.merges, vocab_path, merges_path)
    }
}

/// Reassembles words from tokens.
///
/// A bare [`BOUNDARY_MARKER`] token closes the current word; a token ending with the marker
/// closes the word after the marker is stripped.  Words are joined with single spaces and
/// the result is trimmed.  Tokens are never validated against a merge table.
#[must_use]
pub fn decode_tokens<S: AsRef<str>>(tokens: &[S]) -> String {
    let mut words = Vec::new();
    let mut current = String::new();
    for token in tokens {
        let token = token.as_ref();
        if token == BOUNDARY_MARKER {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        } else if let Some(stem) = token.strip_suffix(BOUNDARY_MARKER) {
            current.push_str(stem);
            words.push(std::mem::take(&mut current));
        } else {
            current.push_str(token);
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words.join(" ").trim().to_owned()
}
