//! Byte pair encoding (BPE) tokenizer library and CLI for Bamanankan (Bambara) text.
//!
//! Training builds a word-frequency vocabulary where each word is split into characters plus
//! an end-of-word marker (`</w>`), then repeatedly fuses the most frequent adjacent symbol
//! pair.  The learned merge table drives encoding; decoding uses the marker tokens to restore
//! spaces.  Text is never normalised, so diacritics (`ɛ`, `ɔ`, `ɲ`) and apostrophes survive
//! untouched.
//!
//! ```no_run
//! use bambara_bpe::{IngestConfig, Trainer, TrainerConfig};
//!
//! # fn main() -> bambara_bpe::Result<()> {
//! let trainer_cfg = TrainerConfig::builder()
//!     .num_merges(1000)
//!     .show_progress(false)
//!     .build()?;
//! let trainer = Trainer::new(trainer_cfg);
//! let artifacts = trainer.train_from_paths(&["/path/to/corpus.txt"], &IngestConfig::default())?;
//! let mut tokenizer = artifacts.tokenizer;
//! let tokens = tokenizer.encode("A bɛ taa");
//! assert_eq!(tokenizer.decode(&tokens), "A bɛ taa");
//! tokenizer.save("vocab.txt", "merges.txt")?;
//! # Ok(())
//! # }
//! ```
//!
//! The CLI is enabled by default through the `cli` feature.  Users targeting the
//! library portion only can disable default features to avoid the CLI
//! dependencies: `bambara-bpe = { version = "...", default-features = false }`.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    clippy::all,
    rust_2018_idioms,
    future_incompatible,
    unused_lifetimes,
    unreachable_pub
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::doc_markdown
)]

pub mod config;
pub mod corpus;
pub mod error;
pub mod metrics;
pub mod model;
mod pairs;
pub mod serialization;
pub mod trainer;
pub mod vocab;

pub use config::{IngestConfig, TrainerBuilder, TrainerConfig};
pub use error::{BpeError, Result};
pub use metrics::{IterationMetrics, StopReason, TrainingMetrics};
pub use model::{decode_tokens, BpeTokenizer, MergeTable, Rank, BOUNDARY_MARKER};
pub use trainer::{compute_pair_stats, PairStats, Trainer, TrainerArtifacts};
pub use vocab::Vocabulary;
