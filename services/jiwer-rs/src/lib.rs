//! jiwer core: word and character error rates over edit-distance alignments.
//!
//! Provides:
//! - Normalization pipelines reducing raw sentences to tokens
//! - Corpus-wide token vocabularies and unit-cost Levenshtein alignment
//! - WER, MER, WIL, WIP and CER, plain or with weighted reference tokens
//! - Text reports of alignments and error frequencies
//!
//! ```no_run
//! let output = jiwer_core::process_words("hello world", "hello duck").unwrap();
//! assert_eq!(output.substitutions, 1);
//! assert_eq!(output.wer, 0.5);
//! ```

pub mod align;
pub mod config;
pub mod error;
pub mod measures;
pub mod process;
pub mod transformations;
pub mod transforms;
pub mod types;
pub mod visualize;
pub mod vocab;
pub mod weighted;

pub use align::{Aligner, TieBreak};
pub use config::ProcessConfig;
pub use error::JiwerError;
pub use measures::{cer, mer, wer, wil, wip, ErrorCounts, Measures};
pub use process::{
    process_characters, process_characters_with, process_words, process_words_with,
    IntoSentences,
};
pub use transforms::{Compose, Reduction, Transform};
pub use types::{AlignmentChunk, CharacterOutput, EditOp, WordOutput};
pub use visualize::{
    collect_error_counts, visualize_alignment, visualize_error_counts, ErrorCountOptions,
    VisualizeOptions,
};
pub use weighted::{process_words_weighted, TokenWeights, WeightedWordOutput};
