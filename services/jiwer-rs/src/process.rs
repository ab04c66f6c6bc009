//! Entry points turning raw sentences into aligned, measured outputs.

use crate::align::Aligner;
use crate::config::ProcessConfig;
use crate::error::JiwerError;
use crate::measures::{ErrorCounts, Measures};
use crate::types::{AlignmentChunk, CharacterOutput, WordOutput};
use crate::vocab::encode_corpus;

/// One sentence or a list of sentences
pub trait IntoSentences {
    fn into_sentences(self) -> Vec<String>;
}

impl IntoSentences for &str {
    fn into_sentences(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoSentences for String {
    fn into_sentences(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoSentences for &String {
    fn into_sentences(self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl<S: AsRef<str>> IntoSentences for Vec<S> {
    fn into_sentences(self) -> Vec<String> {
        self.iter().map(|s| s.as_ref().to_string()).collect()
    }
}

impl<S: AsRef<str>> IntoSentences for &Vec<S> {
    fn into_sentences(self) -> Vec<String> {
        self.as_slice().into_sentences()
    }
}

impl<S: AsRef<str>> IntoSentences for &[S] {
    fn into_sentences(self) -> Vec<String> {
        self.iter().map(|s| s.as_ref().to_string()).collect()
    }
}

impl<S: AsRef<str>, const N: usize> IntoSentences for [S; N] {
    fn into_sentences(self) -> Vec<String> {
        self.iter().map(|s| s.as_ref().to_string()).collect()
    }
}

impl<S: AsRef<str>, const N: usize> IntoSentences for &[S; N] {
    fn into_sentences(self) -> Vec<String> {
        self.as_slice().into_sentences()
    }
}

/// Tokenized corpus with its per-sentence alignments
#[derive(Debug)]
pub(crate) struct AlignedCorpus {
    pub references: Vec<Vec<String>>,
    pub hypotheses: Vec<Vec<String>>,
    pub alignments: Vec<Vec<AlignmentChunk>>,
}

impl AlignedCorpus {
    pub fn counts(&self) -> ErrorCounts {
        self.alignments
            .iter()
            .map(|chunks| ErrorCounts::from_chunks(chunks))
            .sum()
    }
}

/// Validate, normalize, encode and align a corpus
pub(crate) fn align_sentences(
    reference: Vec<String>,
    hypothesis: Vec<String>,
    config: &ProcessConfig,
) -> Result<AlignedCorpus, JiwerError> {
    if reference.iter().any(String::is_empty) {
        return Err(JiwerError::empty_reference(
            "one or more reference strings are empty",
        ));
    }

    let references = config.reference_transform.apply(reference);
    let hypotheses = config.hypothesis_transform.apply(hypothesis);

    if let Some(idx) = references.iter().position(Vec::is_empty) {
        return Err(JiwerError::empty_reference(format!(
            "reference sentence {idx} has no tokens after applying the transforms"
        )));
    }
    if references.len() != hypotheses.len() {
        return Err(JiwerError::LengthMismatch {
            references: references.len(),
            hypotheses: hypotheses.len(),
        });
    }

    let (reference_ids, hypothesis_ids) = encode_corpus(&references, &hypotheses)?;

    let parallel =
        config.parallel && reference_ids.len() >= ProcessConfig::PARALLEL_MIN_SENTENCES;
    let alignments = Aligner::new(config.tie_break).align_corpus(
        &reference_ids,
        &hypothesis_ids,
        parallel,
    );

    for chunk in alignments.iter().flatten() {
        chunk.validate()?;
    }

    tracing::debug!(
        sentences = references.len(),
        chunks = alignments.iter().map(Vec::len).sum::<usize>(),
        parallel,
        "aligned corpus"
    );

    Ok(AlignedCorpus {
        references,
        hypotheses,
        alignments,
    })
}

/// Word-level alignment and measures with the default word pipeline
pub fn process_words(
    reference: impl IntoSentences,
    hypothesis: impl IntoSentences,
) -> Result<WordOutput, JiwerError> {
    process_words_with(reference, hypothesis, &ProcessConfig::words())
}

pub fn process_words_with(
    reference: impl IntoSentences,
    hypothesis: impl IntoSentences,
    config: &ProcessConfig,
) -> Result<WordOutput, JiwerError> {
    let corpus = align_sentences(
        reference.into_sentences(),
        hypothesis.into_sentences(),
        config,
    )?;
    let counts = corpus.counts();
    let measures = Measures::from_counts(&counts)?;

    Ok(WordOutput {
        references: corpus.references,
        hypotheses: corpus.hypotheses,
        alignments: corpus.alignments,
        wer: measures.wer,
        mer: measures.mer,
        wil: measures.wil,
        wip: measures.wip,
        hits: counts.hits,
        substitutions: counts.substitutions,
        insertions: counts.insertions,
        deletions: counts.deletions,
    })
}

/// Character-level alignment and CER with the default character pipeline
pub fn process_characters(
    reference: impl IntoSentences,
    hypothesis: impl IntoSentences,
) -> Result<CharacterOutput, JiwerError> {
    process_characters_with(reference, hypothesis, &ProcessConfig::characters())
}

/// Character-level processing; `config` should reduce sentences to characters
pub fn process_characters_with(
    reference: impl IntoSentences,
    hypothesis: impl IntoSentences,
    config: &ProcessConfig,
) -> Result<CharacterOutput, JiwerError> {
    process_words_with(reference, hypothesis, config).map(CharacterOutput::from)
}
