//! Corpus-wide token to integer mapping.

use rustc_hash::FxHashMap;

use crate::error::JiwerError;

/// Dense integer id of a distinct token within one corpus
pub type TokenId = usize;

/// Token ids assigned in first-seen order over references, then hypotheses.
///
/// The mapping lives only as long as the sentences it borrows from.
#[derive(Debug, Default)]
pub struct Vocabulary<'a> {
    ids: FxHashMap<&'a str, TokenId>,
}

impl<'a> Vocabulary<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or assign the id of a token
    pub fn intern(&mut self, token: &'a str) -> TokenId {
        let next = self.ids.len();
        *self.ids.entry(token).or_insert(next)
    }

    pub fn get(&self, token: &str) -> Option<TokenId> {
        self.ids.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn encode_side(
        &mut self,
        sentences: &'a [Vec<String>],
        side: &'static str,
    ) -> Result<Vec<Vec<TokenId>>, JiwerError> {
        sentences
            .iter()
            .enumerate()
            .map(|(sentence, tokens)| {
                tokens
                    .iter()
                    .map(|token| {
                        if token.is_empty() {
                            Err(JiwerError::EmptyToken { side, sentence })
                        } else {
                            Ok(self.intern(token))
                        }
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect()
    }
}

/// Encoded reference and hypothesis sentences sharing one vocabulary
pub type EncodedCorpus = (Vec<Vec<TokenId>>, Vec<Vec<TokenId>>);

/// Map every token of both corpora to its integer id.
///
/// Fails with [`JiwerError::EmptyToken`] when a sentence contains an empty string.
pub fn encode_corpus(
    references: &[Vec<String>],
    hypotheses: &[Vec<String>],
) -> Result<EncodedCorpus, JiwerError> {
    let mut vocabulary = Vocabulary::new();
    let reference_ids = vocabulary.encode_side(references, "reference")?;
    let hypothesis_ids = vocabulary.encode_side(hypotheses, "hypothesis")?;

    tracing::debug!(
        vocabulary_size = vocabulary.len(),
        sentences = references.len(),
        "encoded corpus"
    );

    Ok((reference_ids, hypothesis_ids))
}
