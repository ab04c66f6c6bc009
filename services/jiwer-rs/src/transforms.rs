//! Normalization steps that rewrite raw sentences before they are tokenized.
//!
//! A [`Compose`] pipeline applies its steps to the whole list of sentences in
//! order and finishes with a [`Reduction`], which splits every sentence into
//! tokens (words, characters or graphemes).

use std::fmt::Debug;
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::{NoExpand, Regex};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::JiwerError;

lazy_static! {
    static ref MULTIPLE_SPACES: Regex = Regex::new(r"\s\s+").expect("Invalid regex");
    static ref KALDI_NON_WORD: Regex = Regex::new(r"[<\[][^>\]]*[>\]]").expect("Invalid regex");
    static ref PUNCTUATION: Regex = Regex::new(r"\p{P}").expect("Invalid regex");
}

/// ASCII whitespace removed by [`RemoveWhiteSpace`]
const WHITESPACE: [char; 6] = [' ', '\t', '\n', '\r', '\x0b', '\x0c'];

/// Applied in order; the specific forms must run before the generic suffixes.
const CONTRACTIONS: [(&str, &str); 11] = [
    ("won't", "will not"),
    ("can't", "can not"),
    ("let's", "let us"),
    ("n't", " not"),
    ("'re", " are"),
    ("'s", " is"),
    ("'d", " would"),
    ("'ll", " will"),
    ("'t", " not"),
    ("'ve", " have"),
    ("'m", " am"),
];

/// One normalization step over a list of sentences
pub trait Transform: Send + Sync + Debug {
    fn process_string(&self, s: &str) -> String;

    fn process_list(&self, sentences: Vec<String>) -> Vec<String> {
        sentences.iter().map(|s| self.process_string(s)).collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ToLowerCase;

impl Transform for ToLowerCase {
    fn process_string(&self, s: &str) -> String {
        s.to_lowercase()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ToUpperCase;

impl Transform for ToUpperCase {
    fn process_string(&self, s: &str) -> String {
        s.to_uppercase()
    }
}

/// Remove leading and trailing whitespace
#[derive(Debug, Clone, Copy, Default)]
pub struct Strip;

impl Transform for Strip {
    fn process_string(&self, s: &str) -> String {
        s.trim().to_string()
    }
}

/// Collapse every run of two or more whitespace characters into one space
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveMultipleSpaces;

impl Transform for RemoveMultipleSpaces {
    fn process_string(&self, s: &str) -> String {
        MULTIPLE_SPACES.replace_all(s, " ").into_owned()
    }
}

/// Delete whitespace characters, or turn each of them into a plain space.
///
/// Without `replace_by_space` the words of a sentence run together, so a word
/// reduction afterwards sees a single token.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveWhiteSpace {
    pub replace_by_space: bool,
}

impl RemoveWhiteSpace {
    pub fn new(replace_by_space: bool) -> Self {
        Self { replace_by_space }
    }
}

impl Transform for RemoveWhiteSpace {
    fn process_string(&self, s: &str) -> String {
        if self.replace_by_space {
            s.chars()
                .map(|c| if WHITESPACE.contains(&c) { ' ' } else { c })
                .collect()
        } else {
            s.chars().filter(|c| !WHITESPACE.contains(c)).collect()
        }
    }
}

/// Delete every character of a Unicode punctuation category (`P*`)
#[derive(Debug, Clone, Copy, Default)]
pub struct RemovePunctuation;

impl Transform for RemovePunctuation {
    fn process_string(&self, s: &str) -> String {
        PUNCTUATION.replace_all(s, "").into_owned()
    }
}

/// Drop sentences that are empty or whitespace only
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveEmptyStrings;

impl Transform for RemoveEmptyStrings {
    fn process_string(&self, s: &str) -> String {
        s.trim().to_string()
    }

    fn process_list(&self, sentences: Vec<String>) -> Vec<String> {
        sentences
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .collect()
    }
}

/// Remove Kaldi non-words such as `[laugh]` or `<unk>`
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveKaldiNonWords;

impl Transform for RemoveKaldiNonWords {
    fn process_string(&self, s: &str) -> String {
        KALDI_NON_WORD.replace_all(s, "").into_owned()
    }
}

/// Expand `won't`, `can't`, `let's` and the common `n't`, `'re`, `'s`, `'d`,
/// `'ll`, `'t`, `'ve`, `'m` suffixes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpandCommonEnglishContractions;

impl Transform for ExpandCommonEnglishContractions {
    fn process_string(&self, s: &str) -> String {
        CONTRACTIONS
            .iter()
            .fold(s.to_string(), |acc, (from, to)| acc.replace(from, to))
    }
}

/// Replace whole words only; `foo` does not touch `foobar`.
///
/// Substitutions are applied one after another in the given order and the
/// replacement text is inserted literally.
#[derive(Debug, Clone)]
pub struct SubstituteWords {
    rules: Vec<(Regex, String)>,
}

impl SubstituteWords {
    pub fn new<I, K, V>(substitutions: I) -> Result<Self, JiwerError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let rules = substitutions
            .into_iter()
            .map(|(word, replacement)| {
                let pattern = format!(r"\b{}\b", regex::escape(word.as_ref()));
                Regex::new(&pattern)
                    .map(|re| (re, replacement.into()))
                    .map_err(|e| JiwerError::invalid_regex(pattern, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rules })
    }
}

impl Transform for SubstituteWords {
    fn process_string(&self, s: &str) -> String {
        self.rules.iter().fold(s.to_string(), |acc, (re, replacement)| {
            re.replace_all(&acc, NoExpand(replacement)).into_owned()
        })
    }
}

/// Replace whole words with a single space.
///
/// Follow with [`RemoveMultipleSpaces`] and [`Strip`] to clean up the gaps.
#[derive(Debug, Clone)]
pub struct RemoveSpecificWords {
    inner: SubstituteWords,
}

impl RemoveSpecificWords {
    pub fn new<I, W>(words: I) -> Result<Self, JiwerError>
    where
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        let inner = SubstituteWords::new(words.into_iter().map(|w| (w, " ")))?;
        Ok(Self { inner })
    }
}

impl Transform for RemoveSpecificWords {
    fn process_string(&self, s: &str) -> String {
        self.inner.process_string(s)
    }
}

/// Regex substitutions; replacements may reference groups as `$1` or `${name}`
#[derive(Debug, Clone)]
pub struct SubstituteRegexes {
    rules: Vec<(Regex, String)>,
}

impl SubstituteRegexes {
    pub fn new<I, K, V>(substitutions: I) -> Result<Self, JiwerError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let rules = substitutions
            .into_iter()
            .map(|(pattern, replacement)| {
                let pattern = pattern.as_ref();
                Regex::new(pattern)
                    .map(|re| (re, replacement.into()))
                    .map_err(|e| JiwerError::invalid_regex(pattern, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rules })
    }
}

impl Transform for SubstituteRegexes {
    fn process_string(&self, s: &str) -> String {
        self.rules.iter().fold(s.to_string(), |acc, (re, replacement)| {
            re.replace_all(&acc, replacement.as_str()).into_owned()
        })
    }
}

/// Join all non-empty sentences into one, for corpora whose sentence counts differ
#[derive(Debug, Clone)]
pub struct ReduceToSingleSentence {
    pub delimiter: String,
}

impl ReduceToSingleSentence {
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
        }
    }
}

impl Default for ReduceToSingleSentence {
    fn default() -> Self {
        Self::new(" ")
    }
}

impl Transform for ReduceToSingleSentence {
    fn process_string(&self, s: &str) -> String {
        s.to_string()
    }

    fn process_list(&self, sentences: Vec<String>) -> Vec<String> {
        let kept: Vec<String> = sentences.into_iter().filter(|s| !s.is_empty()).collect();
        if kept.is_empty() {
            return Vec::new();
        }
        vec![kept.join(&self.delimiter)]
    }
}

/// Final step of a pipeline: split each sentence into tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reduction {
    /// Split on a delimiter, dropping empty pieces
    Words { delimiter: String },
    /// One token per `char`
    Chars,
    /// One token per extended grapheme cluster
    Graphemes,
}

impl Reduction {
    pub fn words() -> Self {
        Reduction::Words {
            delimiter: " ".to_string(),
        }
    }

    pub fn reduce_string(&self, s: &str) -> Vec<String> {
        match self {
            Reduction::Words { delimiter } if delimiter.is_empty() => {
                s.split_whitespace().map(str::to_string).collect()
            }
            Reduction::Words { delimiter } => s
                .split(delimiter.as_str())
                .filter(|w| !w.is_empty())
                .map(str::to_string)
                .collect(),
            Reduction::Chars => s.chars().map(String::from).collect(),
            Reduction::Graphemes => s.graphemes(true).map(str::to_string).collect(),
        }
    }

    /// An empty list of sentences reduces to a single empty sentence
    pub fn reduce(&self, sentences: &[String]) -> Vec<Vec<String>> {
        if sentences.is_empty() {
            return vec![Vec::new()];
        }
        sentences.iter().map(|s| self.reduce_string(s)).collect()
    }
}

impl Default for Reduction {
    fn default() -> Self {
        Self::words()
    }
}

/// Ordered normalization steps followed by a tokenizing [`Reduction`].
///
/// Cloning is cheap; steps are shared behind `Arc`.
#[derive(Debug, Clone)]
pub struct Compose {
    steps: Vec<Arc<dyn Transform>>,
    reduction: Reduction,
}

impl Compose {
    pub fn new(reduction: Reduction) -> Self {
        Self {
            steps: Vec::new(),
            reduction,
        }
    }

    /// Append a step
    pub fn then<T: Transform + 'static>(mut self, step: T) -> Self {
        self.steps.push(Arc::new(step));
        self
    }

    pub fn reduction(&self) -> &Reduction {
        &self.reduction
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step over the sentences, then tokenize them
    pub fn apply(&self, sentences: Vec<String>) -> Vec<Vec<String>> {
        let sentences = self
            .steps
            .iter()
            .fold(sentences, |acc, step| step.process_list(acc));
        self.reduction.reduce(&sentences)
    }
}
