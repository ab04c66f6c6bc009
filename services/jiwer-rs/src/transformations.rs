//! Ready-made pipelines for the common WER and CER setups.

use crate::transforms::{
    Compose, ExpandCommonEnglishContractions, ReduceToSingleSentence, Reduction,
    RemoveKaldiNonWords, RemoveMultipleSpaces, RemoveWhiteSpace, Strip, ToLowerCase,
};

/// Collapse repeated spaces, trim, split on spaces
pub fn wer_default() -> Compose {
    Compose::new(Reduction::words())
        .then(RemoveMultipleSpaces)
        .then(Strip)
}

/// [`wer_default`] over the whole corpus joined into one sentence.
///
/// Use when the reference and hypothesis sentence counts differ.
pub fn wer_contiguous() -> Compose {
    wer_default().then(ReduceToSingleSentence::default())
}

/// Lower-case, expand contractions and drop Kaldi non-words before [`wer_default`]
pub fn wer_standardize() -> Compose {
    Compose::new(Reduction::words())
        .then(ToLowerCase)
        .then(ExpandCommonEnglishContractions)
        .then(RemoveKaldiNonWords)
        .then(RemoveWhiteSpace::new(true))
        .then(RemoveMultipleSpaces)
        .then(Strip)
}

pub fn wer_standardize_contiguous() -> Compose {
    wer_standardize().then(ReduceToSingleSentence::default())
}

/// Trim, then one token per character
pub fn cer_default() -> Compose {
    Compose::new(Reduction::Chars).then(Strip)
}

pub fn cer_contiguous() -> Compose {
    cer_default().then(ReduceToSingleSentence::default())
}

/// Look up a preset by its function name
pub fn preset(name: &str) -> Option<Compose> {
    match name {
        "wer_default" => Some(wer_default()),
        "wer_contiguous" => Some(wer_contiguous()),
        "wer_standardize" => Some(wer_standardize()),
        "wer_standardize_contiguous" => Some(wer_standardize_contiguous()),
        "cer_default" => Some(cer_default()),
        "cer_contiguous" => Some(cer_contiguous()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_wer_default() {
        assert_eq!(
            wer_default().apply(strings(&["  hello   world ", "again"])),
            vec![strings(&["hello", "world"]), strings(&["again"])]
        );
    }

    #[test]
    fn test_contiguous_joins_sentences() {
        assert_eq!(
            wer_contiguous().apply(strings(&["one two", "", "three"])),
            vec![strings(&["one", "two", "three"])]
        );
        assert_eq!(
            cer_contiguous().apply(strings(&[" ab", "c "])),
            vec![strings(&["a", "b", " ", "c"])]
        );
    }

    #[test]
    fn test_wer_standardize() {
        assert_eq!(
            wer_standardize().apply(strings(&["He's  <unk> HERE\tnow [noise]"])),
            vec![strings(&["he", "is", "here", "now"])]
        );
    }

    #[test]
    fn test_preset_lookup() {
        assert_eq!(preset("cer_default").map(|c| c.len()), Some(1));
        assert_eq!(
            preset("wer_standardize_contiguous").map(|c| c.len()),
            Some(7)
        );
        assert!(preset("wer_fancy").is_none());
    }
}
