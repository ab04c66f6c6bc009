use crate::align::TieBreak;
use crate::transformations::{cer_default, wer_default};
use crate::transforms::Compose;

/// Settings for one `process_*` call.
///
/// Values are immutable once built; derive variants with the `with_*` methods.
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub reference_transform: Compose,
    pub hypothesis_transform: Compose,
    pub tie_break: TieBreak,
    /// Align sentence pairs on the rayon pool
    pub parallel: bool,
}

impl ProcessConfig {
    /// Corpora with fewer sentence pairs than this are aligned on the calling thread
    pub const PARALLEL_MIN_SENTENCES: usize = 2;

    /// Default word-level pipeline on both sides
    pub fn words() -> Self {
        Self::with_transform(wer_default())
    }

    /// Default character-level pipeline on both sides
    pub fn characters() -> Self {
        Self::with_transform(cer_default())
    }

    /// The same pipeline on both sides
    pub fn with_transform(transform: Compose) -> Self {
        Self {
            reference_transform: transform.clone(),
            hypothesis_transform: transform,
            tie_break: TieBreak::default(),
            parallel: true,
        }
    }

    pub fn with_reference_transform(mut self, transform: Compose) -> Self {
        self.reference_transform = transform;
        self
    }

    pub fn with_hypothesis_transform(mut self, transform: Compose) -> Self {
        self.hypothesis_transform = transform;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self::words()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::Reduction;

    #[test]
    fn process_config_default() {
        let config = ProcessConfig::default();
        assert_eq!(config.tie_break, TieBreak::DeletionFirst);
        assert!(config.parallel);
        assert_eq!(config.reference_transform.reduction(), &Reduction::words());
        assert_eq!(config.hypothesis_transform.len(), 2);
    }

    #[test]
    fn process_config_builders() {
        let config = ProcessConfig::characters()
            .with_hypothesis_transform(wer_default())
            .with_tie_break(TieBreak::DiagonalFirst)
            .with_parallel(false);

        assert_eq!(config.reference_transform.reduction(), &Reduction::Chars);
        assert_eq!(config.hypothesis_transform.reduction(), &Reduction::words());
        assert_eq!(config.tie_break, TieBreak::DiagonalFirst);
        assert!(!config.parallel);
    }
}
