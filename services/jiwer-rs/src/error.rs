use thiserror::Error;

#[derive(Debug, Error)]
pub enum JiwerError {
    #[error("empty reference: {message}")]
    EmptyReference { message: String },
    #[error(
        "after applying the transforms, the number of reference and hypothesis sentences \
         must match (got {references} reference and {hypotheses} hypothesis sentences)"
    )]
    LengthMismatch { references: usize, hypotheses: usize },
    #[error(
        "empty strings cannot be a word (found in {side} sentence {sentence}); \
         make sure the transform removes empty strings"
    )]
    EmptyToken { side: &'static str, sentence: usize },
    #[error("invalid opcode: {message}")]
    InvalidOpcode { message: String },
    #[error("invalid substitution pattern `{pattern}`: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("invalid weight {weight} for token `{token}`")]
    InvalidWeight { token: String, weight: f64 },
}

impl JiwerError {
    pub(crate) fn empty_reference(message: impl Into<String>) -> Self {
        Self::EmptyReference {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_opcode(message: impl Into<String>) -> Self {
        Self::InvalidOpcode {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_regex(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidRegex {
            pattern: pattern.into(),
            source,
        }
    }
}
