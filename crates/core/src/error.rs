use thiserror::Error;

/// All errors the reading pipeline can produce.
///
/// The pipeline is fail-fast: the first structural violation aborts the whole
/// parse and is reported here. Every variant names the input file; variants
/// raised at a token position also carry the 1-based source line.
#[derive(Debug, Error)]
pub enum LpError {
    /// The input file could not be opened for reading.
    #[error("cannot open '{path}': {source}")]
    UnopenableInput {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A character the lexer cannot start any token with.
    #[error("{file}:{line}: unexpected character '{ch}'")]
    UnexpectedCharacter { file: String, line: u32, ch: char },

    /// A token that is not legal where it appears.
    #[error("{file}:{line}: {message}")]
    UnknownToken {
        file: String,
        line: u32,
        message: String,
    },

    /// The same section keyword was recorded twice.
    #[error("{file}:{line}: duplicate '{section}' section")]
    DuplicateSection {
        file: String,
        line: u32,
        section: &'static str,
    },

    /// A section ended where more tokens were required.
    #[error("{file}:{line}: unexpected end of '{section}' section")]
    UnexpectedEndOfSection {
        file: String,
        line: u32,
        section: &'static str,
    },

    /// Bad quadratic pattern, wrong exponent, illegal sign/bracket
    /// combination, or a constraint row without a usable comparison.
    #[error("{file}:{line}: {message}")]
    MalformedExpression {
        file: String,
        line: u32,
        message: String,
    },

    /// A bounds line matching none of the recognized patterns, or one using
    /// a comparison direction that is not allowed there.
    #[error("{file}:{line}: {message}")]
    MalformedBound {
        file: String,
        line: u32,
        message: String,
    },

    /// A special-ordered-set entry that does not follow `name: type:: var: w`.
    #[error("{file}:{line}: {message}")]
    MalformedSosEntry {
        file: String,
        line: u32,
        message: String,
    },
}
