use thiserror::Error;

/// Errors raised while building a variant graph or configuring a search.
///
/// An absent link is not an error during search: the bound calculator treats
/// it as zero weight. `LinkNotFound` only surfaces from the strict accessors.
#[derive(Error, Debug)]
pub enum PhaseError {
    /// No link has been created between the two positions
    #[error("no link between positions {lower} and {upper}")]
    LinkNotFound { lower: usize, upper: usize },

    /// A position index past the end of the graph
    #[error("position {index} out of range for a graph of {len} positions")]
    PositionOutOfRange { index: usize, len: usize },

    /// Accumulated weights of one link exceed `usize`
    #[error("weights of the link between positions {lower} and {upper} overflow")]
    LinkOverflow { lower: usize, upper: usize },

    /// The summed worst case of all links exceeds `usize`
    #[error("total link weight overflows")]
    WeightOverflow,

    /// A link must join two distinct positions
    #[error("a link cannot join position {0} to itself")]
    SelfLink(usize),

    /// Invalid worker counts
    #[error("invalid engine configuration: {0}")]
    Config(String),

    /// The worker pool could not be started
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// I/O errors while reading a link list
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed link-list line
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl PhaseError {
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
