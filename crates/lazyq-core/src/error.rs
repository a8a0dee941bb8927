use thiserror::Error;

/// Canonical result for every lazyq crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Raised at operator call time, before anything is pulled.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The root of the chain was never bound to a sequence.
    #[error("query root has no source bound")]
    UnboundSource,

    #[error("no such element: {0}")]
    NoSuchElement(String),

    #[error("expected at most one element, found {count}")]
    NonUniqueResult { count: usize },

    /// `index` is the position of the element that repeated an earlier key.
    #[error("duplicate key produced by element {index}")]
    DuplicateKey { index: usize },

    #[error("type mismatch: {0}")]
    TypeMismatch(String),
}

impl Error {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub fn no_such_element(msg: impl Into<String>) -> Self {
        Error::NoSuchElement(msg.into())
    }
}
