use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetraceError {
    #[error("run not found: {0}")]
    RunNotFound(String),

    #[error("no action node at index path {path:?}")]
    NodeNotFound { path: Vec<usize> },

    #[error("cannot descend through non-container value at '{path}'")]
    PathConflict { path: String },

    #[error("invalid pane display: {0}")]
    InvalidPaneDisplay(String),

    #[error("invalid value display: {0}")]
    InvalidValueDisplay(String),
}

pub type Result<T> = std::result::Result<T, RetraceError>;
