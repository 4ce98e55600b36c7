use storyloom_core::types::DbId;

/// Errors surfaced by the outline engine.
#[derive(Debug, thiserror::Error)]
pub enum OutlineError {
    /// The node is not present in the local state.
    #[error("Node {0} is not in the outline")]
    NodeNotFound(DbId),

    /// The server rejected a request (4xx/5xx with its error payload).
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Convenience type alias for engine results.
pub type OutlineResult<T> = Result<T, OutlineError>;

impl From<reqwest::Error> for OutlineError {
    fn from(err: reqwest::Error) -> Self {
        OutlineError::Transport(err.to_string())
    }
}
