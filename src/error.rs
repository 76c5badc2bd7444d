use thiserror::Error;

/// Failures raised by a renderer. Only `NodeUnreadable` is recoverable;
/// the rest end the run.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("renderer unavailable: {0}")]
    Unavailable(String),
    #[error("node {index} unreadable: {reason}")]
    NodeUnreadable { index: usize, reason: String },
    #[error("capture io: {0}")]
    Io(#[from] std::io::Error),
    #[error("capture format: {0}")]
    CaptureFormat(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("harvest aborted: {0}")]
    Renderer(#[from] RenderError),
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("outbox io: {0}")]
    Io(#[from] std::io::Error),
    #[error("no recipient configured")]
    MissingRecipient,
}
