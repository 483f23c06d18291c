use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("frame is not a command: {0}")]
    NotACommand(#[from] serde_json::Error),
}
