use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChannelError {
    /// The underlying channel is gone; nothing can be sent.
    #[error("channel closed")]
    Closed,
    #[error("channel transport error: {0}")]
    Transport(String),
}
