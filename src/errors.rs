use thiserror::Error;

pub type Result<T> = std::result::Result<T, CollectorError>;

#[derive(Error, Debug)]
pub enum CollectorError {
    /// The producer signaled failure through its status channel.
    #[error("producer error: {0}")]
    Producer(String),
    /// The caller withdrew before the producer finished.
    #[error("collection was cancelled")]
    Cancelled,
    /// A subscription operation on the producer handle failed.
    /// The collector logs this, it is never surfaced to the caller.
    #[error("subscription error: {0}")]
    Subscription(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
