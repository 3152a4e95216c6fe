use crate::errors::Result;

/// Terminal or intermediate status pushed by the producer,
/// out-of-band from the item batches themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkStatus {
    /// The stream is still in progress. Carries no state change.
    Running,
    /// The producer delivered everything it had.
    Complete,
    /// The producer failed; the message describes why.
    Error(String),
}

/// Handle back to the producer a sink is subscribed to.
///
/// `unsubscribe` is invoked by the collector once its window is
/// satisfied or the caller cancels, so the producer can stop pushing.
/// It may be called redundantly (e.g. when the stream is already
/// closed) and implementations must tolerate that.
pub trait ProducerHandle: Send + Sync {
    fn unsubscribe(&self) -> Result<()>;
}

impl<P: ProducerHandle + ?Sized> ProducerHandle for std::sync::Arc<P> {
    fn unsubscribe(&self) -> Result<()> {
        (**self).unsubscribe()
    }
}

/// Receives human-readable progress messages while items arrive.
///
/// Implementations must be fire-and-forget: never block and never
/// fail, since they are invoked from the producer's delivery thread.
pub trait ProgressSink: Send + Sync {
    fn report(&self, message: &str);
}
