#![deny(clippy::all)]

pub mod cancel;
pub mod collector;
pub mod errors;
pub mod sink;
pub mod window;

pub use cancel::CancelToken;
pub use collector::WindowedCollector;
pub use errors::{CollectorError, Result};
pub use sink::{ProducerHandle, ProgressSink, SinkStatus};
pub use window::{BatchStart, RowWindow};
