//! Siege engine: fetch worker pool, dispatch queues, and the replay loop.
mod fetch;
mod pool;
mod replay;

pub use fetch::{Fetcher, USER_AGENT};
pub use pool::{PoolError, WorkerPool};
pub use replay::{replay, ReplayError};
