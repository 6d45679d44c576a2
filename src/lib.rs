//! Keyed, time-bounded mutual exclusion backed by Redis, with an in-memory
//! fallback for single-process use.
//!
//! ```no_run
//! use keylock::{Acquisition, KeyLock, LockConfig, LockRequest, ReleaseRequest};
//!
//! # async fn run() -> keylock::Result<()> {
//! let config = LockConfig::new().with_redis_url("redis://127.0.0.1:6379")?;
//! let lock = KeyLock::initialize(config).await;
//!
//! match lock.acquire(LockRequest::new("job-1").expires(30)).await? {
//!     Acquisition::Acquired(lease) => {
//!         // ... exclusive work ...
//!         lock.release(ReleaseRequest::from(&lease)).await?;
//!     }
//!     Acquisition::Locked => println!("job-1 is busy"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod lock;
pub mod store;
pub mod utils;

pub use config::{LockConfig, LogLevel};
pub use error::{KeyLockError, Operation, Result};
pub use lock::{Acquisition, KeyLock, Lease, LockRequest, ReleaseRequest, Released};
pub use store::{LockStore, MemoryStore, RedisStore};
