mod types;

pub use types::{KeyLockError, Operation, Result};

// Re-export for convenience
pub use KeyLockError as Error;
