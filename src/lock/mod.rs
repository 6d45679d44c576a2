mod acquisition;
mod request;

pub use acquisition::{generate_token, KeyLock, PROBE_FAILURE_MESSAGE};
pub use request::{
    Acquisition, Lease, LockRequest, ReleaseRequest, Released, STATUS_LOCKED, STATUS_OK,
};
