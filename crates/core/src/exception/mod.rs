//! Lock exceptions: records, validation, and storage.

pub mod error;
pub mod store;
pub mod types;

pub use error::ExceptionError;
pub use store::{ExceptionStore, validate_new_exception};
pub use types::{ExceptionState, LockException, NewLockException};
