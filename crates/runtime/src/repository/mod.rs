//! Repository layer for data written while the runtime runs.
//!
//! Repositories persist the crash-recovery snapshot blob and the log archive
//! index. Both are rewritten whole through temp-file + rename.

mod error;
mod traits;

pub mod file;
pub mod memory;

pub use error::{RepositoryError, Result};
pub use file::{FileBlobRepository, FileLogIndexRepository};
pub use memory::InMemoryBlobRepository;
pub use traits::BlobRepository;
