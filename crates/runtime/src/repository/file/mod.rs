//! File-based repository implementations.

mod blob;
mod log_index;

pub use blob::FileBlobRepository;
pub use log_index::FileLogIndexRepository;
