//! In-memory repository implementations for testing and development.

mod blob;

pub use blob::InMemoryBlobRepository;
