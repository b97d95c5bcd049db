//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration, workers, or infrastructure.

pub mod errors;
pub mod gateway;
pub mod handle;

pub use errors::{GatewayError, ProtocolViolation, Result, RuntimeError, SessionError};
pub use gateway::{Engine, EngineGateway, EngineResult};
pub use handle::EngineHandle;
