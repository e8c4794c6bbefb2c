//! Cloner engine: cloning-service client, request execution, and preview output.
mod client;
mod engine;
mod persist;
pub mod sandbox;
mod types;

pub use client::{ClientSettings, CloneClient, ReqwestCloneClient, CLONE_PATH};
pub use engine::{ChannelEventSink, EngineError, EngineHandle, EventSink};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use sandbox::{PreviewFrame, SandboxCapability, SandboxPolicy};
pub use types::{CloneError, CloneRequest, CloneResponse, EngineEvent, ErrorBody, FailureKind, RequestId};
