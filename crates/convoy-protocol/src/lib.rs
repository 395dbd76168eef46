//! # convoy-protocol
//!
//! Wire protocol definitions for Convoy agent communication.
//!
//! The `ConvoyService` gRPC service is what the orchestrator speaks to the
//! agent running inside each container:
//!
//! - `ExecuteCommand` - one-shot command with captured output
//! - `ExecuteShell` - bidirectional interactive shell stream
//! - `Copy` - bidirectional tar-framed file transfer
//! - `CheckHealth` - readiness probe
//!
//! Message types are generated from `proto/convoy.proto` at
//! `src/generated/convoy.v1.rs` and re-exported here. Field tags are the
//! compatibility contract; keep them stable.
//!
//! Types can be accessed via:
//! - `convoy_protocol::v1::TypeName` - canonical path
//! - `convoy_protocol::TypeName` - convenient re-exports

// Generated protobuf code has many clippy warnings that we cannot control.
#![allow(clippy::derive_partial_eq_without_eq)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]

mod generated;

// Re-export the generated module as v1 (canonical path).
pub use generated::convoy_v1 as v1;

// Re-export dependencies for convenience.
pub use prost;
pub use tonic;

// =============================================================================
// Client / server re-exports
// =============================================================================

pub use v1::convoy_service_client::ConvoyServiceClient;
pub use v1::convoy_service_server::{ConvoyService, ConvoyServiceServer};

// =============================================================================
// Convenient crate-level message re-exports
// =============================================================================

pub use v1::{
    CommandRequest, CommandResponse, CopyChunk, CopyRequest, CopyResponse, CopyResult, CopyStart,
    HealthRequest, HealthResponse, ShellExit, ShellInput, ShellOutput, ShellRequest, ShellResponse,
    ShellStart,
};

pub use v1::copy_start::Direction as CopyDirection;
pub use v1::health_response::Status as HealthStatus;
pub use v1::shell_output::Stream as ShellStream;

impl ShellRequest {
    /// Wraps a start frame.
    pub fn start(start: ShellStart) -> Self {
        Self {
            payload: Some(v1::shell_request::Payload::Start(start)),
        }
    }

    /// Wraps an input frame carrying stdin bytes.
    pub fn input(data: Vec<u8>) -> Self {
        Self {
            payload: Some(v1::shell_request::Payload::Input(ShellInput {
                data,
                eof: false,
            })),
        }
    }

    /// Wraps the input frame that closes the subprocess stdin.
    pub fn input_eof() -> Self {
        Self {
            payload: Some(v1::shell_request::Payload::Input(ShellInput {
                data: Vec::new(),
                eof: true,
            })),
        }
    }
}

impl ShellResponse {
    /// Wraps an output frame for one of the subprocess streams.
    pub fn output(stream: ShellStream, data: Vec<u8>) -> Self {
        Self {
            payload: Some(v1::shell_response::Payload::Output(ShellOutput {
                stream: stream as i32,
                data,
            })),
        }
    }

    /// Wraps the final exit frame.
    pub fn exit(exit_code: i32, message: impl Into<String>) -> Self {
        Self {
            payload: Some(v1::shell_response::Payload::Exit(ShellExit {
                exit_code,
                message: message.into(),
            })),
        }
    }
}

impl CopyRequest {
    /// Wraps a start frame.
    pub fn start(direction: CopyDirection, path: impl Into<String>, overwrite: bool) -> Self {
        Self {
            payload: Some(v1::copy_request::Payload::Start(CopyStart {
                direction: direction as i32,
                path: path.into(),
                overwrite,
            })),
        }
    }

    /// Wraps a data chunk frame.
    pub fn chunk(data: Vec<u8>, eof: bool) -> Self {
        Self {
            payload: Some(v1::copy_request::Payload::Chunk(CopyChunk { data, eof })),
        }
    }
}

impl CopyResponse {
    /// Wraps a data chunk frame.
    pub fn chunk(data: Vec<u8>, eof: bool) -> Self {
        Self {
            payload: Some(v1::copy_response::Payload::Chunk(CopyChunk { data, eof })),
        }
    }

    /// Wraps the terminal result frame.
    pub fn result(result: CopyResult) -> Self {
        Self {
            payload: Some(v1::copy_response::Payload::Result(result)),
        }
    }
}
