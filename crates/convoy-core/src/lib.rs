//! # convoy-core
//!
//! Orchestrator-side core for the Convoy fleet controller:
//!
//! - [`container`] - container records/specs, the runtime driver trait, and
//!   the validating [`container::Manager`]
//! - [`registry`] - in-memory container registry with dual (id, name) indexing
//! - [`balancer`] - round-robin endpoint selection
//! - [`rpc`] - connection-pooling gRPC client for agent endpoints
//! - [`relay`] - the client-side copy relay and `container:path` endpoint
//!   grammar
//! - [`config`] - orchestrator configuration loading

pub mod balancer;
pub mod config;
pub mod container;
pub mod error;
pub mod registry;
pub mod relay;
pub mod rpc;

pub use config::Config;
pub use container::{ContainerRecord, ContainerSpec, Manager, Runtime};
pub use error::{CoreError, Result};
pub use registry::Registry;
pub use relay::CopyEndpoint;
pub use rpc::{RpcConfig, RpcPool};
