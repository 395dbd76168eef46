//! # convoy-agent
//!
//! The agent that runs inside each managed container and serves the
//! `ConvoyService` RPC surface: one-shot command execution, bidirectional
//! interactive shells, tar-framed file transfer, and a health probe.
//!
//! Every RPC that spawns a subprocess first takes a permit from a
//! fixed-capacity [`gate::Gate`], bounding the work a single agent will run
//! concurrently.

pub mod config;
pub mod gate;
pub mod server;

mod copy;
mod shell;

pub use config::AgentConfig;
pub use server::AgentServer;
