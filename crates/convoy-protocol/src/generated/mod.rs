//! Generated protocol buffer types and service stubs.
//!
//! This module contains Rust code generated from `proto/convoy.proto` by
//! prost-build and tonic-build. The output is checked in so the workspace
//! builds without a protoc toolchain; regenerate it when the proto changes
//! and commit the result.

// Allow clippy warnings in generated code.
#![allow(clippy::all)]
#![allow(clippy::pedantic)]

/// All protocol buffer types and service stubs from the `convoy.v1` package.
#[path = "convoy.v1.rs"]
pub mod convoy_v1;
