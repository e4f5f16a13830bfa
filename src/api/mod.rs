//! CloudStack API interaction module
//!
//! This module provides the transport layer for talking to a CloudStack
//! management server: request signing, the HTTP wrapper, and the client
//! that command handlers call into.
//!
//! # Module Structure
//!
//! - [`sign`] - HMAC-SHA1 request signing
//! - [`http`] - HTTP utilities for the REST API
//! - [`client`] - Main client: project scoping, envelope unwrapping,
//!   asynchronous job polling

pub mod client;
pub mod http;
pub mod sign;

pub use client::CloudStackClient;
