//! csinv - command-line inventory for Apache CloudStack
//!
//! The library surface exists so the integration tests can exercise the
//! client and the normalizers; the `csinv` binary is the intended
//! consumer.

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod inventory;
