//! Order Counter Core - Shared types library.
//!
//! This crate provides the types used by the order counter server:
//! - [`Period`] and its resolution into a [`DateRange`]
//! - [`StoreCredential`] for the upstream store
//! - [`OrderCountResult`] and the [`CountError`] taxonomy
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Period resolution takes "now" as an argument so it can be tested
//! without touching the clock.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
