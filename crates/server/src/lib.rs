//! Order Counter server library.
//!
//! This crate provides the order counter service as a library, allowing it to
//! be tested in-process and reused by the binary.
//!
//! Request flow: `GET /api/orders/count?period=...` → [`order_counter_core::Period`]
//! resolution → [`shopify::OrderCounter`] → JSON `OrderCountResult`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod shopify;
pub mod state;
