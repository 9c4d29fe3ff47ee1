//! # searchgate_core
//!
//! Core domain logic for Searchgate: token issuance and verification,
//! salted digests, and the capability traits for the identity store,
//! search engine, and document queue.

pub mod auth;
pub mod engine;
pub mod models;
pub mod queue;
pub mod store;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;
