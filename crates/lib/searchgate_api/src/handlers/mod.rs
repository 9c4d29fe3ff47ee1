//! Request handlers — thin adapters from the HTTP surface to the services.

pub mod indices;
pub mod ping;
pub mod session;
