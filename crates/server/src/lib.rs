//! # Server
//!
//! The delivery endpoint: a thin HTTP wrapper around the pacer.
//!
//! One operation, `GET /v1/next`, with no parameters. Each call asks the
//! pacer for the next unreleased window and returns it in wire format v1;
//! the observable side effect is that the release cursor advances. There is
//! no endpoint-level caching or retry.

mod error;
mod http;

pub use error::ServerError;
pub use http::DeliveryServer;
