//! OCM (OpenShift Cluster Manager) client
//!
//! Establishes a connection from a URL and bearer token and posts service
//! logs to the cluster service log API.

mod connection;
mod error;

pub use connection::OcmConnection;
pub use error::OcmError;
