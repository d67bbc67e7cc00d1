//! Fan-out delivery of one service log to many clusters
//!
//! - [`DeliveryClient`] - delivers to a single target (OCM in production)
//! - [`DeliveryCoordinator`] - one task per target, full barrier, per-target outcomes
//! - [`BatchResult`] - every outcome of one invocation

pub mod client;
mod coordinator;
mod outcome;

pub use client::{DeliveryClient, OcmDeliveryClient};
pub use coordinator::{DeliveryCoordinator, DeliveryError};
pub use outcome::{BatchResult, DeliveryOutcome, DeliveryStatus, TargetId};
