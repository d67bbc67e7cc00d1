//! servicelogger - send OCM service logs to clusters
//!
//! Reads a service log template from stdin, shows it rendered as markdown,
//! asks for confirmation, then delivers it to every target cluster
//! concurrently and reports one result line per cluster.
//!
//! # Modules
//!
//! - [`delivery`] - fan-out delivery coordinator and outcomes
//! - [`ocm`] - OCM connection and the service log endpoint
//! - [`progress`] - spinner shown while a batch is in flight
//! - [`template`] - the service log template
//! - [`render`] - markdown rendering for the terminal
//! - [`confirm`] - interactive confirmation
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod confirm;
pub mod delivery;
pub mod ocm;
pub mod progress;
pub mod render;
pub mod send;
pub mod template;

// Re-export commonly used types
pub use config::{Config, ConfigError, SendConfig};
pub use confirm::{AssumeYes, Confirm, TerminalConfirm};
pub use delivery::{
    BatchResult, DeliveryClient, DeliveryCoordinator, DeliveryError, DeliveryOutcome, DeliveryStatus,
    OcmDeliveryClient, TargetId,
};
pub use ocm::{OcmConnection, OcmError};
pub use progress::{ProgressIndicator, Spinner, SpinnerTask};
pub use render::render_markdown;
pub use send::send_service_log;
pub use template::{ServiceLogTemplate, TemplateError};
