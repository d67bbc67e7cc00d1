//! The `send` pipeline: confirm, then fan out

use std::io::Write;
use std::sync::Arc;

use eyre::Result;
use tracing::{debug, info};

use crate::confirm::{Confirm, confirmation_prompt};
use crate::delivery::{BatchResult, DeliveryCoordinator, TargetId};
use crate::template::ServiceLogTemplate;

/// Message printed when the operator declines
pub const CANCELED_MESSAGE: &str = "Service log canceled";

/// Ask for confirmation and deliver to every target
///
/// Returns `None` when the operator declines; nothing is delivered then and
/// the cancel message goes to `diag`.
pub async fn send_service_log(
    notice: ServiceLogTemplate,
    targets: &[TargetId],
    confirm: &dyn Confirm,
    coordinator: &DeliveryCoordinator,
    diag: &mut dyn Write,
) -> Result<Option<BatchResult>> {
    debug!(target_count = targets.len(), "send_service_log: called");

    if !confirm.confirm(&confirmation_prompt(targets.len()))? {
        info!("Operator declined to send service log");
        writeln!(diag, "{}", CANCELED_MESSAGE)?;
        return Ok(None);
    }

    let batch = coordinator.deliver(Arc::new(notice), targets).await?;
    Ok(Some(batch))
}
