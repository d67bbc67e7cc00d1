//! Delivery outcome types

use std::fmt;

/// Handle naming one cluster that receives the notice
pub type TargetId = String;

/// Result of delivering to one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    Success,
    Failure(String),
}

/// Outcome of one delivery, tagged with its target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub target: TargetId,
    pub status: DeliveryStatus,
}

impl DeliveryOutcome {
    pub fn success(target: impl Into<TargetId>) -> Self {
        Self {
            target: target.into(),
            status: DeliveryStatus::Success,
        }
    }

    pub fn failure(target: impl Into<TargetId>, message: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            status: DeliveryStatus::Failure(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, DeliveryStatus::Success)
    }

    /// Error message for a failed delivery
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            DeliveryStatus::Success => None,
            DeliveryStatus::Failure(message) => Some(message),
        }
    }
}

/// Formats as the tab-separated result line: `<target>\t<status>[\t<error>]`
impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            DeliveryStatus::Success => write!(f, "{}\tsuccess", self.target),
            DeliveryStatus::Failure(message) => write!(f, "{}\tfailure\t{}", self.target, message),
        }
    }
}

/// All outcomes of one batch, in submission order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    outcomes: Vec<DeliveryOutcome>,
}

impl BatchResult {
    pub fn new(outcomes: Vec<DeliveryOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn outcomes(&self) -> &[DeliveryOutcome] {
        &self.outcomes
    }

    pub fn succeeded_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.len() - self.succeeded_count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(DeliveryOutcome::is_success)
    }

    /// Outcomes that failed
    pub fn failures(&self) -> impl Iterator<Item = &DeliveryOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}
