//! Service log template (the notice delivered to every cluster)

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors reading a service log template
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Invalid service log template: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Service log template is missing a {0}")]
    MissingField(&'static str),
}

/// A service log as read from stdin
///
/// Immutable once parsed; shared across delivery tasks behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceLogTemplate {
    #[serde(default = "default_severity")]
    pub severity: String,

    #[serde(default = "default_service_name")]
    pub service_name: String,

    pub summary: String,

    pub description: String,

    #[serde(default)]
    pub internal_only: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_stream_id: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub doc_references: Vec<String>,
}

fn default_severity() -> String {
    "Info".to_string()
}

fn default_service_name() -> String {
    "SREManualAction".to_string()
}

impl ServiceLogTemplate {
    /// Parse a template from raw JSON bytes
    pub fn from_json(input: &[u8]) -> Result<Self, TemplateError> {
        debug!(len = input.len(), "from_json: called");
        let template: Self = serde_json::from_slice(input)?;

        if template.summary.trim().is_empty() {
            return Err(TemplateError::MissingField("summary"));
        }
        if template.description.trim().is_empty() {
            return Err(TemplateError::MissingField("description"));
        }

        Ok(template)
    }

    /// Markdown form shown to the operator before sending
    pub fn to_markdown(&self) -> String {
        let mut md = format!("# {}\n\n", self.summary);

        md.push_str(&format!("- **Severity:** {}\n", self.severity));
        md.push_str(&format!("- **Service:** {}\n", self.service_name));
        if let Some(log_type) = &self.log_type {
            md.push_str(&format!("- **Type:** {}\n", log_type));
        }
        if self.internal_only {
            md.push_str("- **Internal only**\n");
        }

        md.push_str(&format!("\n{}\n", self.description));

        if !self.doc_references.is_empty() {
            md.push_str("\n## References\n\n");
            for reference in &self.doc_references {
                md.push_str(&format!("- <{}>\n", reference));
            }
        }

        md
    }
}
