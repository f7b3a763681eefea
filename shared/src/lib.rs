use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use ts_rs::TS;

/// Status reported for an operation whose response carried no usable result.
pub const UNKNOWN_STATUS: &str = "unknown";

/// Opaque identifier of a service on the remote platform.
#[derive(TS, Deserialize, Serialize, Debug, Clone, Hash, Eq, PartialEq)]
#[ts(export)]
pub struct ServiceId(pub String);

impl ServiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ServiceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(TS, Deserialize, Serialize, Debug, Clone, Hash, Eq, PartialEq)]
#[ts(export)]
pub struct ProjectId(pub String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ProjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Coarse reading of the free-text status the platform reports.
#[derive(TS, Deserialize, Serialize, Debug, Clone, Copy, Eq, PartialEq)]
#[ts(export)]
pub enum StatusPhase {
    Running,
    Stopped,
    Transitional,
}

impl StatusPhase {
    pub fn classify(status: Option<&str>) -> Self {
        let status = status.unwrap_or_default().to_lowercase();
        // "inactive" contains "active" and lands in Running, same as the dashboard buttons
        if ["running", "active", "deployed"]
            .iter()
            .any(|s| status.contains(s))
        {
            StatusPhase::Running
        } else if ["stopped", "paused", "inactive"]
            .iter()
            .any(|s| status.contains(s))
        {
            StatusPhase::Stopped
        } else {
            StatusPhase::Transitional
        }
    }
}

impl Display for StatusPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusPhase::Running => write!(f, "running"),
            StatusPhase::Stopped => write!(f, "stopped"),
            StatusPhase::Transitional => write!(f, "transitional"),
        }
    }
}

/// A service as last reported by the platform. Every fetch replaces it whole.
#[derive(TS, Deserialize, Serialize, Debug, Clone, Eq, PartialEq)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: ServiceId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Service {
    pub fn display_name(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                let short: String = self.id.as_str().chars().take(8).collect();
                format!("Container {short}")
            }
        }
    }

    pub fn display_status(&self) -> &str {
        match self.status.as_deref() {
            Some(status) if !status.is_empty() => status,
            _ => "Unknown",
        }
    }

    pub fn phase(&self) -> StatusPhase {
        StatusPhase::classify(self.status.as_deref())
    }

    pub fn can_start(&self) -> bool {
        self.phase() != StatusPhase::Running
    }

    pub fn can_stop(&self) -> bool {
        self.phase() != StatusPhase::Stopped
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_at.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

impl Display for Service {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}) {} [{}]",
            self.display_name(),
            self.id,
            self.display_status(),
            self.phase()
        )?;
        if let Some(created) = self.created_at() {
            write!(f, " created {}", created.format("%Y-%m-%d"))?;
        }
        Ok(())
    }
}

/// Identifier and resulting status returned by a start or stop mutation.
#[derive(TS, Deserialize, Serialize, Debug, Clone, Eq, PartialEq)]
#[ts(export)]
pub struct OperationResult {
    pub id: ServiceId,
    pub status: String,
}

impl OperationResult {
    pub fn new(id: ServiceId, status: impl Into<String>) -> Self {
        Self {
            id,
            status: status.into(),
        }
    }

    /// Result used when neither mutation produced its expected field.
    pub fn unknown(id: ServiceId) -> Self {
        Self::new(id, UNKNOWN_STATUS)
    }
}

impl Display for OperationResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "service {} is now {}", self.id, self.status)
    }
}
