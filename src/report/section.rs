use crate::error::Result;
use serde::Serialize;
use tracing::warn;

/// One dashboard section. A section that cannot be computed for the current
/// selection is `Unavailable` and the rest of the dashboard still renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section<T> {
    Ready(T),
    Unavailable { reason: String },
}

impl<T> Section<T> {
    /// Keep a successful result; log and record any error as the reason.
    pub fn from_result(name: &str, result: Result<T>) -> Self {
        match result {
            Ok(value) => Section::Ready(value),
            Err(e) => {
                warn!(section = name, "section unavailable: {}", e);
                Section::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Section::Ready(value) => Some(value),
            Section::Unavailable { .. } => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Section::Ready(_))
    }
}
