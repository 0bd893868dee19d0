//! Response bodies for the intake API

use serde::{Deserialize, Serialize};

/// Body returned by the intake endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IntakeResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }
}
