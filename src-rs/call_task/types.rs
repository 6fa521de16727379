use serde::{Deserialize, Serialize};

pub const PENDING_STATUS: &str = "pending";

pub const DEFAULT_FALLBACK_CONDITIONS: &str =
    "If asked to speak to Manohar; Silence > 5s; Unclear response";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CallTaskRequest {
    pub target_phone: String,
    pub intent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub talking_points: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_conditions: Option<Vec<String>>,
    pub voice_model_id: String,
    pub consent_required: bool,
    pub status: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CallTaskResponse {
    pub id: String,
}
