use thiserror::Error;

use super::types::{CallTaskRequest, DEFAULT_FALLBACK_CONDITIONS, PENDING_STATUS};
use crate::api::CallTaskApi;
use crate::helpers::{looks_like_e164, split_list};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    #[error("{0}")]
    Create(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    TargetPhone,
    Intent,
    Script,
    TalkingPoints,
    FallbackConditions,
    VoiceModelId,
    ConsentRequired,
}

impl FormField {
    pub const ALL: [FormField; 7] = [
        FormField::TargetPhone,
        FormField::Intent,
        FormField::Script,
        FormField::TalkingPoints,
        FormField::FallbackConditions,
        FormField::VoiceModelId,
        FormField::ConsentRequired,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FormField::TargetPhone => "target_phone",
            FormField::Intent => "intent",
            FormField::Script => "script",
            FormField::TalkingPoints => "talking_points",
            FormField::FallbackConditions => "fallback_conditions",
            FormField::VoiceModelId => "voice_model_id",
            FormField::ConsentRequired => "consent_required",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::TargetPhone => "Target phone (E.164)",
            FormField::Intent => "Caller intent",
            FormField::Script => "Script (optional)",
            FormField::TalkingPoints => "Talking points (comma-separated)",
            FormField::FallbackConditions => "Fallback triggers (semicolon-separated)",
            FormField::VoiceModelId => "Voice model ID",
            FormField::ConsentRequired => "Play recording disclaimer",
        }
    }

    pub fn is_required(self) -> bool {
        matches!(
            self,
            FormField::TargetPhone | FormField::Intent | FormField::VoiceModelId
        )
    }

    /// Accepts the wire name, or a short alias such as `phone` or `voice`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim().to_lowercase();
        let field = match raw.as_str() {
            "target_phone" | "phone" => FormField::TargetPhone,
            "intent" => FormField::Intent,
            "script" => FormField::Script,
            "talking_points" | "points" => FormField::TalkingPoints,
            "fallback_conditions" | "fallback" => FormField::FallbackConditions,
            "voice_model_id" | "voice" => FormField::VoiceModelId,
            "consent_required" | "consent" => FormField::ConsentRequired,
            _ => return None,
        };
        Some(field)
    }
}

/// Editable call task fields plus the last creation error.
#[derive(Clone, Debug)]
pub struct CallTaskForm {
    pub target_phone: String,
    pub intent: String,
    pub script: String,
    pub talking_points: String,
    pub fallback_conditions: String,
    pub voice_model_id: String,
    pub consent_required: bool,
    error: Option<String>,
}

impl Default for CallTaskForm {
    fn default() -> Self {
        Self {
            target_phone: String::new(),
            intent: String::new(),
            script: String::new(),
            talking_points: String::new(),
            fallback_conditions: DEFAULT_FALLBACK_CONDITIONS.to_string(),
            voice_model_id: String::new(),
            consent_required: false,
            error: None,
        }
    }
}

impl CallTaskForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn get(&self, field: FormField) -> String {
        match field {
            FormField::TargetPhone => self.target_phone.clone(),
            FormField::Intent => self.intent.clone(),
            FormField::Script => self.script.clone(),
            FormField::TalkingPoints => self.talking_points.clone(),
            FormField::FallbackConditions => self.fallback_conditions.clone(),
            FormField::VoiceModelId => self.voice_model_id.clone(),
            FormField::ConsentRequired => self.consent_required.to_string(),
        }
    }

    pub fn set(&mut self, field: FormField, value: &str) -> Result<(), FormError> {
        match field {
            FormField::TargetPhone => self.target_phone = value.to_string(),
            FormField::Intent => self.intent = value.to_string(),
            FormField::Script => self.script = value.to_string(),
            FormField::TalkingPoints => self.talking_points = value.to_string(),
            FormField::FallbackConditions => self.fallback_conditions = value.to_string(),
            FormField::VoiceModelId => self.voice_model_id = value.to_string(),
            FormField::ConsentRequired => {
                self.consent_required = parse_flag(value).ok_or_else(|| FormError::InvalidValue {
                    field: field.name(),
                    value: value.to_string(),
                })?;
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), FormError> {
        for field in FormField::ALL {
            if field.is_required() && self.get(field).trim().is_empty() {
                return Err(FormError::MissingField(field.name()));
            }
        }
        Ok(())
    }

    /// Normalized payload: trimmed strings, split lists, empty optionals left out.
    pub fn to_request(&self) -> CallTaskRequest {
        let script = self.script.trim();
        CallTaskRequest {
            target_phone: self.target_phone.trim().to_string(),
            intent: self.intent.trim().to_string(),
            script: (!script.is_empty()).then(|| script.to_string()),
            talking_points: optional_list(&self.talking_points, ','),
            fallback_conditions: optional_list(&self.fallback_conditions, ';'),
            voice_model_id: self.voice_model_id.trim().to_string(),
            consent_required: self.consent_required,
            status: PENDING_STATUS.to_string(),
        }
    }

    /// Sends exactly one create request and returns the new call task id.
    ///
    /// The exclusive borrow keeps a second submission from starting while one
    /// is in flight. Creation failures are kept in `error()` until the next
    /// submission and are never retried.
    pub async fn submit(&mut self, api: &dyn CallTaskApi) -> Result<String, FormError> {
        self.validate()?;
        let request = self.to_request();
        if !looks_like_e164(&request.target_phone) {
            tracing::warn!(target_phone = %request.target_phone, "target phone does not look like E.164");
        }

        self.error = None;
        match api.create_call_task(&request).await {
            Ok(created) => Ok(created.id),
            Err(err) => {
                let message = err.creation_message();
                tracing::warn!(error = %err, "call task creation failed");
                self.error = Some(message.clone());
                Err(FormError::Create(message))
            }
        }
    }
}

// Empty source text omits the field; text that splits to nothing still sends an empty list.
fn optional_list(raw: &str, sep: char) -> Option<Vec<String>> {
    if raw.is_empty() {
        return None;
    }
    Some(split_list(raw, sep))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "on" | "true" | "1" | "yes" | "y" => Some(true),
        "off" | "false" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}
