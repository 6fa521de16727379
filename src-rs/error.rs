use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl ClientError {
    /// Text shown next to the form when creating a call task fails.
    pub fn creation_message(&self) -> String {
        match self {
            Self::Http { status, body } if body.trim().is_empty() => {
                format!("Request failed with {}", status)
            }
            Self::Http { body, .. } => body.clone(),
            Self::Transport(msg) | Self::Decode(msg) | Self::InvalidConfig(msg)
                if !msg.trim().is_empty() =>
            {
                msg.clone()
            }
            _ => "Failed to create call task".to_string(),
        }
    }

    /// Text shown in the transcript view when a poll fails.
    pub fn fetch_message(&self) -> String {
        match self {
            Self::Http { .. } => "Failed to load transcripts".to_string(),
            Self::Transport(msg) | Self::Decode(msg) | Self::InvalidConfig(msg)
                if !msg.trim().is_empty() =>
            {
                msg.clone()
            }
            _ => "Failed to load transcripts".to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}
