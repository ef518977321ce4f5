use thiserror::Error;

/// Maximum number of response-body bytes kept in a [`ParcelError::RemoteQuery`].
pub const BODY_PREVIEW_LEN: usize = 500;

#[derive(Error, Debug)]
pub enum ParcelError {
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Remote query failed (status {status}): {body}")]
    RemoteQuery { status: u16, body: String },

    #[error("Fetch cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ParcelError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Builds a `RemoteQuery` error, truncating the body to a short preview.
    pub fn remote(status: u16, body: &str) -> Self {
        Self::RemoteQuery {
            status,
            body: preview(body),
        }
    }
}

fn preview(body: &str) -> String {
    if body.len() <= BODY_PREVIEW_LEN {
        return body.to_string();
    }
    let mut end = BODY_PREVIEW_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
