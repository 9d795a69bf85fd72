use thiserror::Error;

/// Errors raised while fetching, rendering or exporting a timetable.
#[derive(Debug, Error)]
pub enum TimetableError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request failed: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// The backend answered with a non-success status or an `{error}` body.
    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("invalid upload: {0}")]
    InvalidUpload(String),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("malformed response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("pdf generation failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("nothing to export: the timetable has no time slots")]
    EmptyGrid,

    #[error("no section selected")]
    SectionRequired,
}

impl TimetableError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        TimetableError::Api {
            status,
            message: message.into(),
        }
    }

    /// Message suitable for an alert or an inline empty state.
    pub fn user_message(&self) -> String {
        match self {
            TimetableError::Api { message, .. } => message.clone(),
            TimetableError::InvalidUpload(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TimetableError>;
