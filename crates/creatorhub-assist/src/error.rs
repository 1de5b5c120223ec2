use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistError {
    #[error("AI service is not configured")]
    NotConfigured,

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("AI service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode AI response: {0}")]
    Decode(String),
}
