use thiserror::Error;

#[derive(Debug, Error)]
pub enum FunBotError {
    #[error("Slack API error: {0}")]
    SlackApi(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Conversion failed: {0}")]
    ConversionFailed(String),

    #[error("Attachment is not valid UTF-8 text: {0}")]
    AttachmentDecode(String),

    #[error("Paste service unavailable: {0}")]
    RelaySinkUnavailable(String),

    #[error("Nothing to snipe: no {category} message in channel {channel_id}")]
    CacheMiss {
        channel_id: String,
        category: String,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Lookup failed: {0}")]
    Lookup(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FunBotError {
    /// Whether this error should be shown to the user as a normal reply
    /// rather than logged as a failure
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::ConversionFailed(_)
                | Self::AttachmentDecode(_)
                | Self::CacheMiss { .. }
                | Self::InvalidArgument(_)
                | Self::Lookup(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FunBotError>;
