pub type LetterboxResult<T> = Result<T, LetterboxError>;

#[derive(thiserror::Error, Debug)]
pub enum LetterboxError {
    /// Non-success HTTP status or transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// External command failed to spawn, exited non-zero, or did not
    /// produce its expected output artifact.
    #[error("tool invocation error: {0}")]
    ToolInvocation(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("unsupported codec: {0}")]
    UnsupportedCodec(String),

    /// Fatal: malformed configuration. The only error class that aborts a
    /// run before any asset is processed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Contract violation (e.g. non-positive dimensions).
    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LetterboxError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn tool_invocation(msg: impl Into<String>) -> Self {
        Self::ToolInvocation(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    pub fn unsupported_codec(msg: impl Into<String>) -> Self {
        Self::UnsupportedCodec(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
