use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed admission review: {0}")]
    MalformedEnvelope(String),
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("object does not match the Pod schema: {0}")]
    SchemaMismatch(String),
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("cannot serialize JSON patch: {0}")]
    Patch(#[source] serde_json::Error),

    #[error("cannot serialize admission review: {0}")]
    Review(#[source] serde_json::Error),
}

/// Everything that can stop an admission review from being answered.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}
