use uuid::Uuid;

#[derive(thiserror::Error, Debug)]
pub enum TrackerError {
    #[error("record {0} not found")]
    NotFound(Uuid),
    #[error("{0}")]
    Validation(String),
    #[error("Downtime already ended.")]
    AlreadyEnded,
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl TrackerError {
    pub fn validation(message: impl Into<String>) -> Self {
        TrackerError::Validation(message.into())
    }
}
