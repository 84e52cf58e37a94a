use thiserror::Error;

pub type CampaignResult<T> = Result<T, CampaignError>;

#[derive(Error, Debug)]
pub enum CampaignError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// A capability the host must provide is missing. Raised before any
    /// sink registration happens.
    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl CampaignError {
    pub fn is_precondition(&self) -> bool {
        matches!(self, CampaignError::Precondition(_))
    }
}
