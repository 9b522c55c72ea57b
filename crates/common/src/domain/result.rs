use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Subscription error on channel {0}: {1}")]
    SubscriptionError(String, String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Repository error: {0}")]
    RepositoryError(#[from] anyhow::Error),
}
