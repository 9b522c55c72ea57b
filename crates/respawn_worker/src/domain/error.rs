use common::domain::DomainError;
use thiserror::Error;

/// Per-message failures. None of these stop the subscription loop.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("payload is not a JSON object: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("respawn event is missing {0}")]
    Extraction(String),

    #[error("incomplete respawn fields: DinosaurType={species:?}, PlayerAlderonId={aid:?}")]
    IncompleteFields {
        species: Option<String>,
        aid: Option<String>,
    },

    #[error("failed to log event for AID {aid}: {source}")]
    Persistence {
        aid: String,
        #[source]
        source: DomainError,
    },
}

pub type PipelineResult<T> = Result<T, PipelineError>;
