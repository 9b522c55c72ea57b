use crate::domain::{PipelineError, PipelineResult};
use chrono::{SecondsFormat, Utc};
use common::domain::{SpeciesLogin, SpeciesLoginRepository, DEFAULT_EVENT_KIND};
use std::sync::Arc;
use tracing::{error, info};

/// Writes species logins to the durable store.
///
/// Failures are logged here with the subject id and handed back to the caller as
/// [`PipelineError::Persistence`]; they never escape as a panic or fatal error.
pub struct SpeciesLoginSink {
    repository: Arc<dyn SpeciesLoginRepository>,
}

impl SpeciesLoginSink {
    pub fn new(repository: Arc<dyn SpeciesLoginRepository>) -> Self {
        Self { repository }
    }

    /// Record a `PlayerRespawn` login for `aid`.
    pub async fn log_species_event(&self, aid: &str, species: &str) -> PipelineResult<SpeciesLogin> {
        self.log_species_event_with_kind(aid, species, DEFAULT_EVENT_KIND)
            .await
    }

    /// Record a login with an explicit event kind. The timestamp is taken now.
    pub async fn log_species_event_with_kind(
        &self,
        aid: &str,
        species: &str,
        event_kind: &str,
    ) -> PipelineResult<SpeciesLogin> {
        let login = SpeciesLogin {
            ts: Utc::now(),
            aid: aid.to_string(),
            species: species.to_string(),
            event_type: event_kind.to_string(),
        };

        match self.repository.insert_species_login(&login).await {
            Ok(()) => {
                info!(
                    aid = %login.aid,
                    species = %login.species,
                    ts = %login.ts.to_rfc3339_opts(SecondsFormat::Micros, true),
                    "logged species event"
                );
                Ok(login)
            }
            Err(e) => {
                error!(aid = %aid, error = %e, "failed to log species event");
                Err(PipelineError::Persistence {
                    aid: aid.to_string(),
                    source: e,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::domain::{DomainError, MockSpeciesLoginRepository};

    #[tokio::test]
    async fn test_log_species_event_defaults_to_player_respawn() {
        let mut mock_repo = MockSpeciesLoginRepository::new();
        mock_repo
            .expect_insert_species_login()
            .withf(|login: &SpeciesLogin| {
                login.aid == "123"
                    && login.species == "Rex"
                    && login.event_type == "PlayerRespawn"
            })
            .times(1)
            .returning(|_| Ok(()));

        let sink = SpeciesLoginSink::new(Arc::new(mock_repo));
        let before = Utc::now();
        let login = sink.log_species_event("123", "Rex").await.unwrap();
        let after = Utc::now();

        assert_eq!(login.event_type, DEFAULT_EVENT_KIND);
        assert!(login.ts >= before && login.ts <= after);
    }

    #[tokio::test]
    async fn test_log_species_event_with_custom_kind() {
        let mut mock_repo = MockSpeciesLoginRepository::new();
        mock_repo
            .expect_insert_species_login()
            .withf(|login: &SpeciesLogin| login.event_type == "PlayerLogin")
            .times(1)
            .returning(|_| Ok(()));

        let sink = SpeciesLoginSink::new(Arc::new(mock_repo));
        let login = sink
            .log_species_event_with_kind("123", "Rex", "PlayerLogin")
            .await
            .unwrap();

        assert_eq!(login.event_type, "PlayerLogin");
    }

    #[tokio::test]
    async fn test_repository_failure_becomes_persistence_error() {
        let mut mock_repo = MockSpeciesLoginRepository::new();
        mock_repo
            .expect_insert_species_login()
            .times(1)
            .returning(|_| {
                Err(DomainError::RepositoryError(anyhow::anyhow!(
                    "Failed to acquire PostgreSQL connection from pool"
                )))
            });

        let sink = SpeciesLoginSink::new(Arc::new(mock_repo));
        let result = sink.log_species_event("555", "Pachycephalosaurus").await;

        match result {
            Err(PipelineError::Persistence { aid, source }) => {
                assert_eq!(aid, "555");
                assert!(source.to_string().contains("acquire"));
            }
            other => panic!("expected Persistence error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_each_call_writes_a_new_record() {
        let mut mock_repo = MockSpeciesLoginRepository::new();
        mock_repo
            .expect_insert_species_login()
            .times(2)
            .returning(|_| Ok(()));

        let sink = SpeciesLoginSink::new(Arc::new(mock_repo));
        sink.log_species_event("123", "Rex").await.unwrap();
        sink.log_species_event("123", "Rex").await.unwrap();
    }
}
