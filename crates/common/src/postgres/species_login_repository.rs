use crate::domain::{DomainError, DomainResult, SpeciesLogin, SpeciesLoginRepository};
use crate::postgres::PostgresClient;
use anyhow::Context;
use async_trait::async_trait;
use tracing::{debug, instrument};

const INSERT_SPECIES_LOGIN: &str = "INSERT INTO public.species_logins (ts, aid, species, event_type)
     VALUES ($1, $2, $3, $4)";

/// PostgreSQL implementation of SpeciesLoginRepository
///
/// The table is expected to exist already; this repository never creates or alters it.
#[derive(Clone)]
pub struct PostgresSpeciesLoginRepository {
    client: PostgresClient,
}

impl PostgresSpeciesLoginRepository {
    pub fn new(client: PostgresClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SpeciesLoginRepository for PostgresSpeciesLoginRepository {
    #[instrument(skip(self, login), fields(aid = %login.aid, species = %login.species))]
    async fn insert_species_login(&self, login: &SpeciesLogin) -> DomainResult<()> {
        // Checked out for this call only; dropping it returns it to the pool on every path.
        let conn = self
            .client
            .get_connection()
            .await
            .map_err(DomainError::RepositoryError)?;

        let statement = conn
            .prepare_cached(INSERT_SPECIES_LOGIN)
            .await
            .context("Failed to prepare species login insert")?;

        conn.execute(
            &statement,
            &[&login.ts, &login.aid, &login.species, &login.event_type],
        )
        .await
        .context("Failed to insert species login")?;

        debug!(aid = %login.aid, "inserted species login row");

        Ok(())
    }
}
