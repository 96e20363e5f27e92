//! Throwaway databases for integration tests.
//!
//! ## Summary
//! Each test provisions its own database so tests can run in parallel. The
//! database is dropped again by [`TestDb::teardown`]. When no server is
//! reachable the provisioning helpers report it instead of failing, so the
//! integration suite can be skipped on machines without `PostgreSQL`.

use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::config::{TestDbSettings, load_config};
use crate::schema::create_tables;

/// A freshly created database with the test tables in place.
pub struct TestDb {
    name: String,
    settings: TestDbSettings,
    pub conn: AsyncPgConnection,
}

impl TestDb {
    /// ## Summary
    /// Drops any leftover database named `<prefix>_<suffix>`, creates it anew,
    /// connects to it and creates the test tables.
    ///
    /// ## Errors
    /// Returns an error if any connection or statement fails.
    #[tracing::instrument(skip(settings))]
    pub async fn create(settings: &TestDbSettings, suffix: &str) -> anyhow::Result<Self> {
        let name = format!("{}_{suffix}", settings.name);

        {
            let mut admin = AsyncPgConnection::establish(&settings.admin_url()).await?;
            diesel::sql_query(format!("DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE)"))
                .execute(&mut admin)
                .await?;
            diesel::sql_query(format!("CREATE DATABASE \"{name}\""))
                .execute(&mut admin)
                .await?;
        }

        let mut conn = AsyncPgConnection::establish(&settings.database_url(&name)).await?;
        create_tables(&mut conn).await?;

        tracing::info!(database = %name, "Test database created");

        Ok(Self {
            name,
            settings: settings.clone(),
            conn,
        })
    }

    /// ## Summary
    /// Loads settings and provisions a database, or returns `None` when the
    /// server cannot be reached.
    ///
    /// ## Errors
    /// Returns an error if the settings are invalid or provisioning fails after
    /// the server was reached.
    pub async fn create_or_skip(suffix: &str) -> anyhow::Result<Option<Self>> {
        let settings = load_config()?;

        if let Err(error) = AsyncPgConnection::establish(&settings.admin_url()).await {
            tracing::warn!(%error, host = %settings.host, "PostgreSQL unavailable, skipping test");
            return Ok(None);
        }

        Ok(Some(Self::create(&settings, suffix).await?))
    }

    /// ## Summary
    /// Closes the connection and drops the database.
    ///
    /// ## Errors
    /// Returns an error if the admin connection or the drop fails.
    #[tracing::instrument(skip(self), fields(database = %self.name))]
    pub async fn teardown(self) -> anyhow::Result<()> {
        let Self {
            name,
            settings,
            conn,
        } = self;
        drop(conn);

        let mut admin = AsyncPgConnection::establish(&settings.admin_url()).await?;
        diesel::sql_query(format!("DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE)"))
            .execute(&mut admin)
            .await?;

        tracing::debug!("Test database dropped");
        Ok(())
    }
}
