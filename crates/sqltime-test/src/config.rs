use anyhow::Result;
use config::Config;
use serde::Deserialize;

/// Connection settings for the `PostgreSQL` server used by integration tests.
#[derive(Debug, Clone, Deserialize)]
pub struct TestDbSettings {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    /// Prefix of the databases created for each test.
    pub name: String,
}

impl TestDbSettings {
    /// ## Summary
    /// Loads settings from `SQLTIME_DB_*` environment variables on top of the
    /// defaults.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("user", "sqltimetest")?
            .set_default("password", "")?
            .set_default("host", "localhost")?
            .set_default("port", 5432)?
            .set_default("name", "sqltime_test")?
            .add_source(
                config::Environment::with_prefix("SQLTIME_DB")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Self>()?)
    }

    /// URL of the maintenance database used to create and drop test databases.
    #[must_use]
    pub fn admin_url(&self) -> String {
        self.database_url("postgres")
    }

    #[must_use]
    pub fn database_url(&self, database: &str) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{database}",
            self.user, self.password, self.host, self.port
        )
    }
}

/// ## Summary
/// Loads test database settings from the environment and a `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<TestDbSettings> {
    dotenvy::dotenv().ok();

    TestDbSettings::load()
}
