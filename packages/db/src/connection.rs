//! Database connection management with lazy initialization.

use std::sync::LazyLock;
use surrealdb::Surreal;
use surrealdb::engine::any::{Any, connect};
use surrealdb::opt::auth::Root;
use thiserror::Error;
use tokio::sync::OnceCell;

/// Global database instance using lazy initialization.
static DB: LazyLock<OnceCell<Surreal<Any>>> = LazyLock::new(OnceCell::new);

/// Database connection wrapper.
pub type Database = Surreal<Any>;

/// Database configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Connection mode: "mem://", "ws://host:port", ...
    pub endpoint: String,
    /// Namespace to use
    pub namespace: String,
    /// Database name to use
    pub database: String,
    /// Optional root credentials for authentication
    pub credentials: Option<(String, String)>,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            endpoint: "mem://".to_string(),
            namespace: "autoflow".to_string(),
            database: "garage".to_string(),
            credentials: None,
        }
    }
}

impl DbConfig {
    /// Create a config for in-memory testing.
    pub fn memory() -> Self {
        Self::default()
    }

    /// Create a config for a remote endpoint.
    pub fn remote(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Build a config from environment variables.
    ///
    /// Returns `None` when `AUTOFLOW_DB_ENDPOINT` is unset or empty,
    /// meaning no remote store was ever configured. Optional
    /// overrides: `AUTOFLOW_DB_NAMESPACE`, `AUTOFLOW_DB_NAME`,
    /// `AUTOFLOW_DB_USER` + `AUTOFLOW_DB_PASS`.
    pub fn from_env() -> Option<Self> {
        let endpoint = std::env::var("AUTOFLOW_DB_ENDPOINT")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())?;

        let mut config = Self::remote(endpoint);
        if let Ok(namespace) = std::env::var("AUTOFLOW_DB_NAMESPACE") {
            config.namespace = namespace;
        }
        if let Ok(database) = std::env::var("AUTOFLOW_DB_NAME") {
            config.database = database;
        }
        if let (Ok(user), Ok(pass)) = (
            std::env::var("AUTOFLOW_DB_USER"),
            std::env::var("AUTOFLOW_DB_PASS"),
        ) {
            config.credentials = Some((user, pass));
        }
        Some(config)
    }

    /// Set the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the database name.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Set root credentials for authentication.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }
}

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database not initialized - call init_db first")]
    NotInitialized,
    #[error("connection error: {0}")]
    Connection(#[from] surrealdb::Error),
    #[error("query error: {0}")]
    Query(String),
    #[error("not found: {0}")]
    NotFound(String),
}

/// Initialize the database connection.
///
/// This should be called once at application startup before any
/// database operations.
pub async fn init_db(config: DbConfig) -> Result<&'static Database, DbError> {
    DB.get_or_try_init(|| async {
        tracing::info!("Connecting to database: {}", config.endpoint);

        let db = connect(&config.endpoint).await?;

        // Authenticate if credentials provided
        if let Some((username, password)) = &config.credentials {
            db.signin(Root {
                username: username.as_str(),
                password: password.as_str(),
            })
            .await?;
        }

        // Select namespace and database
        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        tracing::info!(
            "Connected to database: {}/{}",
            config.namespace,
            config.database
        );

        Ok(db)
    })
    .await
}

/// Get the database connection.
///
/// Errors if the database hasn't been initialized yet.
pub fn get_db() -> Result<&'static Database, DbError> {
    DB.get().ok_or(DbError::NotInitialized)
}
