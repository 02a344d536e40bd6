//! Throwaway Postgres databases for integration tests.
//!
//! Each [`TestDatabase`] is a freshly created, fully migrated database with a
//! random name. Tests share its connection through an `Arc`, the same way
//! repositories do, and drop the database when they finish.

use std::sync::Arc;

use crate::migrations::Migrator;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::{info, warn};

/// Where the test Postgres server lives, read from `TEST_DB_*` variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestServer {
    /// Server host.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Role with `CREATEDB`.
    pub username: String,
    /// Role password.
    pub password: String,
}

impl TestServer {
    /// Read the server location from the environment.
    ///
    /// Defaults match the `lentil_test` role on port 5433.
    #[must_use]
    pub fn from_env() -> Self {
        let var = |name: &str, default: &str| {
            std::env::var(name).unwrap_or_else(|_| default.to_string())
        };

        Self {
            host: var("TEST_DB_HOST", "localhost"),
            port: var("TEST_DB_PORT", "5433").parse().unwrap_or(5433),
            username: var("TEST_DB_USER", "lentil_test"),
            password: var("TEST_DB_PASSWORD", "lentil_test"),
        }
    }

    /// Connection URL for a database on this server.
    #[must_use]
    pub fn url(&self, database: &str) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{database}",
            self.username, self.password, self.host, self.port
        )
    }

    async fn admin(&self, sql: String) -> Result<(), DbErr> {
        let conn = Database::connect(&self.url("postgres")).await?;
        let result = conn.execute_unprepared(&sql).await;
        conn.close().await?;
        result.map(|_| ())
    }
}

/// A migrated database that exists for the length of one test.
pub struct TestDatabase {
    server: TestServer,
    name: String,
    conn: Arc<DatabaseConnection>,
}

impl TestDatabase {
    /// Create and migrate a database with a random `lentil_test_*` name.
    pub async fn create() -> Result<Self, DbErr> {
        let server = TestServer::from_env();
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        let name = format!("lentil_test_{}", &suffix[..12]);

        server.admin(format!("CREATE DATABASE \"{name}\"")).await?;

        let conn = Database::connect(&server.url(&name)).await?;
        Migrator::up(&conn, None).await?;

        info!(database = %name, "Created test database");

        Ok(Self {
            server,
            name,
            conn: Arc::new(conn),
        })
    }

    /// Name of the database.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle for building repositories.
    #[must_use]
    pub fn connection(&self) -> Arc<DatabaseConnection> {
        Arc::clone(&self.conn)
    }

    /// Drop the database.
    ///
    /// Repositories may still hold the connection, so open sessions are
    /// terminated on the server instead of closed here.
    pub async fn drop_database(self) -> Result<(), DbErr> {
        let Self { server, name, conn } = self;

        if let Ok(conn) = Arc::try_unwrap(conn) {
            conn.close().await?;
        }

        if let Err(e) = server
            .admin(format!(
                "SELECT pg_terminate_backend(pid) FROM pg_stat_activity \
                 WHERE datname = '{name}' AND pid <> pg_backend_pid()"
            ))
            .await
        {
            warn!(database = %name, error = %e, "Could not terminate test sessions");
        }

        server
            .admin(format!("DROP DATABASE IF EXISTS \"{name}\""))
            .await?;

        info!(database = %name, "Dropped test database");
        Ok(())
    }
}
