use anyhow::{Context, Result};
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};
use std::time::Duration;

use crate::config::DatabaseConfig;

const CREATE_MENUS: &str = r#"
CREATE TABLE IF NOT EXISTS menus (
    id BIGSERIAL PRIMARY KEY,
    title VARCHAR(150) NOT NULL,
    description VARCHAR(150) NOT NULL
)"#;

const CREATE_SUBMENUS: &str = r#"
CREATE TABLE IF NOT EXISTS submenus (
    id BIGSERIAL PRIMARY KEY,
    menu_id BIGINT NOT NULL REFERENCES menus (id) ON DELETE CASCADE,
    title VARCHAR(150) NOT NULL,
    description VARCHAR(150) NOT NULL
)"#;

const CREATE_DISHES: &str = r#"
CREATE TABLE IF NOT EXISTS dishes (
    id BIGSERIAL PRIMARY KEY,
    submenu_id BIGINT NOT NULL REFERENCES submenus (id) ON DELETE CASCADE,
    title VARCHAR(150) NOT NULL,
    description VARCHAR(150) NOT NULL,
    price VARCHAR(150) NOT NULL
)"#;

const CREATE_INDEXES: [&str; 2] = [
    "CREATE INDEX IF NOT EXISTS submenus_menu_id_idx ON submenus (menu_id)",
    "CREATE INDEX IF NOT EXISTS dishes_submenu_id_idx ON dishes (submenu_id)",
];

const DROP_TABLES: &str = "DROP TABLE IF EXISTS dishes, submenus, menus";

/// Shareable connection pool for use across async handlers
#[derive(Clone)]
pub struct Store {
    pool: PgPool,
    schema: Option<String>,
}

impl Store {
    /// Open a connection pool from configuration
    ///
    /// The pool connects eagerly so a wrong host or bad credentials fail
    /// at startup. When a schema is configured every pooled connection
    /// gets it as its `search_path`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let mut options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name);

        if let Some(schema) = &config.schema {
            options = options.options([("search_path", schema.as_str())]);
        }

        tracing::info!(
            "Connecting to PostgreSQL at {}:{}/{}",
            config.host,
            config.port,
            config.name
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_with(options)
            .await
            .context("Failed to create PostgreSQL connection pool")?;

        tracing::info!("Successfully connected to PostgreSQL database: {}", config.name);

        Ok(Self {
            pool,
            schema: config.schema.clone(),
        })
    }

    #[cfg(test)]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check out one pooled connection, returned to the pool on drop
    pub async fn acquire(&self) -> Result<PoolConnection<Postgres>> {
        self.pool
            .acquire()
            .await
            .context("Failed to acquire a database connection")
    }

    /// Start a transaction; it rolls back unless committed
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>> {
        self.pool
            .begin()
            .await
            .context("Failed to begin transaction")
    }

    /// Create the menus, submenus and dishes tables
    ///
    /// With `reset` the existing tables are dropped first, which wipes all
    /// data. Without it existing tables are kept as they are.
    pub async fn create_tables(&self, reset: bool) -> Result<()> {
        let mut tx = self.begin().await?;

        if let Some(schema) = &self.schema {
            sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS \"{}\"", schema))
                .execute(&mut *tx)
                .await
                .with_context(|| format!("Failed to create schema '{}'", schema))?;
        }

        if reset {
            tracing::warn!("Dropping existing tables before recreating them");
            sqlx::query(DROP_TABLES)
                .execute(&mut *tx)
                .await
                .context("Failed to drop tables")?;
        }

        for ddl in [CREATE_MENUS, CREATE_SUBMENUS, CREATE_DISHES]
            .into_iter()
            .chain(CREATE_INDEXES)
        {
            sqlx::query(ddl)
                .execute(&mut *tx)
                .await
                .context("Failed to create tables")?;
        }

        tx.commit().await.context("Failed to commit schema creation")?;
        tracing::info!("Tables 'menus', 'submenus' and 'dishes' are ready");
        Ok(())
    }

    pub async fn drop_tables(&self) -> Result<()> {
        sqlx::query(DROP_TABLES)
            .execute(&self.pool)
            .await
            .context("Failed to drop tables")?;
        tracing::info!("Tables 'menus', 'submenus' and 'dishes' dropped");
        Ok(())
    }

    /// Drop the configured schema together with everything inside it
    #[cfg(test)]
    pub async fn drop_schema(&self) -> Result<()> {
        if let Some(schema) = &self.schema {
            sqlx::query(&format!("DROP SCHEMA IF EXISTS \"{}\" CASCADE", schema))
                .execute(&self.pool)
                .await
                .with_context(|| format!("Failed to drop schema '{}'", schema))?;
            tracing::debug!("Dropped schema '{}'", schema);
        }
        Ok(())
    }

    /// Perform a health check by executing `SELECT 1`
    pub async fn health_check(&self) -> Result<()> {
        let one: i32 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("Failed to execute health check query")?;

        if one == 1 {
            tracing::debug!("Health check query succeeded");
            Ok(())
        } else {
            Err(anyhow::anyhow!("Health check query returned {}", one))
        }
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Shutdown hook: optionally drop the tables, then close the pool
    ///
    /// A failed drop is logged and the pool is closed regardless.
    pub async fn shutdown(&self, drop_tables: bool) {
        if drop_tables {
            if let Err(e) = self.drop_tables().await {
                tracing::error!("Failed to drop tables on shutdown: {:#}", e);
            }
        }
        self.close().await;
        tracing::info!("Connection pool closed");
    }
}
