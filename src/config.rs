use std::env;
use anyhow::{bail, Context, Result};

/// PostgreSQL connection parameters
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub schema: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub service_port: u16,
    pub service_host: String,
    pub test_mode: bool,
    pub reset_schema: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    ///
    /// `TEST` selects the test parameter set: host, port and database name
    /// come from the `POSTGRES_TEST_*` variables instead.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let test_mode = lookup("TEST").map(|v| parse_flag(&v)).unwrap_or(false);

        let host = lookup("POSTGRES_HOST").unwrap_or_else(|| "localhost".to_string());
        let port = parse_or(&lookup, "POSTGRES_PORT", 5432u16)
            .context("POSTGRES_PORT must be a valid port number (0-65535)")?;

        let user = lookup("POSTGRES_USER")
            .context("POSTGRES_USER environment variable is required")?;
        let password = lookup("POSTGRES_PASSWORD").unwrap_or_default();

        let (host, port, name) = if test_mode {
            let test_host = lookup("POSTGRES_TEST_HOST").unwrap_or(host);
            let test_port = parse_or(&lookup, "POSTGRES_TEST_PORT", port)
                .context("POSTGRES_TEST_PORT must be a valid port number (0-65535)")?;
            let test_name = lookup("POSTGRES_TEST_DB")
                .context("POSTGRES_TEST_DB environment variable is required in test mode")?;
            (test_host, test_port, test_name)
        } else {
            let name = lookup("POSTGRES_DB")
                .context("POSTGRES_DB environment variable is required")?;
            (host, port, name)
        };

        let schema = match lookup("POSTGRES_SCHEMA") {
            Some(schema) => Some(validate_schema_name(schema)?),
            None => None,
        };

        let max_connections = parse_or(&lookup, "POSTGRES_MAX_CONNECTIONS", 5u32)
            .context("POSTGRES_MAX_CONNECTIONS must be a positive integer")?;
        if max_connections == 0 {
            bail!("POSTGRES_MAX_CONNECTIONS must be a positive integer");
        }

        let acquire_timeout_secs = parse_or(&lookup, "POSTGRES_ACQUIRE_TIMEOUT_SECS", 5u64)
            .context("POSTGRES_ACQUIRE_TIMEOUT_SECS must be a number of seconds")?;

        let service_port = parse_or(&lookup, "SERVICE_PORT", 8000u16)
            .context("SERVICE_PORT must be a valid port number (0-65535)")?;

        let service_host = lookup("SERVICE_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let reset_schema = lookup("RESET_SCHEMA")
            .map(|v| parse_flag(&v))
            .unwrap_or(test_mode);

        Ok(Config {
            database: DatabaseConfig {
                host,
                port,
                user,
                password,
                name,
                schema,
                max_connections,
                acquire_timeout_secs,
            },
            service_port,
            service_host,
            test_mode,
            reset_schema,
        })
    }

    pub fn log_startup(&self) {
        let db = &self.database;
        tracing::info!("Configuration loaded:");
        tracing::info!("  Mode: {}", if self.test_mode { "test" } else { "regular" });
        tracing::info!("  PostgreSQL: {}@{}:{}/{}", db.user, db.host, db.port, db.name);
        tracing::info!("  PostgreSQL schema: {}", db.schema.as_deref().unwrap_or("default"));
        tracing::info!("  Pool size: {}", db.max_connections);
        tracing::info!("  Reset schema on startup/shutdown: {}", self.reset_schema);
        tracing::info!("  Service listening on: {}:{}", self.service_host, self.service_port);
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => Ok(raw.trim().parse::<T>()?),
        None => Ok(default),
    }
}

// Interpolated into DDL and `search_path`, so only plain identifiers pass.
fn validate_schema_name(schema: String) -> Result<String> {
    let valid = !schema.is_empty()
        && !schema.starts_with(|c: char| c.is_ascii_digit())
        && schema.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        bail!("POSTGRES_SCHEMA must contain only ASCII letters, digits and '_', got '{}'", schema);
    }
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [("POSTGRES_USER", "menu"), ("POSTGRES_DB", "menus")];

    #[test]
    fn test_config_with_all_vars() {
        let config = load(&[
            ("POSTGRES_HOST", "db.internal"),
            ("POSTGRES_PORT", "6543"),
            ("POSTGRES_USER", "menu"),
            ("POSTGRES_PASSWORD", "secret"),
            ("POSTGRES_DB", "menus"),
            ("POSTGRES_SCHEMA", "restaurant"),
            ("POSTGRES_MAX_CONNECTIONS", "12"),
            ("SERVICE_PORT", "8080"),
            ("SERVICE_HOST", "127.0.0.1"),
        ])
        .unwrap();

        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 6543);
        assert_eq!(config.database.user, "menu");
        assert_eq!(config.database.password, "secret");
        assert_eq!(config.database.name, "menus");
        assert_eq!(config.database.schema.as_deref(), Some("restaurant"));
        assert_eq!(config.database.max_connections, 12);
        assert_eq!(config.service_port, 8080);
        assert_eq!(config.service_host, "127.0.0.1");
        assert!(!config.test_mode);
        assert!(!config.reset_schema);
    }

    #[test]
    fn test_config_with_defaults() {
        let config = load(&REQUIRED).unwrap();

        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.password, "");
        assert_eq!(config.database.schema, None);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.database.acquire_timeout_secs, 5);
        assert_eq!(config.service_port, 8000);
        assert_eq!(config.service_host, "0.0.0.0");
    }

    #[test]
    fn test_test_mode_selects_test_parameters() {
        let config = load(&[
            ("TEST", "True"),
            ("POSTGRES_HOST", "prod-db"),
            ("POSTGRES_PORT", "5432"),
            ("POSTGRES_USER", "menu"),
            ("POSTGRES_DB", "menus"),
            ("POSTGRES_TEST_HOST", "test-db"),
            ("POSTGRES_TEST_PORT", "5433"),
            ("POSTGRES_TEST_DB", "menus_test"),
        ])
        .unwrap();

        assert!(config.test_mode);
        assert!(config.reset_schema);
        assert_eq!(config.database.host, "test-db");
        assert_eq!(config.database.port, 5433);
        assert_eq!(config.database.name, "menus_test");
    }

    #[test]
    fn test_test_mode_falls_back_to_regular_host() {
        let config = load(&[
            ("TEST", "1"),
            ("POSTGRES_HOST", "shared-db"),
            ("POSTGRES_USER", "menu"),
            ("POSTGRES_TEST_DB", "menus_test"),
        ])
        .unwrap();

        assert_eq!(config.database.host, "shared-db");
        assert_eq!(config.database.port, 5432);
    }

    #[test]
    fn test_test_mode_requires_test_database() {
        let error = load(&[("TEST", "true"), ("POSTGRES_USER", "menu"), ("POSTGRES_DB", "menus")])
            .unwrap_err();
        assert!(error.to_string().contains("POSTGRES_TEST_DB"));
    }

    #[test]
    fn test_reset_schema_override() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("RESET_SCHEMA", "yes"));
        assert!(load(&vars).unwrap().reset_schema);

        let config = load(&[
            ("TEST", "true"),
            ("RESET_SCHEMA", "false"),
            ("POSTGRES_USER", "menu"),
            ("POSTGRES_TEST_DB", "menus_test"),
        ])
        .unwrap();
        assert!(!config.reset_schema);
    }

    #[test]
    fn test_missing_required_var() {
        let error = load(&[("POSTGRES_USER", "menu")]).unwrap_err();
        assert!(error.to_string().contains("POSTGRES_DB"));

        let error = load(&[("POSTGRES_DB", "menus")]).unwrap_err();
        assert!(error.to_string().contains("POSTGRES_USER"));
    }

    #[test]
    fn test_invalid_port() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("SERVICE_PORT", "not-a-number"));
        let error = load(&vars).unwrap_err();
        assert!(error.to_string().contains("SERVICE_PORT"));
    }

    #[test]
    fn test_port_out_of_range() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("POSTGRES_PORT", "99999"));
        assert!(load(&vars).is_err());
    }

    #[test]
    fn test_zero_pool_size_rejected() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("POSTGRES_MAX_CONNECTIONS", "0"));
        let error = load(&vars).unwrap_err();
        assert!(error.to_string().contains("POSTGRES_MAX_CONNECTIONS"));
    }

    #[test]
    fn test_schema_name_must_be_identifier() {
        for bad in ["public; DROP TABLE menus", "9lives", "", "with-dash"] {
            let mut vars = REQUIRED.to_vec();
            vars.push(("POSTGRES_SCHEMA", bad));
            assert!(load(&vars).is_err(), "schema '{}' should be rejected", bad);
        }
    }
}
