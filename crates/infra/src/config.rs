//! Process configuration read from the environment.

use std::{env, fmt::Display, net::SocketAddr, path::PathBuf, str::FromStr};

use anyhow::{Context, anyhow};
use tracing::{info, warn};

const DEV_SESSION_SECRET: &str = "dev-secret";
const DEV_ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub session_secret: String,
    pub session_ttl_minutes: i64,
    pub admin_username: String,
    pub admin_password: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub seed_sample_data: bool,
    pub bcrypt_cost: u32,
}

impl Config {
    /// Read `.env` (if present) and then the process environment.
    pub fn load() -> anyhow::Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            info!("no .env file loaded: {e}");
        }

        let config = Self {
            bind_addr: try_load("BIND_ADDR", "0.0.0.0:8080")?,
            database_url: try_load("DATABASE_URL", "sqlite://vendor_clubs.db?mode=rwc")?,
            session_secret: try_load("SESSION_SECRET", DEV_SESSION_SECRET)?,
            session_ttl_minutes: try_load("SESSION_TTL_MINUTES", "720")?,
            admin_username: try_load("ADMIN_USERNAME", "admin")?,
            admin_password: try_load("ADMIN_PASSWORD", DEV_ADMIN_PASSWORD)?,
            upload_dir: try_load("UPLOAD_DIR", "static/uploads")?,
            max_upload_bytes: try_load("MAX_UPLOAD_BYTES", "16777216")?,
            seed_sample_data: try_load("SEED_SAMPLE_DATA", "false")?,
            bcrypt_cost: try_load("BCRYPT_COST", "12")?,
        };

        if config.session_secret == DEV_SESSION_SECRET {
            warn!("SESSION_SECRET is the development default; sessions can be forged");
        }
        if config.admin_password == DEV_ADMIN_PASSWORD {
            warn!("ADMIN_PASSWORD is the development default");
        }
        if config.session_ttl_minutes <= 0 {
            return Err(anyhow!("SESSION_TTL_MINUTES must be positive"));
        }

        Ok(config)
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.session_ttl_minutes)
    }

    /// Settings for tests: in-memory database, fast hashing, given upload dir.
    pub fn for_tests(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            database_url: "sqlite::memory:".to_string(),
            session_secret: "test-secret".to_string(),
            session_ttl_minutes: 60,
            admin_username: "admin".to_string(),
            admin_password: "admin123".to_string(),
            upload_dir: upload_dir.into(),
            max_upload_bytes: 1024 * 1024,
            seed_sample_data: false,
            bcrypt_cost: 4,
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.parse()
        .map_err(|e| anyhow!("{e}"))
        .with_context(|| format!("invalid {key} value"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_load_falls_back_to_default() {
        let port: u16 = try_load("VENDORCLUB_TEST_UNSET_PORT", "8080").unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn try_load_reports_the_variable_name() {
        let err = try_load::<u16>("VENDORCLUB_TEST_UNSET_PORT", "eighty").unwrap_err();
        assert!(format!("{err:#}").contains("VENDORCLUB_TEST_UNSET_PORT"));
    }

    #[test]
    fn test_config_uses_memory_database() {
        let config = Config::for_tests("/tmp/uploads");
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.session_ttl(), chrono::Duration::minutes(60));
    }
}
