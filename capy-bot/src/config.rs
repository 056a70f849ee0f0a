//! Bot config: gateway, database, providers and logging. Loaded from env.

use anyhow::Result;
use jobspy_client::JobSpySettings;
use portal_auth::PortalSettings;
use std::env;
use waha_gateway::WahaSettings;

#[derive(Debug, Clone)]
pub struct BotConfig {
    /// BIND_ADDR — webhook/health listener address
    pub bind_addr: String,
    /// DATABASE_URL — SQLite file path
    pub database_url: String,
    /// LOG_FILE
    pub log_file: String,
    /// SECRET_KEY — credential encryption key material
    pub secret_key: String,
    /// WAHA_URL / WAHA_API_KEY / WAHA_SESSION_NAME / WAHA_TIMEOUT_SECONDS
    pub waha: WahaSettings,
    /// PORTAL_LOGIN_URL / PORTAL_TIMEOUT_SECONDS
    pub portal: PortalSettings,
    /// JOBSPY_URL / JOBSPY_LOCATION / JOBSPY_TIMEOUT_SECONDS
    pub jobspy: JobSpySettings,
    /// SEARCH_RESULT_LIMIT — result cap per job search
    pub search_result_limit: usize,
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_u64_or(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl BotConfig {
    /// Load from environment variables, with dev-friendly defaults.
    pub fn load() -> Result<Self> {
        let waha = WahaSettings {
            base_url: env_or("WAHA_URL", "http://localhost:3000"),
            api_key: env_or("WAHA_API_KEY", "dev-api-key"),
            session_name: env_or("WAHA_SESSION_NAME", "dev-session"),
            timeout_seconds: env_u64_or("WAHA_TIMEOUT_SECONDS", 5),
        };
        let portal = PortalSettings {
            login_url: env_or("PORTAL_LOGIN_URL", "http://localhost:8800/login"),
            timeout_seconds: env_u64_or("PORTAL_TIMEOUT_SECONDS", 5),
        };
        let jobspy = JobSpySettings {
            base_url: env_or("JOBSPY_URL", "http://localhost:8600"),
            location: env_or("JOBSPY_LOCATION", "Curitiba, PR"),
            timeout_seconds: env_u64_or("JOBSPY_TIMEOUT_SECONDS", 15),
        };

        Ok(Self {
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:8080"),
            database_url: env_or("DATABASE_URL", "capyvagas.db"),
            log_file: env_or("LOG_FILE", "logs/capyvagas.log"),
            secret_key: env_or("SECRET_KEY", "dev-secret-key"),
            waha,
            portal,
            jobspy,
            search_result_limit: env_u64_or("SEARCH_RESULT_LIMIT", 5) as usize,
        })
    }

    /// Validate config (service URLs must parse, the bind address too).
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("WAHA_URL", &self.waha.base_url),
            ("PORTAL_LOGIN_URL", &self.portal.login_url),
            ("JOBSPY_URL", &self.jobspy.base_url),
        ] {
            if reqwest::Url::parse(url).is_err() {
                anyhow::bail!("{} is not a valid URL: {}", name, url);
            }
        }
        if self.bind_addr.parse::<std::net::SocketAddr>().is_err() {
            anyhow::bail!("BIND_ADDR is not a valid socket address: {}", self.bind_addr);
        }
        if self.search_result_limit == 0 {
            anyhow::bail!("SEARCH_RESULT_LIMIT must be at least 1");
        }
        Ok(())
    }
}
