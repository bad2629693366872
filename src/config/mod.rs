use crate::utils::error::{ContentError, Result};
use crate::utils::validation::{validate_positive_number, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Asset paths the site serves its content documents under.
pub const PROJECTS_PATH: &str = "/assets/js/projects.json";
pub const TEAM_PATH: &str = "/assets/js/team.json";
pub const TESTIMONIALS_PATH: &str = "/assets/js/testimonials.json";

const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);
const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoints {
    pub projects: String,
    pub team: String,
    pub testimonials: String,
}

impl Endpoints {
    /// Endpoints for a site origin, joining the fixed asset paths.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            projects: format!("{}{}", base, PROJECTS_PATH),
            team: format!("{}{}", base, TEAM_PATH),
            testimonials: format!("{}{}", base, TESTIMONIALS_PATH),
        }
    }
}

impl Validate for Endpoints {
    fn validate(&self) -> Result<()> {
        validate_url("endpoints.projects", &self.projects)?;
        validate_url("endpoints.team", &self.team)?;
        validate_url("endpoints.testimonials", &self.testimonials)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub endpoints: Endpoints,
    /// How long a persisted cache envelope stays valid.
    pub cache_ttl: Duration,
    /// Total fetch attempts per endpoint before a load gives up on it.
    pub retry_attempts: u32,
    /// Base delay between attempts; attempt n waits n times this.
    pub retry_delay: Duration,
    pub request_timeout: Option<Duration>,
}

impl StoreConfig {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            endpoints,
            cache_ttl: DEFAULT_CACHE_TTL,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            request_timeout: None,
        }
    }

    /// Load per-environment overrides from a TOML file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let file: ConfigFile = toml::from_str(&content).map_err(|e| ContentError::Config {
            message: format!("failed to parse {}: {}", path.as_ref().display(), e),
        })?;
        let config = file.into_config();
        config.validate()?;
        Ok(config)
    }
}

impl Validate for StoreConfig {
    fn validate(&self) -> Result<()> {
        self.endpoints.validate()?;
        validate_positive_number("retry_attempts", self.retry_attempts, 1)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    endpoints: Endpoints,
    cache: Option<CacheSection>,
    retry: Option<RetrySection>,
    request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheSection {
    ttl_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RetrySection {
    attempts: Option<u32>,
    delay_seconds: Option<u64>,
}

impl ConfigFile {
    fn into_config(self) -> StoreConfig {
        let mut config = StoreConfig::new(self.endpoints);
        if let Some(cache) = self.cache {
            if let Some(ttl) = cache.ttl_seconds {
                config.cache_ttl = Duration::from_secs(ttl);
            }
        }
        if let Some(retry) = self.retry {
            if let Some(attempts) = retry.attempts {
                config.retry_attempts = attempts;
            }
            if let Some(delay) = retry.delay_seconds {
                config.retry_delay = Duration::from_secs(delay);
            }
        }
        if let Some(timeout) = self.request_timeout_seconds {
            config.request_timeout = Some(Duration::from_secs(timeout));
        }
        config
    }
}
