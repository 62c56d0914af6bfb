use std::fmt;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://app.switchtransact.com/api/1.0";

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub upstream_base_url: String,
    /// SwitchTransact API key. `None` keeps the server up but every lookup
    /// answers with a configuration error.
    pub api_key: Option<String>,
    pub upstream_timeout_secs: u64,
    pub probe_timeout_secs: u64,
    pub startup_probe: bool,
    pub static_dir: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            port: lookup("PORT")
                .unwrap_or_else(|| "5000".to_string())
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            upstream_base_url: lookup("SWITCHTRANSACT_BASE_URL")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim()
                .trim_end_matches('/')
                .to_string(),
            api_key: lookup("SWITCHTRANSACT_API_KEY")
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            upstream_timeout_secs: parse_secs(&lookup, "UPSTREAM_TIMEOUT_SECS", 20)?,
            probe_timeout_secs: parse_secs(&lookup, "STATUS_PROBE_TIMEOUT_SECS", 5)?,
            startup_probe: match lookup("STARTUP_STATUS_PROBE") {
                None => true,
                Some(raw) => parse_flag(&raw).ok_or_else(|| {
                    anyhow::anyhow!("STARTUP_STATUS_PROBE must be true or false")
                })?,
            },
            static_dir: lookup("STATIC_DIR")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "static".to_string()),
        };

        let parsed = url::Url::parse(&config.upstream_base_url).map_err(|e| {
            anyhow::anyhow!("SWITCHTRANSACT_BASE_URL is not a valid URL: {}", e)
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            anyhow::bail!("SWITCHTRANSACT_BASE_URL must start with http:// or https://");
        }

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("SwitchTransact Base URL: {}", config.upstream_base_url);
        tracing::debug!("Server Port: {}", config.port);
        match config.api_key_hint() {
            Some(hint) => tracing::debug!("SwitchTransact API key: {}", hint),
            None => tracing::warn!(
                "SWITCHTRANSACT_API_KEY is not set; client lookups will fail with a configuration error"
            ),
        }

        Ok(config)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Masked form of the API key that is safe to log.
    pub fn api_key_hint(&self) -> Option<String> {
        self.api_key.as_deref().map(mask_secret)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("upstream_base_url", &self.upstream_base_url)
            .field("api_key", &self.api_key_hint())
            .field("upstream_timeout_secs", &self.upstream_timeout_secs)
            .field("probe_timeout_secs", &self.probe_timeout_secs)
            .field("startup_probe", &self.startup_probe)
            .field("static_dir", &self.static_dir)
            .finish()
    }
}

fn parse_secs<F>(lookup: &F, key: &str, default: u64) -> anyhow::Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => anyhow::bail!("{} must be a positive number of seconds", key),
        Ok(secs) => Ok(secs),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Keys this short are masked entirely.
const MIN_KEY_LEN_FOR_PREFIX: usize = 9;

fn mask_secret(secret: &str) -> String {
    if secret.chars().count() < MIN_KEY_LEN_FOR_PREFIX {
        return "****".to_string();
    }
    let visible: String = secret.chars().take(4).collect();
    format!("{}****", visible)
}
