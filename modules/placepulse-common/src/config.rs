use std::time::Duration;

use anyhow::{bail, Context, Result};

pub const DEFAULT_PLACES_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

/// Default pause before a continuation token is used. The upstream API
/// rejects tokens requested sooner than this.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(2);

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Places API
    pub places_api_key: String,
    pub places_base_url: String,

    // Collection
    pub language: Option<String>,
    pub page_delay: Duration,
    pub most_recent: Option<usize>,
}

impl Config {
    /// Load configuration from the process environment (and `.env` if present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_lookup(|key| std::env::var(key).ok())?;
        config.log_keys();
        Ok(config)
    }

    /// Build a config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let places_api_key = match get("GOOGLE_PLACES_API_KEY") {
            Some(key) => key,
            None => bail!("GOOGLE_PLACES_API_KEY environment variable is required"),
        };

        let page_delay = match get("PLACES_PAGE_DELAY_SECS") {
            Some(raw) => parse_delay(&raw)?,
            None => DEFAULT_PAGE_DELAY,
        };

        let most_recent = get("PLACES_MOST_RECENT")
            .map(|raw| {
                raw.trim()
                    .parse::<usize>()
                    .with_context(|| format!("PLACES_MOST_RECENT must be a number, got {raw:?}"))
            })
            .transpose()?;

        Ok(Self {
            places_api_key,
            places_base_url: get("PLACES_BASE_URL")
                .unwrap_or_else(|| DEFAULT_PLACES_BASE_URL.to_string()),
            language: get("PLACES_LANGUAGE"),
            page_delay,
            most_recent,
        })
    }

    fn log_keys(&self) {
        fn preview(val: &str) -> String {
            let n: usize = val.chars().take(5).map(char::len_utf8).sum();
            format!("{}...({} chars)", &val[..n], val.len())
        }

        tracing::info!("Config loaded:");
        tracing::info!("  GOOGLE_PLACES_API_KEY: {}", preview(&self.places_api_key));
        tracing::info!("  PLACES_BASE_URL: {}", self.places_base_url);
        tracing::info!(
            "  PLACES_LANGUAGE: {}",
            self.language.as_deref().unwrap_or("<not set>")
        );
        tracing::info!("  PLACES_PAGE_DELAY_SECS: {}", self.page_delay.as_secs_f64());
        match self.most_recent {
            Some(n) => tracing::info!("  PLACES_MOST_RECENT: {n}"),
            None => tracing::info!("  PLACES_MOST_RECENT: <not set>"),
        }
    }
}

/// Parse a non-negative, possibly fractional number of seconds.
pub fn parse_delay(raw: &str) -> Result<Duration> {
    let secs: f64 = raw
        .trim()
        .parse()
        .with_context(|| format!("page delay must be a number of seconds, got {raw:?}"))?;
    if !secs.is_finite() || secs < 0.0 {
        bail!("page delay must be a non-negative number of seconds, got {raw:?}");
    }
    Ok(Duration::from_secs_f64(secs))
}
