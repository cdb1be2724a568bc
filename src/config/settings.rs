use crate::error::{FunBotError, Result};
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Settings {
    pub slack: SlackConfig,
    pub relay: RelayConfig,
    pub snipe: SnipeConfig,
    pub transcode: TranscodeConfig,
    pub lookup: LookupConfig,
}

#[derive(Debug, Clone)]
pub struct SlackConfig {
    pub bot_token: String,
    pub app_token: String,
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Results with at least this many characters go to the paste service
    pub inline_threshold: usize,
    pub paste_base_url: String,
    pub http_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SnipeConfig {
    /// Entries kept per channel and category
    pub capacity: usize,
}

#[derive(Debug, Clone)]
pub struct TranscodeConfig {
    pub caesar_offset: usize,
}

#[derive(Debug, Clone)]
pub struct LookupConfig {
    pub catfact_url: String,
    pub geo_api_url: String,
    pub http_timeout: Duration,
}

pub fn load_settings() -> Result<Settings> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    load_from(|key| std::env::var(key).ok())
}

fn load_from(var: impl Fn(&str) -> Option<String>) -> Result<Settings> {
    let required = |key: &str| {
        var(key).ok_or_else(|| FunBotError::Config(format!("{} not set", key)))
    };

    let slack = SlackConfig {
        bot_token: required("SLACK_BOT_TOKEN")?,
        app_token: required("SLACK_APP_TOKEN")?,
    };

    let http_timeout = Duration::from_secs(parse_or(&var, "HTTP_TIMEOUT_SECS", 10u64)?);

    let relay = RelayConfig {
        inline_threshold: parse_or(&var, "RELAY_INLINE_THRESHOLD", 2000usize)?,
        paste_base_url: var("PASTE_BASE_URL")
            .unwrap_or_else(|| "https://hastebin.com".to_string())
            .trim_end_matches('/')
            .to_string(),
        http_timeout,
    };

    let capacity = parse_or(&var, "SNIPE_CAPACITY", 5usize)?;
    if capacity == 0 {
        return Err(FunBotError::Config(
            "SNIPE_CAPACITY must be at least 1".to_string(),
        ));
    }
    let snipe = SnipeConfig { capacity };

    let transcode = TranscodeConfig {
        caesar_offset: parse_or(&var, "CAESAR_OFFSET", 4usize)?,
    };

    let lookup = LookupConfig {
        catfact_url: var("CATFACT_URL").unwrap_or_else(|| "https://catfact.ninja/fact".to_string()),
        geo_api_url: var("GEO_API_URL")
            .unwrap_or_else(|| "http://ip-api.com/json".to_string())
            .trim_end_matches('/')
            .to_string(),
        http_timeout,
    };

    Ok(Settings {
        slack,
        relay,
        snipe,
        transcode,
        lookup,
    })
}

fn parse_or<T: FromStr>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T> {
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| FunBotError::Config(format!("Invalid {}", key))),
        None => Ok(default),
    }
}
