use crate::{Error, Result};

pub const BASE_URL_VAR: &str = "DINGTALK_WEBHOOK_BASE_URL";

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub dingtalk: DingTalkConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DingTalkConfig {
    /// Robot webhook prefix; the destination key from the request path is
    /// appended verbatim.
    pub webhook_base_url: Option<String>,
    /// Target of the "Silence Alert" action button.
    pub silence_url: String,
    /// Mobile numbers mentioned on every message.
    pub at_mobiles: Vec<String>,
}

impl DingTalkConfig {
    pub fn webhook_url(&self, key: &str) -> Result<String> {
        match &self.webhook_base_url {
            Some(base) => Ok(format!("{}{}", base, key)),
            None => Err(Error::Config(format!(
                "{} environment variable is required",
                BASE_URL_VAR
            ))),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT").filter(|p| !p.is_empty()) {
            Some(raw) => raw.parse::<u16>().map_err(|_| {
                Error::Config(format!("PORT must be a valid port number, got {:?}", raw))
            })?,
            None => 8080,
        };

        let config = Config {
            server: ServerConfig { port },
            dingtalk: DingTalkConfig {
                webhook_base_url: lookup(BASE_URL_VAR).filter(|url| !url.is_empty()),
                silence_url: lookup("DINGTALK_SILENCE_URL").unwrap_or_default(),
                at_mobiles: lookup("DINGTALK_AT_MOBILES")
                    .map(|raw| parse_list(&raw))
                    .unwrap_or_default(),
            },
        };

        if config.dingtalk.webhook_base_url.is_none() {
            tracing::warn!(
                "{} is not set. Every relay request will fail until it is configured.",
                BASE_URL_VAR
            );
        }

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig { port: 8080 },
            dingtalk: DingTalkConfig::default(),
        }
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
