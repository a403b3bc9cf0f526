use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Node API endpoint answering INFO queries.
    pub api_addr: SocketAddr,
    /// Per-call timeout on node API requests.
    pub request_timeout_ms: u64,
    /// Fallback poll cadence when push delivery is unavailable.
    pub poll_interval_ms: u64,
    /// Emitter cadence for the push channel.
    pub push_interval_ms: u64,
    /// Disable to force the polling fallback.
    pub push_updates: bool,
    /// Daemon status-report cadence.
    pub status_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_addr: "127.0.0.1:3030".parse().unwrap(),
            request_timeout_ms: 2000,
            poll_interval_ms: 2000,
            push_interval_ms: 500,
            push_updates: true,
            status_interval_secs: 10,
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("meshwatch.toml"))
            .merge(Json::file("meshwatch.json"))
            .merge(Env::prefixed("MESHWATCH_"))
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        Ok(config)
    }
}
