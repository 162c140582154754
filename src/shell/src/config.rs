use anyhow::{Context, Result, ensure};
use smarthome_ui_core::DEFAULT_ROOMS;
use std::{env, sync::OnceLock, time::Duration};
use url::Url;

/// Path of the Socket.IO endpoint, Engine.IO protocol 4 over websocket only
const SOCKET_IO_PATH: &str = "/socket.io/";
const SOCKET_IO_QUERY: &str = "EIO=4&transport=websocket";

/// Shell configuration loaded and validated at startup
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Backend HTTP API
    pub api: ApiConfig,

    /// Socket.IO push channel
    pub realtime: RealtimeConfig,

    /// Rooms shown on the dashboard, in display order
    pub rooms: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct RealtimeConfig {
    pub url: String,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

impl AppConfig {
    /// Get or load the application configuration
    ///
    /// On first call the configuration is loaded from environment variables
    /// and validated. Subsequent calls return the cached instance.
    pub fn get() -> Result<&'static Self> {
        if let Some(config) = APP_CONFIG.get() {
            return Ok(config);
        }
        let config = Self::load_from(|key| env::var(key).ok())?;
        Ok(APP_CONFIG.get_or_init(|| config))
    }

    /// Load the configuration through `lookup` instead of the process environment
    pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api = ApiConfig::load(&lookup)?;
        let realtime = RealtimeConfig::load(&lookup, &api.base_url)?;
        let rooms = match lookup("SMARTHOME_ROOMS") {
            Some(rooms) => rooms
                .split(',')
                .map(str::trim)
                .filter(|room| !room.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_ROOMS.iter().map(|room| room.to_string()).collect(),
        };

        Ok(Self {
            api,
            realtime,
            rooms,
        })
    }
}

impl ApiConfig {
    fn load(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup("SMARTHOME_API_URL")
            .unwrap_or_else(|| "http://127.0.0.1:5000".to_string())
            .trim_end_matches('/')
            .to_string();

        let parsed = Url::parse(&base_url).context("failed to parse SMARTHOME_API_URL")?;
        ensure!(
            matches!(parsed.scheme(), "http" | "https"),
            "failed to parse SMARTHOME_API_URL: unsupported scheme '{}'",
            parsed.scheme()
        );

        let timeout = secs(lookup, "SMARTHOME_HTTP_TIMEOUT_SECS", 10)?;

        Ok(Self { base_url, timeout })
    }
}

impl RealtimeConfig {
    fn load(lookup: &impl Fn(&str) -> Option<String>, api_url: &str) -> Result<Self> {
        let url = match lookup("SMARTHOME_REALTIME_URL") {
            Some(url) => url,
            None => socket_io_url(api_url)?,
        };

        let initial_backoff = secs(lookup, "SMARTHOME_RECONNECT_INITIAL_SECS", 1)?;
        let max_backoff = secs(lookup, "SMARTHOME_RECONNECT_MAX_SECS", 30)?;
        ensure!(
            initial_backoff <= max_backoff,
            "SMARTHOME_RECONNECT_INITIAL_SECS must not exceed SMARTHOME_RECONNECT_MAX_SECS"
        );

        Ok(Self {
            url,
            initial_backoff,
            max_backoff,
        })
    }
}

/// Derive the Socket.IO websocket address from the API address
pub fn socket_io_url(api_url: &str) -> Result<String> {
    let mut url = Url::parse(api_url).context("failed to parse API url")?;
    let scheme = match url.scheme() {
        "https" => "wss",
        _ => "ws",
    };
    url.set_scheme(scheme)
        .map_err(|_| anyhow::anyhow!("failed to set websocket scheme on {api_url}"))?;
    url.set_path(SOCKET_IO_PATH);
    url.set_query(Some(SOCKET_IO_QUERY));
    Ok(url.to_string())
}

fn secs(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> Result<Duration> {
    let secs = match lookup(key) {
        Some(value) => value
            .trim()
            .parse::<u64>()
            .with_context(|| format!("failed to parse {key}: invalid format"))?,
        None => default,
    };
    ensure!(secs > 0, "failed to parse {key}: must be positive");
    Ok(Duration::from_secs(secs))
}
