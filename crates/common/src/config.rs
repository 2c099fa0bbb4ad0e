/// All configuration loaded from environment variables at startup.
/// Missing required variables cause an immediate panic with a clear message.
#[derive(Debug, Clone)]
pub struct Config {
    // Transport
    pub listen_port: u16,
    pub api_token: String,

    // Instrument catalog
    pub assets_path: String,

    // Feedback persistence
    pub feedback_path: String,

    // Synthetic feed
    pub tick_interval_ms: u64,
}

impl Config {
    /// Load all configuration from environment variables.
    /// Loads `.env` if present. Panics on any missing required variable.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // ignore error if .env not present

        Config {
            listen_port: optional_env("PULSEBOT_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            api_token: required_env("PULSEBOT_API_TOKEN"),
            assets_path: optional_env("PULSEBOT_ASSETS_PATH")
                .unwrap_or_else(|| "config/assets.toml".to_string()),
            feedback_path: optional_env("PULSEBOT_FEEDBACK_PATH")
                .unwrap_or_else(|| "data/feedback.json".to_string()),
            tick_interval_ms: optional_env("PULSEBOT_TICK_INTERVAL_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(2_000),
        }
    }
}

fn required_env(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| {
        panic!("Required environment variable '{key}' is not set. Check your .env file.")
    })
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
