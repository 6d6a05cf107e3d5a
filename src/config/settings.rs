#[derive(Debug, Clone)]
pub struct ReconcileSettings {
    pub match_fetch_cap: usize,
    pub summary_fetch_cap: usize,
    pub batch_size: usize,
    pub batch_delay_ms: u64,
    pub win_rate_epsilon: f64,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            match_fetch_cap: 100,
            summary_fetch_cap: 40, // start.gg caps query complexity at 1000 objects
            batch_size: 3,
            batch_delay_ms: 500,
            win_rate_epsilon: 0.1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub endpoint: &'static str,
    pub user_agent: &'static str,
    pub timeout_secs: u64,
    pub rate_limit_ms: u64,
    pub token_env: &'static str,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.start.gg/gql/alpha",
            user_agent: "StartggPowerRankings/0.1",
            timeout_secs: 30,
            rate_limit_ms: 150,
            token_env: "STARTGG_TOKEN",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiSettings,
    pub reconcile: ReconcileSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            api: ApiSettings::default(),
            reconcile: ReconcileSettings::default(),
        }
    }
}
