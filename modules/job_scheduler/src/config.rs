use serde::{Deserialize, Serialize};

/// Configuration for the job_scheduler module (`modules.job_scheduler`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobSchedulerConfig {
    /// Period of the calendar refresh timer.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// Buffer size of the job event broadcast channel.
    #[serde(default = "default_events_capacity")]
    pub events_capacity: usize,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

impl Default for JobSchedulerConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
            events_capacity: default_events_capacity(),
            enrichment: EnrichmentConfig::default(),
            seed: SeedConfig::default(),
        }
    }
}

fn default_refresh_interval_secs() -> u64 {
    30
}

fn default_events_capacity() -> usize {
    256
}

/// Text-generation service settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnrichmentConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Falls back to the `ANTHROPIC_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl std::fmt::Debug for EnrichmentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrichmentConfig")
            .field("enabled", &self.enabled)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_model() -> String {
    "claude-3-5-haiku-latest".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_tokens() -> u32 {
    512
}

/// Reference data written once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedConfig {
    #[serde(default = "default_teams")]
    pub teams: Vec<TeamSeed>,
    #[serde(default)]
    pub users: Vec<UserSeed>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            teams: default_teams(),
            users: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSeed {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserSeed {
    pub uid: String,
    pub email: String,
    pub name: String,
    /// `manager` or `team`
    pub role: String,
    #[serde(default)]
    pub team_id: Option<String>,
    /// Plain text; hashed before it is stored.
    pub password: String,
}

impl std::fmt::Debug for UserSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserSeed")
            .field("uid", &self.uid)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("team_id", &self.team_id)
            .finish_non_exhaustive()
    }
}

fn default_teams() -> Vec<TeamSeed> {
    [
        ("team-1", "Alpha Team"),
        ("team-2", "Beta Team"),
        ("team-3", "Gamma Team"),
    ]
    .into_iter()
    .map(|(id, name)| TeamSeed {
        id: id.to_string(),
        name: name.to_string(),
    })
    .collect()
}
