use serde::Deserialize;
use std::env;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_QUESTIONS_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_SHEETS_API_URL: &str = "https://sheets.googleapis.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSourceKind {
    Sheets,
    Memory,
}

impl std::str::FromStr for DataSourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sheets" => Ok(DataSourceKind::Sheets),
            "memory" => Ok(DataSourceKind::Memory),
            other => Err(format!("Unknown data source kind: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SheetsConfig {
    pub api_url: String,
    pub spreadsheet_id: String,
    pub api_key: Option<String>,
    pub access_token: Option<String>,
    pub questions_range: String,
    pub score_descriptions_range: String,
    pub responses_range: String,
    pub timeout_secs: u64,
}

impl SheetsConfig {
    pub fn new(api_url: impl Into<String>, spreadsheet_id: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            spreadsheet_id: spreadsheet_id.into(),
            api_key: None,
            access_token: None,
            questions_range: "Questions!A2:F".to_string(),
            score_descriptions_range: "ScoreDescriptions!A1:Z".to_string(),
            responses_range: "Responses!A2:C".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bind_addr: String,
    /// `["*"]` allows any origin
    pub allowed_origins: Vec<String>,
    pub questions_cache_ttl_secs: u64,
    pub data_source: DataSourceKind,
    pub seed_path: Option<String>,
    pub sheets: SheetsConfig,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // Local .env is optional
        dotenvy::dotenv().ok();

        // Determine environment (defaults to dev)
        let env = env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());

        // Build configuration from config/*.toml + ENV overrides
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let lookup = |key: &str, fallback_env: &str| -> Option<String> {
            settings
                .get_string(key)
                .ok()
                .or_else(|| env::var(fallback_env).ok())
                .filter(|value| !value.trim().is_empty())
        };

        let bind_addr = lookup("server.bind_addr", "BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let allowed_origins = parse_origins(
            &lookup("cors.allowed_origins", "ALLOWED_ORIGINS").unwrap_or_else(|| "*".to_string()),
        );

        let questions_cache_ttl_secs =
            match lookup("cache.questions_ttl_secs", "QUESTIONS_CACHE_TTL_SECS") {
                Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                    config::ConfigError::Message(format!(
                        "cache.questions_ttl_secs must be a non-negative integer, got {}",
                        raw
                    ))
                })?,
                None => DEFAULT_QUESTIONS_CACHE_TTL_SECS,
            };

        let data_source = match lookup("data_source.kind", "DATA_SOURCE") {
            Some(raw) => raw
                .parse::<DataSourceKind>()
                .map_err(config::ConfigError::Message)?,
            None => DataSourceKind::Sheets,
        };

        let seed_path = lookup("data_source.seed_path", "DATA_SOURCE_SEED");

        let spreadsheet_id = lookup("sheets.spreadsheet_id", "SPREADSHEET_ID");
        if data_source == DataSourceKind::Sheets && spreadsheet_id.is_none() {
            return Err(config::ConfigError::NotFound(
                "sheets.spreadsheet_id (or SPREADSHEET_ID)".to_string(),
            ));
        }

        let mut sheets = SheetsConfig::new(
            lookup("sheets.api_url", "SHEETS_API_URL")
                .unwrap_or_else(|| DEFAULT_SHEETS_API_URL.to_string()),
            spreadsheet_id.unwrap_or_default(),
        );
        sheets.api_key = lookup("sheets.api_key", "SHEETS_API_KEY");
        sheets.access_token = lookup("sheets.access_token", "SHEETS_ACCESS_TOKEN");
        if let Ok(range) = settings.get_string("sheets.questions_range") {
            sheets.questions_range = range;
        }
        if let Ok(range) = settings.get_string("sheets.score_descriptions_range") {
            sheets.score_descriptions_range = range;
        }
        if let Ok(range) = settings.get_string("sheets.responses_range") {
            sheets.responses_range = range;
        }
        if let Ok(timeout) = settings.get_int("sheets.timeout_secs") {
            sheets.timeout_secs = u64::try_from(timeout).map_err(|_| {
                config::ConfigError::Message("sheets.timeout_secs must be positive".to_string())
            })?;
        }

        if data_source == DataSourceKind::Sheets
            && sheets.api_key.is_none()
            && sheets.access_token.is_none()
        {
            tracing::warn!("No Sheets credentials configured; requests will be unauthenticated");
        }

        Ok(Config {
            bind_addr,
            allowed_origins,
            questions_cache_ttl_secs,
            data_source,
            seed_path,
            sheets,
        })
    }

    /// In-memory configuration for tests and local runs
    pub fn for_memory() -> Self {
        Config {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            allowed_origins: vec!["*".to_string()],
            questions_cache_ttl_secs: DEFAULT_QUESTIONS_CACHE_TTL_SECS,
            data_source: DataSourceKind::Memory,
            seed_path: None,
            sheets: SheetsConfig::new(DEFAULT_SHEETS_API_URL, ""),
        }
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect();
    if origins.is_empty() {
        vec!["*".to_string()]
    } else {
        origins
    }
}
