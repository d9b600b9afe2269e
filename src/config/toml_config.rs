use crate::adapters::foursquare::{
    ProviderSettings, DEFAULT_API_VERSION, DEFAULT_BASE_URL, DEFAULT_SEARCH_ENDPOINT,
};
use crate::core::coordinator::{CoordinatorSettings, DEFAULT_INITIAL_QUERY};
use crate::core::map_adapter::MapAdapterOptions;
use crate::core::query::{VenueQueryBuilder, DEFAULT_INTENT, DEFAULT_RADIUS_METERS};
use crate::domain::model::Coordinate;
use crate::utils::error::{MapError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Widget configuration. Every section and field is optional in the file;
/// missing values fall back to the widget's defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    pub search: SearchConfig,
    pub map: MapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub version: String,
    pub endpoint: String,
    pub timeout_seconds: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            version: DEFAULT_API_VERSION.to_string(),
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub radius: u32,
    pub intent: String,
    pub initial_query: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS_METERS,
            intent: DEFAULT_INTENT.to_string(),
            initial_query: DEFAULT_INITIAL_QUERY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub center: Coordinate,
    pub zoom: u8,
    pub reveal_delay_ms: u64,
    pub marker_bounce_ms: u64,
    pub info_window_offset_px: i32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            // Baton Rouge
            center: Coordinate::new(30.4583, -91.1403),
            zoom: 13,
            reveal_delay_ms: 50,
            marker_bounce_ms: 2000,
            info_window_offset_px: 200,
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MapError::Io)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MapError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${FOURSQUARE_CLIENT_ID})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| MapError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn provider_settings(&self) -> ProviderSettings {
        ProviderSettings {
            base_url: self.provider.base_url.clone(),
            client_id: self.provider.client_id.clone(),
            client_secret: self.provider.client_secret.clone(),
            version: self.provider.version.clone(),
            search_endpoint: self.provider.endpoint.clone(),
            timeout: Duration::from_secs(self.provider.timeout_seconds),
        }
    }

    pub fn coordinator_settings(&self) -> CoordinatorSettings {
        CoordinatorSettings {
            query_builder: VenueQueryBuilder::new()
                .intent(self.search.intent.clone())
                .radius(self.search.radius),
            initial_query: self.search.initial_query.clone(),
        }
    }

    pub fn map_options(&self) -> MapAdapterOptions {
        MapAdapterOptions {
            reveal_delay: Duration::from_millis(self.map.reveal_delay_ms),
            bounce_duration: Duration::from_millis(self.map.marker_bounce_ms),
            info_window_offset: self.map.info_window_offset_px,
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("provider.base_url", &self.provider.base_url)?;
        validation::validate_non_empty_string("provider.client_id", &self.provider.client_id)?;
        validation::validate_non_empty_string(
            "provider.client_secret",
            &self.provider.client_secret,
        )?;
        // 沒被替換掉的 ${VAR} 代表環境變數沒設定
        for (field, value) in [
            ("provider.client_id", &self.provider.client_id),
            ("provider.client_secret", &self.provider.client_secret),
        ] {
            if value.starts_with("${") {
                return Err(MapError::MissingConfigError {
                    field: format!("{} (environment variable {})", field, value),
                });
            }
        }
        validation::validate_positive_number(
            "provider.timeout_seconds",
            self.provider.timeout_seconds,
            1,
        )?;
        validation::validate_positive_number("search.radius", u64::from(self.search.radius), 1)?;
        validation::validate_non_empty_string("search.intent", &self.search.intent)?;
        validation::validate_coordinate("map.center", self.map.center)?;
        validation::validate_range("map.zoom", self.map.zoom, 0, 21)?;
        Ok(())
    }
}
