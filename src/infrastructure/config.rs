use crate::domain::error::ParcelError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// NYS Tax Parcel Centroid Points (public), layer 0.
pub const DEFAULT_SERVICE_URL: &str =
    "https://gisservices.its.ny.gov/arcgis/rest/services/NYS_Tax_Parcel_Centroid_Points/FeatureServer/0";
pub const DEFAULT_PAGE_SIZE: usize = 1000;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_MAX_AREA_DEG2: f64 = 2.0;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_service_url")]
    pub service_url: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_max_area_deg2")]
    pub max_area_deg2: f64,
    #[serde(default = "default_min_zoom")]
    pub min_zoom: u8,
    #[serde(default = "default_max_features")]
    pub max_features: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    pub http_proxy: Option<String>,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub filter: FilterDefaults,
    #[serde(default)]
    pub fields: FieldConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Logging {
    #[serde(default = "default_enable")]
    pub enable: bool,
    pub path: Option<String>,
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FilterDefaults {
    #[serde(default = "default_county")]
    pub county: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FieldConfig {
    #[serde(default = "default_popup_fields")]
    pub popup: Vec<String>,
    #[serde(default = "default_required_fields")]
    pub required: Vec<String>,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            enable: true,
            path: None,
            level: default_log_level(),
        }
    }
}

impl Default for FilterDefaults {
    fn default() -> Self {
        Self {
            county: default_county(),
        }
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            popup: default_popup_fields(),
            required: default_required_fields(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_url: default_service_url(),
            page_size: DEFAULT_PAGE_SIZE,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            max_area_deg2: DEFAULT_MAX_AREA_DEG2,
            min_zoom: default_min_zoom(),
            max_features: default_max_features(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
            http_proxy: None,
            logging: Logging::default(),
            filter: FilterDefaults::default(),
            fields: FieldConfig::default(),
        }
    }
}

impl Config {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

// Defaults
fn default_service_url() -> String {
    DEFAULT_SERVICE_URL.to_string()
}
fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}
fn default_cache_ttl_secs() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}
fn default_max_area_deg2() -> f64 {
    DEFAULT_MAX_AREA_DEG2
}
fn default_min_zoom() -> u8 {
    13
}
fn default_max_features() -> usize {
    2000
}
fn default_request_timeout_secs() -> u64 {
    30
}
fn default_user_agent() -> String {
    concat!("parcelmap/", env!("CARGO_PKG_VERSION")).to_string()
}
fn default_enable() -> bool {
    true
}
fn default_log_level() -> String {
    "WARN".to_string()
}
fn default_county() -> String {
    "Schenectady".to_string()
}
fn default_popup_fields() -> Vec<String> {
    [
        "PARCEL_ADDR",
        "PRIMARY_OWNER",
        "MAIL_ADDR",
        "MAIL_CITY",
        "MAIL_STATE",
        "MAIL_ZIP",
        "SBL",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_required_fields() -> Vec<String> {
    ["PARCEL_ADDR", "PRIMARY_OWNER", "SBL", "PRINT_KEY"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("parcelmap").join("config.toml"))
}

/// Load config from the default location, falling back to defaults
pub fn load_config() -> Result<Config, ParcelError> {
    match get_config_path() {
        Some(path) if path.exists() => load_config_or_default(&path),
        _ => Ok(Config::default()),
    }
}

/// Like [`load_config_from`], but an unparsable or invalid file warns and
/// yields defaults. Only IO failures are returned.
pub fn load_config_or_default(path: &Path) -> Result<Config, ParcelError> {
    match load_config_from(path) {
        Ok(config) => Ok(config),
        Err(ParcelError::Toml(e)) => {
            eprintln!(
                "Warning: Failed to parse config file: {}. Using defaults.",
                e
            );
            Ok(Config::default())
        }
        Err(ParcelError::Config(e)) => {
            eprintln!("Warning: Invalid config file: {}. Using defaults.", e);
            Ok(Config::default())
        }
        Err(e) => Err(e),
    }
}

pub fn load_config_from(path: &Path) -> Result<Config, ParcelError> {
    let content = fs::read_to_string(path)?;
    let config = toml::from_str::<Config>(&content)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ParcelError> {
    if config.page_size == 0 {
        return Err(ParcelError::Config("page_size must be positive".to_string()));
    }
    if config.request_timeout_secs == 0 {
        return Err(ParcelError::Config(
            "request_timeout_secs must be positive".to_string(),
        ));
    }
    if !config.max_area_deg2.is_finite() || config.max_area_deg2 < 0.0 {
        return Err(ParcelError::Config(
            "max_area_deg2 must be a non-negative number".to_string(),
        ));
    }
    Ok(())
}

pub fn generate_config_sample() -> Result<(), ParcelError> {
    let Some(path) = get_config_path() else {
        return Err(ParcelError::Config(
            "Cannot determine config directory".to_string(),
        ));
    };

    if path.exists() {
        eprintln!("Config file already exists at: {}", path.display());
        return Ok(());
    }

    write_config_sample(&path)?;
    println!("Generated config file at: {}", path.display());
    Ok(())
}

pub fn write_config_sample(path: &Path) -> Result<(), ParcelError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let toml_content = toml::to_string_pretty(&Config::default())
        .map_err(|e| ParcelError::Config(format!("Failed to serialize config: {}", e)))?;
    fs::write(path, toml_content)
        .map_err(|e| ParcelError::Config(format!("Failed to write config file: {}", e)))?;
    Ok(())
}
