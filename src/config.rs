use serde::{Deserialize, Serialize};

use crate::models::DecodeSettings;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend_url_development: String,
    pub backend_url_production: String,
    pub environment: String,
    pub enable_logging: bool,
    pub network_timeout_seconds: u32,
    pub api_key: Option<String>,
    pub entry_point_label: String,
    pub language: String,
    pub scanner: ScannerConfig,
}

/// Parámetros del escáner y de los auto-dismiss
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    pub fps: u32,
    pub scan_box_size: u32,
    pub success_dismiss_ms: u32,
    pub error_dismiss_ms: u32,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            fps: 10,
            scan_box_size: 250,
            success_dismiss_ms: 2_000,
            error_dismiss_ms: 3_000,
        }
    }
}

impl ScannerConfig {
    pub fn decode_settings(&self) -> DecodeSettings {
        DecodeSettings {
            fps: self.fps,
            scan_box_size: self.scan_box_size,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url_development: "http://localhost:5000".to_string(),
            backend_url_production: "https://api.example-events.com".to_string(),
            environment: "development".to_string(),
            enable_logging: true,
            network_timeout_seconds: 15,
            api_key: None,
            entry_point_label: "Main Gate".to_string(),
            language: "EN".to_string(),
            scanner: ScannerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno en tiempo de compilación
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let scanner_defaults = ScannerConfig::default();
        Self {
            backend_url_development: option_env!("BACKEND_URL_DEVELOPMENT")
                .map(str::to_string)
                .unwrap_or(defaults.backend_url_development),
            backend_url_production: option_env!("BACKEND_URL_PRODUCTION")
                .map(str::to_string)
                .unwrap_or(defaults.backend_url_production),
            environment: option_env!("ENVIRONMENT")
                .map(str::to_string)
                .unwrap_or(defaults.environment),
            enable_logging: parse_or(option_env!("ENABLE_LOGGING"), defaults.enable_logging),
            network_timeout_seconds: parse_or(
                option_env!("NETWORK_TIMEOUT_SECONDS"),
                defaults.network_timeout_seconds,
            ),
            api_key: option_env!("API_KEY")
                .filter(|key| !key.is_empty())
                .map(str::to_string),
            entry_point_label: option_env!("ENTRY_POINT_LABEL")
                .map(str::to_string)
                .unwrap_or(defaults.entry_point_label),
            language: option_env!("SCANNER_LANGUAGE")
                .map(str::to_string)
                .unwrap_or(defaults.language),
            scanner: ScannerConfig {
                fps: parse_or(option_env!("SCAN_FPS"), scanner_defaults.fps),
                scan_box_size: parse_or(option_env!("SCAN_BOX_SIZE"), scanner_defaults.scan_box_size),
                success_dismiss_ms: parse_or(
                    option_env!("SUCCESS_DISMISS_MS"),
                    scanner_defaults.success_dismiss_ms,
                ),
                error_dismiss_ms: parse_or(
                    option_env!("ERROR_DISMISS_MS"),
                    scanner_defaults.error_dismiss_ms,
                ),
            },
        }
    }

    /// Obtiene la URL del backend según el entorno actual
    pub fn backend_url(&self) -> &str {
        match self.environment.as_str() {
            "production" => &self.backend_url_production,
            _ => &self.backend_url_development,
        }
    }

    /// Nivel máximo para wasm_logger
    pub fn log_level(&self) -> log::Level {
        if self.enable_logging {
            log::Level::Debug
        } else {
            log::Level::Warn
        }
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<&str>, default: T) -> T {
    raw.and_then(|value| value.trim().parse().ok()).unwrap_or(default)
}

// Configuración global estática
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_url_follows_environment() {
        let mut config = AppConfig::default();
        assert_eq!(config.backend_url(), "http://localhost:5000");
        config.environment = "production".to_string();
        assert_eq!(config.backend_url(), "https://api.example-events.com");
    }

    #[test]
    fn default_dismiss_delays() {
        let scanner = ScannerConfig::default();
        assert_eq!(scanner.success_dismiss_ms, 2_000);
        assert_eq!(scanner.error_dismiss_ms, 3_000);
        assert_eq!(scanner.decode_settings(), DecodeSettings::default());
    }

    #[test]
    fn unparsable_values_fall_back() {
        assert_eq!(parse_or(Some("abc"), 15u32), 15);
        assert_eq!(parse_or(Some(" 20 "), 15u32), 20);
        assert!(!parse_or(Some("false"), true));
        assert_eq!(parse_or::<u32>(None, 7), 7);
    }
}
