use serde::Deserialize;

use crate::application::services::CaptionLimits;

use super::Environment;

/// Typed configuration, loaded once at startup. Every field has a
/// documented default so the service runs from an empty config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub queue: QueueSettings,
    pub transcription: TranscriptionSettings,
    pub captions: CaptionSettings,
    pub storage: StorageSettings,
    pub ingest: IngestSettings,
    pub webhook: WebhookSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Layered load: optional `appsettings.{env}.toml`, then `APP__`
    /// prefixed environment variables (`APP__SERVER__PORT=8000`).
    pub fn load(environment: Environment) -> Result<Self, config::ConfigError> {
        let configuration = config::Config::builder()
            .add_source(
                config::File::with_name(&format!("appsettings.{}", environment.as_str()))
                    .required(false),
            )
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        configuration.try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueueSettings {
    pub name: String,
    pub workers: usize,
    pub job_timeout_secs: u64,
    pub result_ttl_secs: u64,
    pub sweep_interval_secs: u64,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            name: "transcribe".to_string(),
            workers: 2,
            job_timeout_secs: 1800,
            result_ttl_secs: 3600,
            sweep_interval_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    pub default_model: String,
    pub engine_url: String,
    pub request_timeout_secs: u64,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            default_model: "large-v3".to_string(),
            engine_url: "http://localhost:9000".to_string(),
            request_timeout_secs: 600,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptionSettings {
    pub max_line_width: usize,
    pub max_line_width_arabic: usize,
    pub max_lines: usize,
    pub max_lines_arabic: usize,
}

impl Default for CaptionSettings {
    fn default() -> Self {
        let limits = CaptionLimits::default();
        Self {
            max_line_width: limits.max_line_width,
            max_line_width_arabic: limits.max_line_width_arabic,
            max_lines: limits.max_lines,
            max_lines_arabic: limits.max_lines_arabic,
        }
    }
}

impl CaptionSettings {
    pub fn limits(&self) -> CaptionLimits {
        CaptionLimits {
            max_line_width: self.max_line_width,
            max_line_width_arabic: self.max_line_width_arabic,
            max_lines: self.max_lines,
            max_lines_arabic: self.max_lines_arabic,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub shared_dir: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            shared_dir: "shared".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    pub download_timeout_secs: u64,
    pub head_timeout_secs: u64,
    pub max_upload_mb: usize,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            download_timeout_secs: 60,
            head_timeout_secs: 15,
            max_upload_mb: 512,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebhookSettings {
    pub timeout_secs: u64,
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            enable_json: false,
        }
    }
}
