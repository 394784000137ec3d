use crate::application::setup_flow::SetupResult;
use crate::domain::metric::Metric;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config/canvas.toml";
const ENV_PREFIX: &str = "CANVAS";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    pub canvas: CanvasSettings,
    #[serde(default)]
    pub sensors: SensorsSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Deserialize, Serialize, Clone, PartialEq)]
pub struct CanvasSettings {
    pub base_url: String,
    pub token: String,
    pub observee_id: String,
    #[serde(default)]
    pub observee_name: String,
}

impl fmt::Debug for CanvasSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CanvasSettings")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("observee_id", &self.observee_id)
            .field("observee_name", &self.observee_name)
            .finish()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SensorsSettings {
    #[serde(default = "default_enabled")]
    pub enabled: Vec<Metric>,
}

impl Default for SensorsSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
        }
    }
}

fn default_enabled() -> Vec<Metric> {
    Metric::ALL.to_vec()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

impl From<SetupResult> for Settings {
    fn from(result: SetupResult) -> Self {
        Self {
            canvas: CanvasSettings {
                base_url: result.credentials.base_url,
                token: result.credentials.api_token,
                observee_id: result.observee_id,
                observee_name: result.observee_name,
            },
            sensors: SensorsSettings::default(),
            server: ServerSettings::default(),
        }
    }
}

/// Load the TOML file, with `CANVAS__SECTION__KEY` environment overrides
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

    Ok(settings.try_deserialize()?)
}

/// Persist the finalized configuration
pub fn save_settings(path: &Path, settings: &Settings) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let contents = toml::to_string_pretty(settings)?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write configuration to {}", path.display()))?;
    Ok(())
}
