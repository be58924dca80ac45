use crate::error::Result;
use crate::paths;
use crate::summary::SummaryWindow;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Contexts a task can be done in.
pub const KNOWN_CONTEXTS: &[&str] = &["home", "online", "outdoor"];

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// Goals
// ---------------------------------------------------------------------------

/// Focus areas the plan should cover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goals {
    #[serde(default = "enabled")]
    pub pcb: bool,
    #[serde(default = "enabled")]
    pub social: bool,
    #[serde(default = "enabled")]
    pub prayers: bool,
    #[serde(default = "enabled")]
    pub kindness: bool,
    #[serde(default = "enabled")]
    pub frustration_control: bool,
}

fn enabled() -> bool {
    true
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            pcb: true,
            social: true,
            prayers: true,
            kindness: true,
            frustration_control: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Preferences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_max_minutes")]
    pub max_daily_minutes: u32,
    #[serde(default = "default_contexts")]
    pub available_contexts: Vec<String>,
    #[serde(default = "default_difficulty_target")]
    pub difficulty_target: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_max_minutes() -> u32 {
    90
}

fn default_contexts() -> Vec<String> {
    KNOWN_CONTEXTS.iter().map(|s| s.to_string()).collect()
}

fn default_difficulty_target() -> String {
    "maintain".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            max_daily_minutes: default_max_minutes(),
            available_contexts: default_contexts(),
            difficulty_target: default_difficulty_target(),
            language: default_language(),
        }
    }
}

// ---------------------------------------------------------------------------
// TimeBlocks
// ---------------------------------------------------------------------------

/// Default free minutes per part of the day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeBlocks {
    #[serde(default)]
    pub morning: u32,
    #[serde(default)]
    pub afternoon: u32,
    #[serde(default)]
    pub evening: u32,
}

// ---------------------------------------------------------------------------
// GeneratorConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-1.5-pro-latest".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub goals: Goals,
    #[serde(default)]
    pub time_blocks: TimeBlocks,
    #[serde(default)]
    pub summary_window: SummaryWindow,
    #[serde(default)]
    pub generator: GeneratorConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            preferences: Preferences::default(),
            goals: Goals::default(),
            time_blocks: TimeBlocks::default(),
            summary_window: SummaryWindow::default(),
            generator: GeneratorConfig::default(),
        }
    }
}

impl Config {
    /// Load `.coach/config.yaml`, or defaults when the file does not exist.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        match crate::io::read_optional(&path)? {
            Some(data) => Ok(serde_yaml::from_str(&data)?),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.preferences.max_daily_minutes == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "preferences.max_daily_minutes is 0; no task fits".to_string(),
            });
        }

        if self.preferences.available_contexts.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "preferences.available_contexts is empty; all contexts will be offered"
                    .to_string(),
            });
        }
        for ctx in &self.preferences.available_contexts {
            if !KNOWN_CONTEXTS.contains(&ctx.as_str()) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "unknown context '{ctx}' (expected one of: {})",
                        KNOWN_CONTEXTS.join(", ")
                    ),
                });
            }
        }

        if !(0.0..=2.0).contains(&self.generator.temperature) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "generator.temperature {} is outside 0.0-2.0",
                    self.generator.temperature
                ),
            });
        }

        if self.generator.timeout_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "generator.timeout_secs must be greater than 0".to_string(),
            });
        }

        if self.generator.model.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "generator.model is empty".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
