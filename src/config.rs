//! Settings file
//!
//! Read once at startup and never written back. Every field has a default so
//! an empty or missing file behaves like the built-in layout.

use crate::mapping::engine::EngineSettings;
use crate::mapping::input::{InputId, TriggerThresholds};
use crate::mapping::quadrant::{StickPolicy, DEFAULT_STICK_THRESHOLD};
use crate::mapping::slot::SlotSettings;
use crate::mapping::table::{ActionTable, BindingConfig, FN1, FN2};
use crate::mapping::ModifierPriority;
use color_eyre::{eyre::eyre, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

const CONFIG_DIR: &str = "padscribe";
const CONFIG_FILE: &str = "config.toml";

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub controller: ControllerConfig,
    pub mapping: MappingConfig,
    pub output: OutputConfig,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ControllerConfig {
    /// Slots to poll, the first one is the primary slot
    pub slots: Vec<u32>,
    pub poll_interval_ms: u64,
    pub stick_threshold: i16,
    pub trigger_press_above: u8,
    pub trigger_release_at_or_below: u8,
    pub max_consecutive_read_errors: u32,
    pub layer_hints: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        let triggers = TriggerThresholds::default();
        Self {
            slots: vec![0],
            poll_interval_ms: 1,
            stick_threshold: DEFAULT_STICK_THRESHOLD,
            trigger_press_above: triggers.press_above,
            trigger_release_at_or_below: triggers.release_at_or_below,
            max_consecutive_read_errors: 1000,
            layer_hints: true,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct MappingConfig {
    /// Layer modifiers, highest priority first
    pub modifiers: Vec<InputId>,
    /// Start from the built-in layout before applying `binding` entries
    pub use_default_layout: bool,
    pub stick_policies: HashMap<InputId, StickPolicy>,
    #[serde(rename = "binding")]
    pub bindings: Vec<BindingConfig>,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            modifiers: vec![FN1, FN2],
            use_default_layout: true,
            stick_policies: HashMap::new(),
            bindings: Vec::new(),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Log actions instead of synthesizing key events
    pub dry_run: bool,
}

impl Settings {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load from `path`, or from the default location when it exists.
    /// An explicit path that does not exist is an error.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match Self::default_path() {
                Some(path) => (path, false),
                None => {
                    debug!("No config directory on this platform, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(|e| eyre!("Failed to check config file {}: {}", path.display(), e))?;
        if !exists {
            if explicit {
                return Err(eyre!("Config file does not exist: {}", path.display()));
            }
            info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;
        let settings = Self::parse(&content)
            .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| eyre!("{}", e))
    }

    pub fn action_table(&self) -> Result<ActionTable> {
        let mut table = if self.mapping.use_default_layout {
            ActionTable::default_layout()
        } else {
            ActionTable::new()
        };
        table
            .extend_from_config(&self.mapping.stick_policies, &self.mapping.bindings)
            .map_err(|e| eyre!("Invalid binding: {}", e))?;
        Ok(table)
    }

    pub fn slot_settings(&self) -> Result<SlotSettings> {
        let modifiers = ModifierPriority::new(self.mapping.modifiers.clone())
            .map_err(|e| eyre!("Invalid modifier list: {}", e))?;
        let triggers = TriggerThresholds::new(
            self.controller.trigger_press_above,
            self.controller.trigger_release_at_or_below,
        )
        .map_err(|e| eyre!("Invalid trigger thresholds: {}", e))?;
        SlotSettings::new(self.controller.stick_threshold, triggers, modifiers)
            .map_err(|e| eyre!("Invalid controller settings: {}", e))
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            poll_interval: Duration::from_millis(self.controller.poll_interval_ms.max(1)),
            max_consecutive_read_errors: self.controller.max_consecutive_read_errors.max(1),
            layer_hints: self.controller.layer_hints,
            ..EngineSettings::default()
        }
    }
}
