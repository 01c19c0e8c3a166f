//! TOML configuration for the command-line adapter.
//!
//! Every section is optional and every field falls back to the tuned
//! defaults, so an empty file is a valid configuration.

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use grid_shooter_core::{ScoreTable, TemplateError, WaveTemplate};
use grid_shooter_system_cooldowns::Config as CooldownsConfig;
use grid_shooter_system_enemy_fire::Config as EnemyFireConfig;
use grid_shooter_system_progression::Config as ProgressionConfig;
use grid_shooter_world::{CatalogError, WaveCatalog};
use serde::Deserialize;
use thiserror::Error;

/// Upper bound of the enemy fire draw.
const FIRE_DRAW_BOUND: u32 = 100;

/// Complete adapter configuration.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameConfig {
    timers: TimerSettings,
    enemy_fire: EnemyFireSettings,
    progression: ProgressionSettings,
    scoring: ScoreTable,
    transition: TransitionSettings,
    waves: Option<Vec<WaveSettings>>,
    #[serde(skip)]
    catalog: WaveCatalog,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TimerSettings {
    bullet_advance_ms: u64,
    cursor_move_ms: u64,
    reload_ms: u64,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            bullet_advance_ms: 150,
            cursor_move_ms: 120,
            reload_ms: 450,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct EnemyFireSettings {
    threshold: u32,
    suppression_depth: u32,
    max_spawns_per_tick: u32,
}

impl Default for EnemyFireSettings {
    fn default() -> Self {
        Self {
            threshold: 60,
            suppression_depth: 2,
            max_spawns_per_tick: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ProgressionSettings {
    wave_cap: u32,
    fire_interval_base_ms: u64,
    fire_interval_step_ms: u64,
    fire_interval_floor_ms: u64,
}

impl Default for ProgressionSettings {
    fn default() -> Self {
        Self {
            wave_cap: 10,
            fire_interval_base_ms: 1_500,
            fire_interval_step_ms: 100,
            fire_interval_floor_ms: 400,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TransitionSettings {
    hold_ms: u64,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self { hold_ms: 1_500 }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
struct WaveSettings {
    rows: Vec<String>,
}

/// Reasons a parsed configuration may be rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum ConfigError {
    /// A cadence that must tick was configured as zero.
    #[error("`{name}` must be greater than zero")]
    ZeroInterval {
        /// Name of the offending setting.
        name: &'static str,
    },
    /// The enemy fire threshold leaves no winning draw.
    #[error("enemy fire threshold {threshold} must be below 100")]
    FireThreshold {
        /// Configured threshold.
        threshold: u32,
    },
    /// Sessions need at least one wave.
    #[error("wave cap must be at least 1")]
    ZeroWaveCap,
    /// The enemy fire floor lies above the starting interval.
    #[error("enemy fire floor of {floor_ms} ms exceeds the base interval of {base_ms} ms")]
    FloorAboveBase {
        /// Configured floor in milliseconds.
        floor_ms: u64,
        /// Configured base interval in milliseconds.
        base_ms: u64,
    },
    /// A custom wave template failed to parse.
    #[error("wave template #{index} is invalid")]
    Template {
        /// Zero-based position of the template in the `waves` list.
        index: usize,
        /// Parse failure reported for the template.
        #[source]
        source: TemplateError,
    },
    /// The custom catalog could not be assembled.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl GameConfig {
    /// Reads, parses and validates the configuration stored at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration at {}", path.display()))?;
        let config = Self::from_toml_str(&contents)
            .with_context(|| format!("invalid configuration in {}", path.display()))?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Parses and validates configuration text.
    pub(crate) fn from_toml_str(contents: &str) -> Result<Self> {
        let mut config: Self =
            toml::from_str(contents).context("failed to parse configuration toml")?;
        match config.validate() {
            Ok(catalog) => {
                config.catalog = catalog;
                Ok(config)
            }
            Err(error) => {
                tracing::warn!(%error, "rejected configuration");
                Err(error.into())
            }
        }
    }

    /// Checks every numeric setting and assembles the wave catalog.
    pub(crate) fn validate(&self) -> Result<WaveCatalog, ConfigError> {
        let intervals = [
            ("timers.bullet_advance_ms", self.timers.bullet_advance_ms),
            ("timers.cursor_move_ms", self.timers.cursor_move_ms),
            ("timers.reload_ms", self.timers.reload_ms),
            (
                "progression.fire_interval_floor_ms",
                self.progression.fire_interval_floor_ms,
            ),
        ];
        if let Some((name, _)) = intervals.into_iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::ZeroInterval { name });
        }

        if self.enemy_fire.threshold >= FIRE_DRAW_BOUND {
            return Err(ConfigError::FireThreshold {
                threshold: self.enemy_fire.threshold,
            });
        }

        let progression = &self.progression;
        if progression.wave_cap == 0 {
            return Err(ConfigError::ZeroWaveCap);
        }
        if progression.fire_interval_floor_ms > progression.fire_interval_base_ms {
            return Err(ConfigError::FloorAboveBase {
                floor_ms: progression.fire_interval_floor_ms,
                base_ms: progression.fire_interval_base_ms,
            });
        }

        self.build_catalog()
    }

    /// Wave catalog assembled when the configuration was validated.
    pub(crate) fn catalog(&self) -> &WaveCatalog {
        &self.catalog
    }

    fn build_catalog(&self) -> Result<WaveCatalog, ConfigError> {
        let Some(waves) = &self.waves else {
            return Ok(WaveCatalog::builtin());
        };

        let templates = waves
            .iter()
            .enumerate()
            .map(|(index, wave)| {
                WaveTemplate::parse(&wave.rows)
                    .map_err(|source| ConfigError::Template { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(WaveCatalog::new(templates)?)
    }

    /// Points awarded for hits and intercepts.
    pub(crate) fn scoring(&self) -> ScoreTable {
        self.scoring
    }

    /// Cooldown intervals; enemy fire starts at the base interval.
    pub(crate) fn cooldowns(&self) -> CooldownsConfig {
        CooldownsConfig::new(
            Duration::from_millis(self.timers.bullet_advance_ms),
            Duration::from_millis(self.progression.fire_interval_base_ms),
            Duration::from_millis(self.timers.cursor_move_ms),
            Duration::from_millis(self.timers.reload_ms),
        )
    }

    pub(crate) fn enemy_fire(&self) -> EnemyFireConfig {
        EnemyFireConfig::new(
            self.enemy_fire.threshold,
            self.enemy_fire.suppression_depth,
            self.enemy_fire.max_spawns_per_tick,
        )
    }

    pub(crate) fn progression(&self) -> ProgressionConfig {
        ProgressionConfig::new(
            self.progression.wave_cap,
            Duration::from_millis(self.progression.fire_interval_base_ms),
            Duration::from_millis(self.progression.fire_interval_step_ms),
            Duration::from_millis(self.progression.fire_interval_floor_ms),
        )
    }

    /// How long each loss or win screen stays up.
    pub(crate) fn transition_hold(&self) -> Duration {
        Duration::from_millis(self.transition.hold_ms)
    }
}
