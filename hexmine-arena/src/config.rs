//! Configuration types for game play
//!
//! Level 4 - Utilities and configuration

use anyhow::Context;
use hexmine_core::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Game configuration
///
/// Times are in seconds so the JSON form stays readable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Small (size 5, three miners) or large (size 7, six miners) board
    pub small: bool,
    /// Flat allowance per decision request
    pub time_per_move: f64,
    /// Starting reserve per side, debited by overruns and never refilled
    pub reserve_time: f64,
    /// Side that acts first
    pub first_player: Color,
    /// The driver waits at least this long per decision; never charged to a clock
    pub min_decision_time: f64,
    /// Stop with no winner after this many turns
    pub max_turns: Option<u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            small: false,
            time_per_move: 1.0,
            reserve_time: 0.0,
            first_player: Color::Blue,
            min_decision_time: 0.0,
            max_turns: None,
        }
    }
}

impl GameConfig {
    /// Default config on the small board
    pub fn small() -> Self {
        Self {
            small: true,
            ..Default::default()
        }
    }

    /// Set per-move allowance and starting reserve, in seconds
    pub fn with_time(mut self, time_per_move: f64, reserve_time: f64) -> Self {
        self.time_per_move = time_per_move;
        self.reserve_time = reserve_time;
        self
    }

    pub fn with_first_player(mut self, color: Color) -> Self {
        self.first_player = color;
        self
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = Some(max_turns);
        self
    }

    pub fn time_per_move(&self) -> Duration {
        seconds(self.time_per_move)
    }

    pub fn reserve_time(&self) -> Duration {
        seconds(self.reserve_time)
    }

    pub fn min_decision_time(&self) -> Duration {
        seconds(self.min_decision_time)
    }

    /// Reject negative or non-finite times
    pub fn validate(&self) -> anyhow::Result<()> {
        for (field, value) in [
            ("time_per_move", self.time_per_move),
            ("reserve_time", self.reserve_time),
            ("min_decision_time", self.min_decision_time),
        ] {
            if !value.is_finite() || value < 0.0 {
                anyhow::bail!("{} must be a non-negative number of seconds, got {}", field, value);
            }
        }
        Ok(())
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read game config: {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse game config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save to a JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn seconds(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_config_defaults() {
        let config = GameConfig::default();
        assert!(!config.small);
        assert_eq!(config.time_per_move(), Duration::from_secs(1));
        assert_eq!(config.reserve_time(), Duration::ZERO);
        assert_eq!(config.first_player, Color::Blue);
        assert_eq!(config.max_turns, None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameConfig =
            serde_json::from_str(r#"{"small": true, "reserve_time": 2.5, "first_player": "Red"}"#).unwrap();
        assert!(config.small);
        assert_eq!(config.reserve_time(), Duration::from_millis(2500));
        assert_eq!(config.first_player, Color::Red);
        assert_eq!(config.time_per_move, 1.0);
    }

    #[test]
    fn test_validate_rejects_negative() {
        let config = GameConfig::small().with_time(-1.0, 0.0);
        assert!(config.validate().is_err());
        assert_eq!(config.time_per_move(), Duration::ZERO);

        let config = GameConfig::small().with_time(0.5, f64::NAN);
        assert!(config.validate().is_err());
        assert!(GameConfig::small().validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("hexmine-config-{}.json", std::process::id()));
        let config = GameConfig::small().with_time(0.25, 3.0).with_max_turns(40);
        config.save(&path).unwrap();
        let loaded = GameConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, config);
    }
}
