//! Runtime tuning
//!
//! Every threshold the simulation compares against lives here rather than
//! as a constant next to the comparison. Loaded from `assets/config.ron`
//! when present, otherwise the defaults below. Values pass through
//! [`GameConfig::sanitized`] on load so a hand-edited file cannot put the
//! proximity state machine into an impossible shape.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Distance thresholds for one entity kind.
///
/// Must satisfy `engage_radius <= enter_radius < exit_radius`. The gap
/// between enter and exit is the hysteresis band that stops an entity on
/// the boundary from flickering between states.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwarenessConfig {
    /// Crossing inside this starts the approach (Engaging).
    pub enter_radius: f32,
    /// Leaving beyond this ends it. Strictly larger than `enter_radius`.
    pub exit_radius: f32,
    /// Crossing inside this triggers the interaction itself.
    pub engage_radius: f32,
}

impl Default for AwarenessConfig {
    fn default() -> Self {
        Self {
            enter_radius: 3.0,
            exit_radius: 3.5,
            engage_radius: 1.5,
        }
    }
}

impl AwarenessConfig {
    /// Force the radii into a usable ordering.
    fn sanitized(mut self, label: &str) -> Self {
        if self.enter_radius < 0.1 {
            log::warn!("{} enter_radius {} too small, using 0.1", label, self.enter_radius);
            self.enter_radius = 0.1;
        }
        if self.exit_radius <= self.enter_radius {
            let fixed = self.enter_radius + 0.5;
            log::warn!(
                "{} exit_radius {} inside enter_radius {}, using {}",
                label,
                self.exit_radius,
                self.enter_radius,
                fixed
            );
            self.exit_radius = fixed;
        }
        if self.engage_radius > self.enter_radius {
            log::warn!(
                "{} engage_radius {} beyond enter_radius {}, clamping",
                label,
                self.engage_radius,
                self.enter_radius
            );
            self.engage_radius = self.enter_radius;
        }
        if self.engage_radius < 0.0 {
            self.engage_radius = 0.0;
        }
        self
    }
}

/// Top-level tuning knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub npc_awareness: AwarenessConfig,
    pub foe_awareness: AwarenessConfig,
    /// Chance in [0, 1) that a frame skips its proximity scan. Desyncs
    /// scan cadence from the frame clock so crowds don't all flip state
    /// on the same frame.
    pub scan_skip_chance: f64,
    /// Seconds between an answer result and the next question.
    pub quiz_advance_delay: f32,
    /// Seconds an answer tint stays on a foe before reverting.
    pub tint_flash_duration: f32,
    /// Questions drawn from a foe's bank per battle.
    pub questions_per_battle: usize,
    /// Player walk speed, units per second.
    pub move_speed: f32,
    /// Player turn speed, radians per second.
    pub turn_speed: f32,
    /// Downward acceleration, units per second squared.
    pub gravity: f32,
    /// Upward velocity a jump starts with.
    pub jump_speed: f32,
    pub max_health: i32,
    pub inventory_capacity: usize,
    /// Seconds before a stuck loading screen is forced open.
    pub loader_timeout: f32,
    pub starting_realm: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            npc_awareness: AwarenessConfig::default(),
            foe_awareness: AwarenessConfig {
                enter_radius: 4.0,
                exit_radius: 5.0,
                engage_radius: 2.0,
            },
            scan_skip_chance: 0.25,
            quiz_advance_delay: 3.0,
            tint_flash_duration: 0.6,
            questions_per_battle: 3,
            move_speed: 4.0,
            turn_speed: 2.4,
            gravity: 18.0,
            jump_speed: 6.0,
            max_health: 100,
            inventory_capacity: 16,
            loader_timeout: 10.0,
            starting_realm: 0,
        }
    }
}

impl GameConfig {
    /// Load from `path`, falling back to defaults on any failure.
    /// The result is always sanitized.
    pub fn load(path: &Path) -> Self {
        let config = if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match ron::from_str(&content) {
                    Ok(config) => config,
                    Err(e) => {
                        log::warn!("failed to parse {}: {}. Using defaults.", path.display(), e);
                        Self::default()
                    }
                },
                Err(e) => {
                    log::warn!("failed to read {}: {}. Using defaults.", path.display(), e);
                    Self::default()
                }
            }
        } else {
            Self::default()
        };
        config.sanitized()
    }

    /// Clamp every knob into its usable range.
    pub fn sanitized(mut self) -> Self {
        self.npc_awareness = self.npc_awareness.sanitized("npc_awareness");
        self.foe_awareness = self.foe_awareness.sanitized("foe_awareness");
        if !(0.0..1.0).contains(&self.scan_skip_chance) {
            log::warn!("scan_skip_chance {} outside [0, 1), using 0.25", self.scan_skip_chance);
            self.scan_skip_chance = 0.25;
        }
        if self.quiz_advance_delay < 0.0 {
            self.quiz_advance_delay = 0.0;
        }
        if self.tint_flash_duration < 0.0 {
            self.tint_flash_duration = 0.0;
        }
        if self.questions_per_battle == 0 {
            log::warn!("questions_per_battle 0 unusable, using 3");
            self.questions_per_battle = 3;
        }
        if self.move_speed <= 0.0 {
            log::warn!("move_speed {} unusable, using 4.0", self.move_speed);
            self.move_speed = 4.0;
        }
        if self.turn_speed <= 0.0 {
            self.turn_speed = 2.4;
        }
        if self.gravity <= 0.0 {
            log::warn!("gravity {} unusable, using 18.0", self.gravity);
            self.gravity = 18.0;
        }
        if self.jump_speed < 0.0 {
            self.jump_speed = 0.0;
        }
        if self.max_health < 1 {
            log::warn!("max_health {} unusable, using 100", self.max_health);
            self.max_health = 100;
        }
        if self.inventory_capacity == 0 {
            log::warn!("inventory_capacity 0 unusable, using 16");
            self.inventory_capacity = 16;
        }
        if self.loader_timeout <= 0.0 {
            self.loader_timeout = 10.0;
        }
        self
    }

    /// Write the default config to `path` as pretty RON for hand editing.
    pub fn export_default(path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
            }
        }
        let pretty = ron::ser::to_string_pretty(&Self::default(), ron::ser::PrettyConfig::default())
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        fs::write(path, pretty).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_survive_sanitize_unchanged() {
        let config = GameConfig::default();
        assert_eq!(config.clone().sanitized(), config);
    }

    #[test]
    fn test_sanitize_repairs_inverted_radii() {
        let mut config = GameConfig::default();
        config.foe_awareness.exit_radius = 1.0; // inside enter_radius
        config.foe_awareness.engage_radius = 9.0; // beyond enter_radius
        let fixed = config.sanitized();
        assert!(fixed.foe_awareness.exit_radius > fixed.foe_awareness.enter_radius);
        assert!(fixed.foe_awareness.engage_radius <= fixed.foe_awareness.enter_radius);
    }

    #[test]
    fn test_sanitize_rejects_bad_scalars() {
        let mut config = GameConfig::default();
        config.scan_skip_chance = 1.5;
        config.move_speed = -1.0;
        config.max_health = 0;
        config.inventory_capacity = 0;
        let fixed = config.sanitized();
        assert_eq!(fixed.scan_skip_chance, 0.25);
        assert_eq!(fixed.move_speed, 4.0);
        assert_eq!(fixed.max_health, 100);
        assert_eq!(fixed.inventory_capacity, 16);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ron");
        let mut file = fs::File::create(&path).unwrap();
        write!(file, "(move_speed: 6.5)").unwrap();

        let config = GameConfig::load(&path);
        assert_eq!(config.move_speed, 6.5);
        assert_eq!(config.max_health, 100);
        assert_eq!(config.inventory_capacity, 16);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = GameConfig::load(Path::new("no/such/config.ron"));
        assert_eq!(config, GameConfig::default());
    }
}
