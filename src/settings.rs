//! Device settings
//!
//! The host decides which profile applies (the core never sniffs devices).

use serde::{Deserialize, Serialize};

use crate::consts::BASE_SPRITE_SIZE;

/// Device profile levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DeviceProfile {
    #[default]
    Desktop,
    /// Small or touch screens: smaller sprites, pickier spawn cells
    Compact,
}

impl DeviceProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceProfile::Desktop => "Desktop",
            DeviceProfile::Compact => "Compact",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "desktop" => Some(DeviceProfile::Desktop),
            "compact" | "mobile" => Some(DeviceProfile::Compact),
            _ => None,
        }
    }

    /// Multiplier applied to sprite base sizes
    pub fn sprite_scale(&self) -> f32 {
        match self {
            DeviceProfile::Desktop => 1.0,
            DeviceProfile::Compact => 0.6,
        }
    }

    /// Whether spawn cells must have all four neighbors open (vs. three)
    pub fn strict_spawn(&self) -> bool {
        match self {
            DeviceProfile::Desktop => false,
            DeviceProfile::Compact => true,
        }
    }

    /// Minimum number of open neighbors a spawn cell needs
    pub fn spawn_openness(&self) -> u8 {
        if self.strict_spawn() { 4 } else { 3 }
    }
}

/// Host-facing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub profile: DeviceProfile,
    /// RNG seed; `None` lets the host pick one (e.g. from the clock)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            profile: DeviceProfile::Desktop,
            seed: None,
        }
    }
}

impl Settings {
    /// Create settings for a device profile
    pub fn from_profile(profile: DeviceProfile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Edge length of a scaled sprite whose base size is `base`
    pub fn scaled(&self, base: f32) -> f32 {
        base * self.profile.sprite_scale()
    }

    /// Nominal entity edge used for spawn-cell centering
    pub fn nominal_entity_size(&self) -> f32 {
        self.scaled(BASE_SPRITE_SIZE)
    }
}
