//! Global settings with static defaults.
//!
//! Settings are only ever changed in two ways: a partial overlay of the keys
//! present in a settings document, or a full reset to defaults when that
//! document is malformed. Reads are total.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_ENABLE_MUDDY_PIGS: bool = true;
pub const DEFAULT_MUDDY_PIG_TIMEOUT: u32 = 300;
pub const DEFAULT_CHILD_RANDOM_VARIANT_CHANCE: f64 = 0.0;

/// Every recognized setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    /// Enables the timed muddy-pig mechanic.
    EnableMuddyPigs,
    /// Duration of the muddy state. The unit belongs to the host.
    MuddyPigTimeout,
    /// Chance that offspring roll a random variant instead of inheriting one.
    ChildRandomVariantChance,
}

/// Declared type of a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingType {
    Boolean,
    Integer,
    Float,
}

/// A setting value tagged with its type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingValue {
    Boolean(bool),
    Integer(u32),
    Float(f64),
}

impl SettingKey {
    pub const ALL: [SettingKey; 3] = [
        SettingKey::EnableMuddyPigs,
        SettingKey::MuddyPigTimeout,
        SettingKey::ChildRandomVariantChance,
    ];

    /// Key used in the settings document.
    pub fn name(self) -> &'static str {
        match self {
            SettingKey::EnableMuddyPigs => "enable_muddy_pigs",
            SettingKey::MuddyPigTimeout => "muddy_pig_timeout",
            SettingKey::ChildRandomVariantChance => "child_random_variant_chance",
        }
    }

    pub fn value_type(self) -> SettingType {
        match self {
            SettingKey::EnableMuddyPigs => SettingType::Boolean,
            SettingKey::MuddyPigTimeout => SettingType::Integer,
            SettingKey::ChildRandomVariantChance => SettingType::Float,
        }
    }

    pub fn default_value(self) -> SettingValue {
        Settings::default().value(self)
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The full, always-populated set of settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub enable_muddy_pigs: bool,
    pub muddy_pig_timeout: u32,
    pub child_random_variant_chance: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable_muddy_pigs: DEFAULT_ENABLE_MUDDY_PIGS,
            muddy_pig_timeout: DEFAULT_MUDDY_PIG_TIMEOUT,
            child_random_variant_chance: DEFAULT_CHILD_RANDOM_VARIANT_CHANCE,
        }
    }
}

impl Settings {
    pub fn value(&self, key: SettingKey) -> SettingValue {
        match key {
            SettingKey::EnableMuddyPigs => SettingValue::Boolean(self.enable_muddy_pigs),
            SettingKey::MuddyPigTimeout => SettingValue::Integer(self.muddy_pig_timeout),
            SettingKey::ChildRandomVariantChance => {
                SettingValue::Float(self.child_random_variant_chance)
            }
        }
    }
}

/// A partial settings update; `None` keeps the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SettingsOverlay {
    pub enable_muddy_pigs: Option<bool>,
    pub muddy_pig_timeout: Option<u32>,
    pub child_random_variant_chance: Option<f64>,
}

impl SettingsOverlay {
    pub fn is_empty(&self) -> bool {
        self.enable_muddy_pigs.is_none()
            && self.muddy_pig_timeout.is_none()
            && self.child_random_variant_chance.is_none()
    }

    /// Keys this overlay would change.
    pub fn keys(&self) -> Vec<SettingKey> {
        let mut keys = Vec::new();
        if self.enable_muddy_pigs.is_some() {
            keys.push(SettingKey::EnableMuddyPigs);
        }
        if self.muddy_pig_timeout.is_some() {
            keys.push(SettingKey::MuddyPigTimeout);
        }
        if self.child_random_variant_chance.is_some() {
            keys.push(SettingKey::ChildRandomVariantChance);
        }
        keys
    }
}

/// Owner of the current [`Settings`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsStore {
    current: Settings,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set only the keys present in `overlay`.
    pub fn overlay(&mut self, overlay: &SettingsOverlay) {
        if let Some(enabled) = overlay.enable_muddy_pigs {
            self.current.enable_muddy_pigs = enabled;
        }
        if let Some(timeout) = overlay.muddy_pig_timeout {
            self.current.muddy_pig_timeout = timeout;
        }
        if let Some(chance) = overlay.child_random_variant_chance {
            self.current.child_random_variant_chance = chance;
        }
    }

    pub fn reset_to_defaults(&mut self) {
        self.current = Settings::default();
    }

    pub fn get(&self) -> Settings {
        self.current
    }

    pub fn value(&self, key: SettingKey) -> SettingValue {
        self.current.value(key)
    }

    /// Whether `key` currently holds its static default.
    pub fn is_default(&self, key: SettingKey) -> bool {
        self.value(key) == key.default_value()
    }
}
