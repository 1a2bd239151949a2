use std::collections::BTreeMap;

use camino::Utf8PathBuf;
use msb_core::keys::KeyCombo;
use msb_core::Uuid;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Global actions that can be bound to a key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QuickAction {
    StopSounds,
    PlayRandomSound,
    ToggleKeybinds,
    ToggleSoundOverlap,
    ToggleSoundLooping,
}

impl QuickAction {
    pub const ALL: [QuickAction; 5] = [
        QuickAction::StopSounds,
        QuickAction::PlayRandomSound,
        QuickAction::ToggleKeybinds,
        QuickAction::ToggleSoundOverlap,
        QuickAction::ToggleSoundLooping,
    ];

    pub fn friendly_name(self) -> &'static str {
        match self {
            QuickAction::StopSounds => "Stop sounds",
            QuickAction::PlayRandomSound => "Play random sound",
            QuickAction::ToggleKeybinds => "Keybinds",
            QuickAction::ToggleSoundOverlap => "Overlap sounds",
            QuickAction::ToggleSoundLooping => "Loop sounds",
        }
    }

    pub fn is_toggle(self) -> bool {
        !matches!(self, QuickAction::StopSounds | QuickAction::PlayRandomSound)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub main_device: String,
    pub main_device_volume: u8,
    pub secondary_device: Option<String>,
    pub secondary_device_volume: u8,
    pub selected_soundboard: Option<Uuid>,
    pub sounds_location: Option<Utf8PathBuf>,
    pub ptt_keys: KeyCombo,
    pub process_keys_on_release: bool,
    pub keybinds_enabled: bool,
    pub overlap_sounds: bool,
    pub loop_sounds: bool,
    action_keys: BTreeMap<QuickAction, KeyCombo>,
}

impl Settings {
    pub fn action_keys(&self, action: QuickAction) -> Option<&KeyCombo> {
        self.action_keys.get(&action)
    }

    /// Binds `action` to `keys`. An empty combination unbinds it.
    ///
    /// Two actions can never share a combination.
    pub fn set_action_keys(&mut self, action: QuickAction, keys: KeyCombo) -> Result<()> {
        if keys.is_empty() {
            self.action_keys.remove(&action);
            return Ok(());
        }

        let taken = self
            .action_keys
            .iter()
            .any(|(&other, other_keys)| other != action && *other_keys == keys);

        if taken {
            return Err(Error::DuplicateBinding);
        }

        self.action_keys.insert(action, keys);
        Ok(())
    }

    pub fn action_bindings(&self) -> impl Iterator<Item = (QuickAction, &KeyCombo)> + '_ {
        self.action_keys.iter().map(|(&action, keys)| (action, keys))
    }

    /// State of a toggle action, `None` for one-shot actions.
    pub fn action_state(&self, action: QuickAction) -> Option<bool> {
        match action {
            QuickAction::ToggleKeybinds => Some(self.keybinds_enabled),
            QuickAction::ToggleSoundOverlap => Some(self.overlap_sounds),
            QuickAction::ToggleSoundLooping => Some(self.loop_sounds),
            QuickAction::StopSounds | QuickAction::PlayRandomSound => None,
        }
    }

    /// Flips a toggle action and returns the new state.
    pub fn toggle(&mut self, action: QuickAction) -> Option<bool> {
        let state = match action {
            QuickAction::ToggleKeybinds => &mut self.keybinds_enabled,
            QuickAction::ToggleSoundOverlap => &mut self.overlap_sounds,
            QuickAction::ToggleSoundLooping => &mut self.loop_sounds,
            QuickAction::StopSounds | QuickAction::PlayRandomSound => return None,
        };

        *state = !*state;
        Some(*state)
    }

    /// Output devices with their volume in percent. The main device is always first.
    pub fn devices(&self) -> Vec<(&str, u8)> {
        let mut devices = vec![(self.main_device.as_str(), self.main_device_volume)];

        if let Some(secondary) = self.secondary_device.as_deref().filter(|v| !v.is_empty()) {
            devices.push((secondary, self.secondary_device_volume));
        }

        devices
    }
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            main_device: "default".into(),
            main_device_volume: 100,
            secondary_device: None,
            secondary_device_volume: 100,
            selected_soundboard: None,
            sounds_location: None,
            ptt_keys: KeyCombo::new(),
            process_keys_on_release: false,
            keybinds_enabled: true,
            overlap_sounds: true,
            loop_sounds: false,
            action_keys: BTreeMap::new(),
        }
    }
}
