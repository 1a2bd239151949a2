mod ops;

use msb_api::event::RecordingId;
use msb_api::settings::{QuickAction, Settings};
use msb_api::{Error, KeyCode, KeyCombo, Result};
use msb_core::collections::HashMap;

use crate::id_allocator::IdAllocator;
use crate::object::{Hub, Uuid};

/// Tracks held keys and decides when the held combination is dispatched.
#[derive(Debug)]
pub struct KeyState {
    pressed: KeyCombo,
    processed_on_release: bool,
}

impl KeyState {
    pub fn new() -> KeyState {
        KeyState {
            pressed: KeyCombo::new(),
            processed_on_release: true,
        }
    }

    pub fn pressed(&self) -> &KeyCombo {
        &self.pressed
    }

    /// Returns the combination to dispatch, if any.
    ///
    /// Auto-repeat of a held key is ignored entirely.
    pub fn key_down(&mut self, key: KeyCode, on_release: bool) -> Option<KeyCombo> {
        if !self.pressed.push(key) {
            return None;
        }

        self.processed_on_release = false;

        if on_release {
            None
        } else {
            Some(self.pressed.clone())
        }
    }

    /// Returns the combination to dispatch, if any. The combination still
    /// contains the released key.
    pub fn key_up(&mut self, key: KeyCode, on_release: bool) -> Option<KeyCombo> {
        let mut dispatch = None;

        if on_release && !self.processed_on_release {
            dispatch = Some(self.pressed.clone());
            self.processed_on_release = true;
        }

        self.pressed.remove(key);
        dispatch
    }
}

impl Default for KeyState {
    fn default() -> KeyState {
        KeyState::new()
    }
}

/// Quick actions bound to `combo`, in declaration order.
///
/// While keybinds are disabled only `ToggleKeybinds` is considered. It is
/// always evaluated last so the other actions see the state from before the
/// toggle.
pub fn match_actions(settings: &Settings, combo: &KeyCombo) -> Vec<QuickAction> {
    let mut actions = Vec::new();

    if settings.keybinds_enabled {
        actions.extend(
            settings
                .action_bindings()
                .filter(|&(action, keys)| action != QuickAction::ToggleKeybinds && keys.matches(combo))
                .map(|(action, _)| action),
        );
    }

    if settings
        .action_keys(QuickAction::ToggleKeybinds)
        .is_some_and(|keys| keys.matches(combo))
    {
        actions.push(QuickAction::ToggleKeybinds);
    }

    actions
}

/// The first soundboard, in display order, bound to `combo`.
pub fn match_soundboard(hub: &Hub, combo: &KeyCombo) -> Option<Uuid> {
    hub.soundboards_in_order()
        .find(|soundboard| soundboard.props.keys.matches(combo))
        .map(|soundboard| soundboard.uuid())
}

/// Every playable inside `soundboard` bound to `combo`, pre-order.
pub fn match_playables(hub: &Hub, soundboard: Uuid, combo: &KeyCombo) -> Vec<Uuid> {
    hub.find_playables_recursive(soundboard, |playable| playable.props().keys.matches(combo))
}

/// Open key recording sessions, each holding the last combination it saw.
#[derive(Debug, Default)]
pub struct Recordings {
    ids: IdAllocator<RecordingId>,
    sessions: HashMap<RecordingId, KeyCombo>,
}

impl Recordings {
    pub fn start(&mut self) -> RecordingId {
        let id = self.ids.next();
        self.sessions.insert(id, KeyCombo::new());
        id
    }

    pub fn stop(&mut self, id: RecordingId) -> Result<KeyCombo> {
        self.sessions.remove(&id).ok_or(Error::UnknownRecording)
    }

    /// Records `combo` in every session and returns the sessions that saw it.
    pub fn update(&mut self, combo: &KeyCombo) -> Vec<RecordingId> {
        let mut ids = Vec::with_capacity(self.sessions.len());

        for (&id, recorded) in &mut self.sessions {
            recorded.clone_from(combo);
            ids.push(id);
        }

        ids.sort_unstable();
        ids
    }
}
