use msb_api::event::RecordingId;
use msb_api::media::UiCue;
use msb_api::settings::QuickAction;
use msb_api::{Event, KeyCode, KeyCombo, Result};
use rand::Rng;
use tracing::{debug, instrument, warn};

use crate::Backend;

impl Backend {
    #[instrument(skip_all, fields(%key))]
    pub fn key_down(&mut self, key: KeyCode) {
        let on_release = self.settings.process_keys_on_release;
        if let Some(combo) = self.key_state.key_down(key, on_release) {
            self.handle_combination(&combo);
        }
    }

    #[instrument(skip_all, fields(%key))]
    pub fn key_up(&mut self, key: KeyCode) {
        let on_release = self.settings.process_keys_on_release;
        if let Some(combo) = self.key_state.key_up(key, on_release) {
            self.handle_combination(&combo);
        }
    }

    /// Runs everything bound to `combo`: quick actions first, then the
    /// soundboard switch, then the playables of the (possibly new) current
    /// soundboard. Only `ToggleKeybinds` works while keybinds are disabled.
    #[instrument(skip_all, fields(%combo))]
    pub fn handle_combination(&mut self, combo: &KeyCombo) {
        for session in self.recordings.update(combo) {
            self.notify(Event::KeyRecordingProgress {
                session,
                combination: combo.clone(),
            });
        }

        if self.settings.keybinds_enabled {
            self.notify(Event::KeybindPressed {
                combination: combo.clone(),
            });
        }

        for action in super::match_actions(&self.settings, combo) {
            if let Err(error) = self.run_quick_action(action) {
                warn!(?error, ?action, "Failed to run quick action");
            }
        }

        if !self.settings.keybinds_enabled {
            return;
        }

        if let Some(soundboard) = super::match_soundboard(&self.hub, combo) {
            if let Err(error) = self.set_current_soundboard(soundboard) {
                warn!(?error, %soundboard, "Failed to switch soundboard");
            }
        }

        let Some(current) = self.current_soundboard() else {
            return;
        };

        for uuid in super::match_playables(&self.hub, current, combo) {
            if let Err(error) = self.play(uuid) {
                debug!(?error, %uuid, "Triggered playable failed to play");
            }
        }
    }

    #[instrument(skip_all, fields(?action), err)]
    pub fn run_quick_action(&mut self, action: QuickAction) -> Result<()> {
        match action {
            QuickAction::StopSounds => self.stop_all(),
            QuickAction::PlayRandomSound => self.play_random_sound()?,
            QuickAction::ToggleKeybinds
            | QuickAction::ToggleSoundOverlap
            | QuickAction::ToggleSoundLooping => self.toggle_action(action),
        }

        Ok(())
    }

    pub fn start_key_recording(&mut self) -> RecordingId {
        self.recordings.start()
    }

    /// Ends a recording session and returns the last combination it saw.
    pub fn stop_key_recording(&mut self, id: RecordingId) -> Result<KeyCombo> {
        self.recordings.stop(id)
    }

    fn play_random_sound(&mut self) -> Result<()> {
        let Some(current) = self.current_soundboard() else {
            return Ok(());
        };

        let children = self.hub.children(current)?;
        if children.is_empty() {
            return Ok(());
        }

        let uuid = children[self.rng.gen_range(0..children.len())];
        self.play(uuid)
    }

    fn toggle_action(&mut self, action: QuickAction) {
        let Some(enabled) = self.settings.toggle(action) else {
            return;
        };

        debug!(?action, enabled, "Toggled quick action");

        let event = match action {
            QuickAction::ToggleKeybinds => {
                let cue = if enabled {
                    UiCue::KeybindsOn
                } else {
                    UiCue::KeybindsOff
                };
                self.tracker.play_cue(cue);
                Event::KeybindsStateChanged { enabled }
            }
            QuickAction::ToggleSoundOverlap => Event::OverlapSoundsStateChanged { enabled },
            QuickAction::ToggleSoundLooping => {
                self.tracker.set_looping(enabled);
                Event::LoopSoundsStateChanged { enabled }
            }
            QuickAction::StopSounds | QuickAction::PlayRandomSound => return,
        };

        self.notify(event);
        self.commit();
    }
}
