use msb_api::settings::{QuickAction, Settings};
use msb_api::{Event, KeyCombo, Result};
use tracing::instrument;

use crate::Backend;

impl Backend {
    #[instrument(skip_all, fields(?action), err)]
    pub fn set_action_keys(&mut self, action: QuickAction, keys: KeyCombo) -> Result<()> {
        self.settings.set_action_keys(action, keys)?;
        self.commit();
        Ok(())
    }

    /// Applies an edit to the settings, announcing toggled quick-action states.
    #[instrument(skip_all)]
    pub fn update_settings(&mut self, edit: impl FnOnce(&mut Settings)) {
        let before = self.settings.clone();
        edit(&mut self.settings);

        if before.keybinds_enabled != self.settings.keybinds_enabled {
            self.notify(Event::KeybindsStateChanged {
                enabled: self.settings.keybinds_enabled,
            });
        }

        if before.overlap_sounds != self.settings.overlap_sounds {
            self.notify(Event::OverlapSoundsStateChanged {
                enabled: self.settings.overlap_sounds,
            });
        }

        if before.loop_sounds != self.settings.loop_sounds {
            self.tracker.set_looping(self.settings.loop_sounds);
            self.notify(Event::LoopSoundsStateChanged {
                enabled: self.settings.loop_sounds,
            });
        }

        if before != self.settings {
            self.commit();
        }
    }
}
