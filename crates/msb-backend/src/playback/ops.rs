use msb_api::media::{AudioSource, DeviceRoute, InstanceId, UiCue};
use msb_api::{Error, Event, Result};
use msb_core::collections::HashSet;
use tracing::{debug, instrument, warn};

use crate::hierarchy::Tree;
use crate::object::Uuid;
use crate::playable::{Container, Playable};
use crate::{resolver, Backend};

impl Backend {
    /// An empty group is not an error: nothing starts and `Ok` is returned.
    #[instrument(skip_all, fields(%uuid), err)]
    pub fn play(&mut self, uuid: Uuid) -> Result<()> {
        self.hub.get::<Playable>(uuid)?;

        let tree = Tree::build_all(&self.hub);
        let playing_before = self.tracker.playing();

        // shared ancestors must not flip while replacing
        if !self.settings.overlap_sounds {
            self.stop_every_instance();
        }

        let sounds = match resolver::resolve(&mut self.hub, uuid, &mut self.rng) {
            Ok(sounds) => sounds,
            Err(error) if error.is_soft() => {
                debug!(%error, "Nothing to play");
                self.notify_changes(&tree, &tree, &playing_before);
                self.finish_playback_change();
                return Ok(());
            }
            Err(error) => return Err(error),
        };

        let mut failure = None;

        for sound in sounds {
            let result = self
                .audio_source(sound)
                .and_then(|source| self.tracker.start(&source));

            if let Err(error) = result {
                warn!(?error, %sound, "Failed to start sound");
                failure = Some(error);
            }
        }

        self.notify_changes(&tree, &tree, &playing_before);
        self.finish_playback_change();

        if let Some(error) = failure {
            self.tracker.play_cue(UiCue::Error);
            self.notify(Event::PlayError {
                message: error.to_string(),
            });
            return Err(error);
        }

        Ok(())
    }

    /// Stops the oldest playing instance of a sound. Does nothing if none plays.
    #[instrument(skip_all, fields(%uuid), err)]
    pub fn stop_instance(&mut self, uuid: Uuid) -> Result<()> {
        if self.tracker.instance_count(uuid) == 0 {
            return Ok(());
        }

        let tree = Tree::build_all(&self.hub);
        let playing_before = self.tracker.playing();

        self.tracker.stop_one(uuid);
        self.notify_changes(&tree, &tree, &playing_before);

        if self.tracker.instance_count(uuid) == 0 {
            self.notify(Event::Stopped { uuid });
        }

        self.finish_playback_change();
        Ok(())
    }

    /// Stops every instance of a sound, or of every sound inside a group or soundboard.
    #[instrument(skip_all, fields(%uuid), err)]
    pub fn stop(&mut self, uuid: Uuid) -> Result<()> {
        let sounds = match self.hub.playables.get(uuid) {
            Some(Playable::Sound(_)) => vec![uuid],
            _ => {
                let tree = Tree::build(&self.hub, uuid)?;
                tree.sounds(&self.hub).collect()
            }
        };

        self.stop_multiple(&sounds);
        Ok(())
    }

    #[instrument(skip_all, fields(count = uuids.len()))]
    pub fn stop_multiple(&mut self, uuids: &[Uuid]) {
        let tree = Tree::build_all(&self.hub);
        let playing_before = self.tracker.playing();

        for &uuid in uuids {
            self.stop_instances_of(uuid);
        }

        self.notify_changes(&tree, &tree, &playing_before);
        self.finish_playback_change();
    }

    #[instrument(skip_all)]
    pub fn stop_all(&mut self) {
        self.stop_all_internal();
        self.finish_playback_change();
    }

    /// Called by the media layer when an instance reaches its end.
    #[instrument(skip_all, fields(?id))]
    pub fn instance_ended(&mut self, id: InstanceId) {
        let tree = Tree::build_all(&self.hub);
        let playing_before = self.tracker.playing();

        let Some(uuid) = self.tracker.remove_instance(id) else {
            debug!("Instance already gone");
            return;
        };

        self.notify_changes(&tree, &tree, &playing_before);

        if self.tracker.instance_count(uuid) == 0 {
            self.notify(Event::Stopped { uuid });
        }

        self.finish_playback_change();
    }

    pub fn playing_instance_count(&self, uuid: Uuid) -> usize {
        self.tracker.instance_count(uuid)
    }

    pub fn is_any_playing(&self) -> bool {
        self.tracker.is_any_playing()
    }

    pub fn is_playing(&self, uuid: Uuid) -> bool {
        self.tracker
            .playing()
            .into_iter()
            .any(|playing| playing == uuid || self.hub.ancestors(playing).contains(&uuid))
    }

    /// Product of the volumes along the chain from the playable up to its soundboard.
    pub fn effective_volume(&self, uuid: Uuid) -> Result<f32> {
        let mut volume = self.hub.get::<Playable>(uuid)?.props().gain();

        for ancestor in self.hub.ancestors(uuid) {
            volume *= self.hub.container(ancestor)?.props().gain();
        }

        Ok(volume)
    }

    pub(crate) fn notify_move(&mut self, tree_before: &Tree, tree_after: &Tree) {
        let playing = self.tracker.playing();
        let changes = super::changes(tree_before, tree_after, &playing, &playing);
        self.notify_playing_changes(changes);
    }

    fn stop_all_internal(&mut self) {
        let tree = Tree::build_all(&self.hub);
        let playing_before = self.tracker.playing();

        self.stop_every_instance();
        self.notify_changes(&tree, &tree, &playing_before);
    }

    /// Stops everything, emitting `Stopped` but no playing-state diff.
    fn stop_every_instance(&mut self) {
        let mut seen = HashSet::default();
        for uuid in self.tracker.playing() {
            if seen.insert(uuid) {
                self.stop_instances_of(uuid);
            }
        }
    }

    fn stop_instances_of(&mut self, uuid: Uuid) {
        if self.tracker.stop_all_of(uuid) > 0 {
            self.notify(Event::Stopped { uuid });
        }
    }

    fn notify_changes(&mut self, tree_before: &Tree, tree_after: &Tree, playing_before: &[Uuid]) {
        let playing_after = self.tracker.playing();
        let changes = super::changes(tree_before, tree_after, playing_before, &playing_after);
        self.notify_playing_changes(changes);
    }

    fn notify_playing_changes(&mut self, changes: super::Changes) {
        if !changes.removed.is_empty() {
            self.notify(Event::NotPlaying {
                uuids: changes.removed,
            });
        }

        if !changes.added.is_empty() {
            self.notify(Event::Playing {
                uuids: changes.added,
            });
        }
    }

    fn finish_playback_change(&mut self) {
        self.tracker.update_hold(&self.settings.ptt_keys);

        if let Some(uuid) = self.tracker.update_single() {
            self.notify(Event::SingleInstanceChanged { uuid });
        }
    }

    fn audio_source(&self, sound: Uuid) -> Result<AudioSource> {
        let Some(Playable::Sound(data)) = self.hub.playables.get(sound) else {
            return Err(Error::NotFound { uuid: sound });
        };

        let volume = self.effective_volume(sound)?;
        let routes = self
            .settings
            .devices()
            .into_iter()
            .map(|(device, device_volume)| {
                let gain = f32::from(device_volume) / 100.0 * volume;
                DeviceRoute {
                    device: device.to_owned(),
                    gain: gain * gain,
                }
            })
            .collect();

        Ok(AudioSource {
            uuid: sound,
            path: data.path.clone(),
            routes,
            looping: self.settings.loop_sounds,
        })
    }
}
