
use camino::{Utf8Path, Utf8PathBuf};
use msb_api::playable::{is_sound_file, SoundData};
use msb_api::{Error, Result};
use tracing::{debug, instrument};

use crate::object::Uuid;
use crate::playable::{Container, Playable, Sound, Soundboard};
use crate::Backend;

impl Backend {
    /// Makes a linked soundboard's top-level sounds match the audio files in
    /// its folder. Returns whether anything changed.
    ///
    /// An unreadable folder is an error and leaves the soundboard untouched.
    #[instrument(skip_all, fields(%soundboard), err)]
    pub fn sync_linked_folder(&mut self, soundboard: Uuid) -> Result<bool> {
        let Some(folder) = self.hub.get::<Soundboard>(soundboard)?.linked_folder.clone() else {
            return Ok(false);
        };

        let files = list_sound_files(&folder)?;
        let mut changed = false;

        for path in &files {
            changed |= self.add_synced_sound(soundboard, path)?;
        }

        let stale = self
            .synced_sounds(soundboard)?
            .into_iter()
            .filter(|(_, path)| !files.contains(path))
            .map(|(uuid, _)| uuid)
            .collect::<Vec<_>>();

        for uuid in stale {
            self.discard_playable(uuid)?;
            changed = true;
        }

        if changed {
            debug!(%folder, "Linked folder changed");
            self.commit();
        }

        Ok(changed)
    }

    /// Reacts to a file appearing in a linked folder.
    #[instrument(skip_all, fields(%soundboard, %path), err)]
    pub fn folder_sound_added(&mut self, soundboard: Uuid, path: &Utf8Path) -> Result<bool> {
        let linked = self.hub.get::<Soundboard>(soundboard)?.linked_folder();
        if linked.is_none() || path.parent() != linked || !is_sound_file(path) {
            return Ok(false);
        }

        let changed = self.add_synced_sound(soundboard, path)?;
        if changed {
            self.commit();
        }

        Ok(changed)
    }

    /// Reacts to a file disappearing from a linked folder.
    #[instrument(skip_all, fields(%soundboard, %path), err)]
    pub fn folder_sound_removed(&mut self, soundboard: Uuid, path: &Utf8Path) -> Result<bool> {
        if !self.hub.get::<Soundboard>(soundboard)?.is_linked() {
            return Ok(false);
        }

        let Some((uuid, _)) = self
            .synced_sounds(soundboard)?
            .into_iter()
            .find(|(_, v)| v == path)
        else {
            return Ok(false);
        };

        self.discard_playable(uuid)?;
        self.commit();

        Ok(true)
    }

    fn add_synced_sound(&mut self, soundboard: Uuid, path: &Utf8Path) -> Result<bool> {
        if self.synced_sounds(soundboard)?.iter().any(|(_, v)| v == path) {
            return Ok(false);
        }

        let sound = Sound::from_data(SoundData::from_path(path.to_owned()));
        let uuid = sound.uuid();
        self.hub.playables.insert(Playable::Sound(sound))?;

        let index = self.hub.add_playable(soundboard, uuid, None)?;
        self.notify_playable_added(soundboard, uuid, index)?;

        Ok(true)
    }

    /// Top-level sounds of a soundboard with their paths.
    fn synced_sounds(&self, soundboard: Uuid) -> Result<Vec<(Uuid, Utf8PathBuf)>> {
        let sounds = self
            .hub
            .get::<Soundboard>(soundboard)?
            .children()
            .iter()
            .filter_map(|&uuid| self.hub.playables.get(uuid)?.as_sound())
            .map(|sound| (sound.uuid(), sound.path.clone()))
            .collect();

        Ok(sounds)
    }
}

/// Audio files directly inside `folder`, sorted by name.
fn list_sound_files(folder: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    let entries = folder
        .read_dir_utf8()
        .map_err(|e| Error::new_filesystem(folder, e))?;

    let mut files = Vec::new();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                debug!(?error, "Skipping unreadable folder entry");
                continue;
            }
        };

        let is_file = entry.file_type().is_ok_and(|v| v.is_file());
        if is_file && is_sound_file(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}
