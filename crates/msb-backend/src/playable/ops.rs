use camino::{Utf8Path, Utf8PathBuf};
use msb_api::playable::{GroupData, PlayableData, SoundData, SoundboardData};
use msb_api::{Error, Event, Result};
use msb_core::collections::HashSet;
use tracing::{debug, instrument, warn};

use super::{Container, Group, Playable, Properties, Sound, Soundboard};
use crate::hierarchy::Tree;
use crate::object::Uuid;
use crate::Backend;

/// Name of the soundboard created when sounds are added without a destination.
pub const QUICK_SOUNDBOARD_NAME: &str = "Quick Sounds";

impl Backend {
    /// The selected soundboard, falling back to the first one.
    pub fn current_soundboard(&self) -> Option<Uuid> {
        self.settings
            .selected_soundboard
            .filter(|&uuid| self.hub.soundboards.has(uuid))
            .or_else(|| self.hub.soundboard_order.first().copied())
    }

    pub fn get_soundboard(&self, uuid: Uuid) -> Result<SoundboardData> {
        Ok(self.hub.get::<Soundboard>(uuid)?.to_data())
    }

    pub fn get_playable(&self, uuid: Uuid) -> Result<PlayableData> {
        Ok(self.hub.get::<Playable>(uuid)?.to_data())
    }

    pub fn get_children(&self, container: Uuid) -> Result<Vec<PlayableData>> {
        let children = self.hub.children(container)?;
        children
            .iter()
            .map(|&uuid| self.get_playable(uuid))
            .collect()
    }

    #[instrument(skip_all, fields(%uuid), err)]
    pub fn set_current_soundboard(&mut self, uuid: Uuid) -> Result<()> {
        let soundboard = self.get_soundboard(uuid)?;

        if self.settings.selected_soundboard == Some(uuid) {
            return Ok(());
        }

        self.settings.selected_soundboard = Some(uuid);
        self.notify(Event::CurrentSoundboardChanged { soundboard });
        self.commit();

        Ok(())
    }

    #[instrument(skip_all, err)]
    pub fn create_soundboard(&mut self, data: SoundboardData) -> Result<Uuid> {
        self.check_new_uuid(data.uuid)?;

        let soundboard = Soundboard::from_data(data);
        soundboard.props.validate()?;

        let uuid = soundboard.uuid();
        self.hub.soundboards.insert(soundboard)?;
        self.hub.soundboard_order.insert(0, uuid);

        self.notify(Event::SoundboardAdded {
            soundboard: self.get_soundboard(uuid)?,
            index: 0,
            is_current: true,
        });

        if let Err(error) = self.sync_linked_folder(uuid) {
            warn!(?error, %uuid, "Failed to sync linked folder");
        }

        self.settings.selected_soundboard = Some(uuid);
        self.notify(Event::CurrentSoundboardChanged {
            soundboard: self.get_soundboard(uuid)?,
        });
        self.commit();

        Ok(uuid)
    }

    /// Updates a soundboard's properties. Linking it to a different folder
    /// resynchronizes its contents.
    #[instrument(skip_all, err)]
    pub fn edit_soundboard(&mut self, data: SoundboardData) -> Result<()> {
        let uuid = data.uuid;
        let edited = Soundboard::from_data(data);
        edited.props.validate()?;

        let soundboard = self.hub.get_mut::<Soundboard>(uuid)?;
        let relinked = soundboard.linked_folder != edited.linked_folder;
        soundboard.props = edited.props;
        soundboard.linked_folder = edited.linked_folder;

        if relinked {
            if let Err(error) = self.sync_linked_folder(uuid) {
                warn!(?error, %uuid, "Failed to sync linked folder");
            }
        }

        self.notify(Event::SoundboardChanged {
            soundboard: self.get_soundboard(uuid)?,
        });
        self.commit();

        Ok(())
    }

    #[instrument(skip_all, fields(%uuid, index), err)]
    pub fn move_soundboard(&mut self, uuid: Uuid, index: usize) -> Result<()> {
        let order = &mut self.hub.soundboard_order;
        let current = order
            .iter()
            .position(|&v| v == uuid)
            .ok_or(Error::NotFound { uuid })?;

        if index >= order.len() {
            return Err(Error::IndexOutOfBounds);
        }

        order.remove(current);
        order.insert(index, uuid);

        let soundboard = self.get_soundboard(uuid)?;
        self.notify(Event::SoundboardRemoved { uuid });
        self.notify(Event::SoundboardAdded {
            soundboard,
            index,
            is_current: self.current_soundboard() == Some(uuid),
        });
        self.commit();

        Ok(())
    }

    #[instrument(skip_all, fields(%uuid), err)]
    pub fn remove_soundboard(&mut self, uuid: Uuid) -> Result<()> {
        self.hub.get::<Soundboard>(uuid)?;
        let was_current = self.current_soundboard() == Some(uuid);

        self.stop(uuid)?;
        self.hub.delete_soundboard(uuid)?;

        if self.settings.selected_soundboard == Some(uuid) {
            self.settings.selected_soundboard = None;
        }

        self.notify(Event::SoundboardRemoved { uuid });

        if let Some(current) = self.current_soundboard().filter(|_| was_current) {
            self.settings.selected_soundboard = Some(current);
            self.notify(Event::CurrentSoundboardChanged {
                soundboard: self.get_soundboard(current)?,
            });
        }

        self.commit();

        Ok(())
    }

    /// With `move_files` and a configured sounds location, the files are moved
    /// there first. Returns the container the sounds were added to.
    #[instrument(skip_all, err)]
    pub fn add_sounds(
        &mut self,
        sounds: Vec<SoundData>,
        destination: Option<Uuid>,
        move_files: bool,
        index: Option<usize>,
    ) -> Result<Uuid> {
        let mut seen = HashSet::default();
        for sound in &sounds {
            self.check_new_uuid(sound.uuid)?;
            if !seen.insert(sound.uuid) {
                return Err(Error::new_internal(format!("uuid {} is repeated", sound.uuid)));
            }
            if sound.volume > 100 {
                return Err(Error::InvalidVolume);
            }
        }

        if let Some(destination) = destination {
            self.check_insert_index(destination, index)?;
        }

        let container = self.destination_or_quick(destination)?;
        let mut index = match (destination, index) {
            (Some(_), Some(index)) => index,
            _ => self.hub.children(container)?.len(),
        };

        let target = self.settings.sounds_location.clone().filter(|_| move_files);
        let mut result = Ok(container);

        for data in sounds {
            let mut sound = Sound::from_data(data);

            if let Some(target) = &target {
                match move_sound_file(&sound.path, target) {
                    Ok(path) => sound.path = path,
                    Err(error) => {
                        result = Err(error);
                        break;
                    }
                }
            }

            let uuid = sound.uuid();
            self.hub.playables.insert(Playable::Sound(sound))?;
            self.hub.add_playable(container, uuid, Some(index))?;
            self.notify_playable_added(container, uuid, index)?;
            index += 1;
        }

        self.commit();
        result
    }

    #[instrument(skip_all, err)]
    pub fn add_group(
        &mut self,
        data: GroupData,
        destination: Uuid,
        index: Option<usize>,
    ) -> Result<()> {
        self.check_new_uuid(data.uuid)?;
        self.check_insert_index(destination, index)?;

        let group = Group::from_data(data);
        group.props.validate()?;

        let uuid = group.uuid();
        self.hub.playables.insert(Playable::Group(group))?;
        let index = self.hub.add_playable(destination, uuid, index)?;
        self.notify_playable_added(destination, uuid, index)?;
        self.commit();

        Ok(())
    }

    #[instrument(skip_all, err)]
    pub fn edit_playable(&mut self, data: PlayableData) -> Result<()> {
        let uuid = data.uuid();
        let edited = Playable::from_data(data);
        edited.props().validate()?;

        match (self.hub.get_mut::<Playable>(uuid)?, edited) {
            (Playable::Sound(sound), Playable::Sound(edited)) => {
                sound.props = edited.props;
                sound.path = edited.path;
            }
            (Playable::Group(group), Playable::Group(edited)) => {
                group.props = edited.props;
                group.mode = edited.mode;
            }
            _ => return Err(Error::NotFound { uuid }),
        }

        self.notify(Event::PlayableChanged {
            playable: self.get_playable(uuid)?,
        });
        self.commit();

        Ok(())
    }

    /// Moves a playable into `destination`, or places a deep copy of it there.
    /// Without a destination a new quick soundboard is used.
    ///
    /// Returns the uuid of the placed playable (a fresh one for copies).
    #[instrument(skip_all, fields(%uuid, is_move), err)]
    pub fn copy_or_move(
        &mut self,
        uuid: Uuid,
        destination: Option<Uuid>,
        index: Option<usize>,
        is_move: bool,
    ) -> Result<Uuid> {
        let source = self.hub.get::<Playable>(uuid)?.parent();

        if let Some(destination) = destination {
            self.hub.check_unlinked(destination)?;

            if is_move && (destination == uuid || self.hub.ancestors(destination).contains(&uuid)) {
                return Err(Error::RecursiveGroup);
            }

            let mut len = self.hub.children(destination)?.len();
            if is_move && source == Some(destination) {
                len -= 1;
            }

            if index.is_some_and(|index| index > len) {
                return Err(Error::IndexOutOfBounds);
            }
        }

        if is_move {
            if let Some(source) = source {
                self.hub.check_unlinked(source)?;
            }
        }

        let destination = self.destination_or_quick(destination)?;
        let tree_before = Tree::build_all(&self.hub);

        let placed = if is_move {
            if self.hub.detach_playable(uuid)?.is_some() {
                self.notify(Event::PlayableRemoved { uuid });
            }
            uuid
        } else {
            self.hub.copy_playable(uuid, &mut Uuid::new_v4)?
        };

        let index = self.hub.add_playable(destination, placed, index)?;
        self.notify_playable_added(destination, placed, index)?;

        if is_move {
            let tree_after = Tree::build_all(&self.hub);
            self.notify_move(&tree_before, &tree_after);
        }

        self.commit();
        Ok(placed)
    }

    #[instrument(skip_all, fields(%uuid), err)]
    pub fn remove_playable(&mut self, uuid: Uuid) -> Result<()> {
        if let Some(parent) = self.hub.get::<Playable>(uuid)?.parent() {
            self.hub.check_unlinked(parent)?;
        }

        self.discard_playable(uuid)?;
        self.commit();

        Ok(())
    }

    /// Stops, detaches and drops a playable without any linked-folder checks.
    pub(crate) fn discard_playable(&mut self, uuid: Uuid) -> Result<()> {
        self.stop(uuid)?;
        self.hub.delete_playable(uuid)?;
        self.notify(Event::PlayableRemoved { uuid });
        Ok(())
    }

    /// Replaces `main` in its container with a new group named after it,
    /// holding `main` followed by `second` (or a copy of `second`).
    #[instrument(skip_all, fields(%main, %second, copy), err)]
    pub fn create_group(&mut self, main: Uuid, second: Uuid, copy: bool) -> Result<Uuid> {
        let main_playable = self.hub.get::<Playable>(main)?;
        let name = main_playable.props().name.clone();
        let parent = main_playable.parent().ok_or(Error::NotFound { uuid: main })?;
        let second_parent = self.hub.get::<Playable>(second)?.parent();

        if main == second || self.hub.ancestors(main).contains(&second) {
            return Err(Error::RecursiveGroup);
        }

        self.hub.check_unlinked(parent)?;
        if !copy {
            if let Some(second_parent) = second_parent {
                self.hub.check_unlinked(second_parent)?;
            }
        }

        let second = if copy {
            self.hub.copy_playable(second, &mut Uuid::new_v4)?
        } else {
            if self.hub.detach_playable(second)?.is_some() {
                self.notify(Event::PlayableRemoved { uuid: second });
            }
            second
        };

        let index = self.hub.remove_playable(parent, main)?;
        self.notify(Event::PlayableRemoved { uuid: main });

        let group = Group::new(Uuid::new_v4(), Properties::new(name), Default::default());
        let uuid = group.uuid();
        self.hub.playables.insert(Playable::Group(group))?;
        self.hub.add_playable(uuid, main, None)?;
        self.hub.add_playable(uuid, second, None)?;

        self.hub.add_playable(parent, uuid, Some(index))?;
        self.notify_playable_added(parent, uuid, index)?;
        self.commit();

        Ok(uuid)
    }

    #[instrument(skip_all, fields(%uuid), err)]
    pub fn ungroup(&mut self, uuid: Uuid) -> Result<()> {
        let Playable::Group(group) = self.hub.get::<Playable>(uuid)? else {
            return Err(Error::NotFound { uuid });
        };

        let children = group.children().to_vec();
        let Some(parent) = group.parent else {
            debug!("Group has no container");
            return Ok(());
        };

        self.hub.check_unlinked(parent)?;

        let mut index = self.hub.remove_playable(parent, uuid)?;
        self.notify(Event::PlayableRemoved { uuid });

        for child in children {
            self.hub.remove_playable(uuid, child)?;
            self.hub.add_playable(parent, child, Some(index))?;
            self.notify_playable_added(parent, child, index)?;
            index += 1;
        }

        self.hub.playables.remove(uuid);
        self.commit();

        Ok(())
    }

    #[instrument(skip_all, fields(%uuid), err)]
    pub fn sort_container(&mut self, uuid: Uuid) -> Result<()> {
        self.hub.check_unlinked(uuid)?;

        let mut keyed = self
            .hub
            .children(uuid)?
            .iter()
            .map(|&child| {
                let name = self
                    .hub
                    .playables
                    .get(child)
                    .map(|v| v.props().name.to_lowercase())
                    .unwrap_or_default();
                (name, child)
            })
            .collect::<Vec<_>>();

        keyed.sort_by(|a, b| a.0.cmp(&b.0));

        let children = keyed.into_iter().map(|(_, child)| child).collect::<Vec<_>>();
        self.hub
            .container_mut(uuid)?
            .children_mut()
            .clone_from(&children);

        self.notify(Event::ContainerSorted {
            container: uuid,
            children,
        });
        self.commit();

        Ok(())
    }

    fn destination_or_quick(&mut self, destination: Option<Uuid>) -> Result<Uuid> {
        match destination {
            Some(destination) => {
                self.hub.check_unlinked(destination)?;
                Ok(destination)
            }
            None => self.create_soundboard(SoundboardData::new(QUICK_SOUNDBOARD_NAME)),
        }
    }

    fn check_insert_index(&self, container: Uuid, index: Option<usize>) -> Result<()> {
        self.hub.check_unlinked(container)?;

        let len = self.hub.children(container)?.len();
        if index.is_some_and(|index| index > len) {
            return Err(Error::IndexOutOfBounds);
        }

        Ok(())
    }

    fn check_new_uuid(&self, uuid: Uuid) -> Result<()> {
        if self.hub.playables.has(uuid) || self.hub.soundboards.has(uuid) {
            return Err(Error::new_internal(format!("uuid {uuid} is already in use")));
        }

        Ok(())
    }

    pub(crate) fn notify_playable_added(
        &mut self,
        parent: Uuid,
        uuid: Uuid,
        index: usize,
    ) -> Result<()> {
        let playable = self.get_playable(uuid)?;
        let is_playing = self.is_playing(uuid);

        self.notify(Event::PlayableAdded {
            parent,
            playable,
            index,
            is_playing,
        });

        Ok(())
    }
}

fn move_sound_file(path: &Utf8Path, directory: &Utf8Path) -> Result<Utf8PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| Error::new_filesystem(path, "path has no file name"))?;
    let destination = directory.join(file_name);

    std::fs::create_dir_all(directory).map_err(|e| Error::new_filesystem(directory, e))?;
    std::fs::rename(path, &destination).map_err(|e| Error::new_filesystem(path, e))?;

    debug!(from = %path, to = %destination, "Moved sound file");
    Ok(destination)
}
