use camino::Utf8Path;
use msb_api::{Error, Result};

use super::{Group, Playable, Properties, Soundboard};
use crate::object::{Hub, Uuid};

/// Something that owns an ordered list of playables: a group or a soundboard.
pub trait Container {
    fn uuid(&self) -> Uuid;

    fn props(&self) -> &Properties;

    fn children(&self) -> &[Uuid];

    fn children_mut(&mut self) -> &mut Vec<Uuid>;

    fn linked_folder(&self) -> Option<&Utf8Path> {
        None
    }
}

impl Container for Group {
    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn props(&self) -> &Properties {
        &self.props
    }

    fn children(&self) -> &[Uuid] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Uuid> {
        &mut self.children
    }
}

impl Container for Soundboard {
    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn props(&self) -> &Properties {
        &self.props
    }

    fn children(&self) -> &[Uuid] {
        &self.children
    }

    fn children_mut(&mut self) -> &mut Vec<Uuid> {
        &mut self.children
    }

    fn linked_folder(&self) -> Option<&Utf8Path> {
        self.linked_folder.as_deref()
    }
}

impl Hub {
    pub fn children(&self, container: Uuid) -> Result<&[Uuid]> {
        Ok(self.container(container)?.children())
    }

    /// Inserts an unparented playable into `container` at `index` (the end if `None`).
    /// Returns the index it ended up at.
    pub fn add_playable(
        &mut self,
        container: Uuid,
        playable: Uuid,
        index: Option<usize>,
    ) -> Result<usize> {
        let len = self.container(container)?.children().len();
        let child = self.get::<Playable>(playable)?;

        if child.parent().is_some() {
            return Err(Error::AlreadyParented { uuid: playable });
        }

        if child.is_group()
            && (container == playable || self.ancestors(container).contains(&playable))
        {
            return Err(Error::RecursiveGroup);
        }

        let index = index.unwrap_or(len);
        if index > len {
            return Err(Error::IndexOutOfBounds);
        }

        self.container_mut(container)?
            .children_mut()
            .insert(index, playable);
        self.get_mut::<Playable>(playable)?
            .set_parent(Some(container));

        Ok(index)
    }

    /// Detaches a direct child of `container`. The playable stays in storage.
    /// Returns the index it was removed from.
    pub fn remove_playable(&mut self, container: Uuid, playable: Uuid) -> Result<usize> {
        let parent = self.get::<Playable>(playable)?.parent();
        let children = self.container_mut(container)?.children_mut();

        let Some(index) = children.iter().position(|&v| v == playable) else {
            if parent == Some(container) {
                return Err(Error::InvalidContainerMembership {
                    uuid: playable,
                    container,
                });
            }

            return Err(Error::NotFound { uuid: playable });
        };

        children.remove(index);
        self.get_mut::<Playable>(playable)?.set_parent(None);

        Ok(index)
    }

    /// Returns the former parent and index, or `None` if it had no parent.
    pub fn detach_playable(&mut self, playable: Uuid) -> Result<Option<(Uuid, usize)>> {
        let Some(parent) = self.get::<Playable>(playable)?.parent() else {
            return Ok(None);
        };

        let index = self.remove_playable(parent, playable)?;
        Ok(Some((parent, index)))
    }

    pub fn contains_playable(&self, container: Uuid, playable: Uuid) -> bool {
        self.container(container)
            .is_ok_and(|container| container.children().contains(&playable))
    }

    /// Every playable below `container` (pre-order) for which `predicate` holds.
    pub fn find_playables_recursive(
        &self,
        container: Uuid,
        mut predicate: impl FnMut(&Playable) -> bool,
    ) -> Vec<Uuid> {
        let mut found = Vec::new();
        let mut stack = match self.container(container) {
            Ok(container) => container.children().iter().rev().copied().collect::<Vec<_>>(),
            Err(_) => return found,
        };

        while let Some(uuid) = stack.pop() {
            let Some(playable) = self.playables.get(uuid) else {
                continue;
            };

            if predicate(playable) {
                found.push(uuid);
            }

            if let Playable::Group(group) = playable {
                stack.extend(group.children.iter().rev().copied());
            }
        }

        found
    }

    /// Deep-copies a playable under fresh uuids. The copy is stored but has no parent.
    pub fn copy_playable(
        &mut self,
        playable: Uuid,
        new_uuid: &mut dyn FnMut() -> Uuid,
    ) -> Result<Uuid> {
        let copy = match self.get::<Playable>(playable)? {
            Playable::Sound(sound) => {
                let mut sound = sound.clone();
                sound.uuid = new_uuid();
                sound.parent = None;
                Playable::Sound(sound)
            }
            Playable::Group(group) => {
                let mut group = group.clone();
                group.uuid = new_uuid();
                group.parent = None;

                let originals = std::mem::take(&mut group.children);
                for child in originals {
                    let child = self.copy_playable(child, new_uuid)?;
                    self.get_mut::<Playable>(child)?
                        .set_parent(Some(group.uuid));
                    group.children.push(child);
                }

                Playable::Group(group)
            }
        };

        let uuid = copy.uuid();
        self.playables.insert(copy)?;
        Ok(uuid)
    }

    pub fn delete_playable(&mut self, playable: Uuid) -> Result<Vec<Uuid>> {
        self.detach_playable(playable)?;

        let removed = self.trace(playable);
        for &uuid in &removed {
            self.playables.remove(uuid);
        }

        Ok(removed)
    }

    pub fn delete_soundboard(&mut self, soundboard: Uuid) -> Result<Vec<Uuid>> {
        self.get::<Soundboard>(soundboard)?;

        let removed = self.trace(soundboard);
        for &uuid in &removed {
            self.playables.remove(uuid);
        }

        self.soundboards.remove(soundboard);
        self.soundboard_order.retain(|&v| v != soundboard);

        Ok(removed)
    }

    /// Containers above `uuid`, nearest first. Ends at the soundboard for attached playables.
    pub fn ancestors(&self, uuid: Uuid) -> Vec<Uuid> {
        let mut ancestors = Vec::new();
        let mut current = self.playables.get(uuid).and_then(Playable::parent);

        while let Some(parent) = current {
            if ancestors.contains(&parent) {
                break;
            }

            ancestors.push(parent);
            current = self.playables.get(parent).and_then(Playable::parent);
        }

        ancestors
    }

    pub fn soundboard_of(&self, uuid: Uuid) -> Option<Uuid> {
        if self.soundboards.has(uuid) {
            return Some(uuid);
        }

        self.ancestors(uuid)
            .last()
            .copied()
            .filter(|&v| self.soundboards.has(v))
    }

    /// Fails if `container` is a soundboard whose contents mirror a folder.
    pub fn check_unlinked(&self, container: Uuid) -> Result<()> {
        if self.container(container)?.linked_folder().is_some() {
            return Err(Error::LinkedSoundboardViolation { uuid: container });
        }

        Ok(())
    }
}
