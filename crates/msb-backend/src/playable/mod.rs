mod container;
mod ops;
#[cfg(test)]
mod tests;

use camino::{Utf8Path, Utf8PathBuf};
use msb_api::playable::{
    GroupData, GroupMode, PlayableData, SoundData, SoundboardData, DEFAULT_VOLUME,
};
use msb_api::{Error, KeyCombo, Result};

pub use self::container::Container;
use crate::object::{Hub, Object, PlayableId, SoundboardId, Uuid};

/// Fields shared by sounds, groups and soundboards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Properties {
    pub name: String,
    pub volume: u8,
    pub keys: KeyCombo,
}

impl Properties {
    pub fn new(name: impl Into<String>) -> Properties {
        Properties {
            name: name.into(),
            volume: DEFAULT_VOLUME,
            keys: KeyCombo::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.volume > 100 {
            return Err(Error::InvalidVolume);
        }

        Ok(())
    }

    /// Volume as a factor in `0.0..=1.0`.
    pub fn gain(&self) -> f32 {
        f32::from(self.volume) / 100.0
    }
}

#[derive(Debug, Clone)]
pub struct Sound {
    uuid: Uuid,
    pub parent: Option<Uuid>,
    pub props: Properties,
    pub path: Utf8PathBuf,
}

impl Sound {
    pub fn new(uuid: Uuid, props: Properties, path: Utf8PathBuf) -> Sound {
        Sound {
            uuid,
            parent: None,
            props,
            path,
        }
    }

    pub fn from_data(data: SoundData) -> Sound {
        let props = Properties {
            name: data.name,
            volume: data.volume,
            keys: data.keys,
        };

        Sound::new(data.uuid, props, data.path)
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn to_data(&self) -> SoundData {
        SoundData {
            uuid: self.uuid,
            name: self.props.name.clone(),
            volume: self.props.volume,
            keys: self.props.keys.clone(),
            path: self.path.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Group {
    uuid: Uuid,
    pub parent: Option<Uuid>,
    pub props: Properties,
    pub mode: GroupMode,
    /// Index of the child last yielded in sequence mode.
    pub cursor: usize,
    children: Vec<Uuid>,
}

impl Group {
    pub fn new(uuid: Uuid, props: Properties, mode: GroupMode) -> Group {
        Group {
            uuid,
            parent: None,
            props,
            mode,
            cursor: 0,
            children: Vec::new(),
        }
    }

    pub fn from_data(data: GroupData) -> Group {
        let props = Properties {
            name: data.name,
            volume: data.volume,
            keys: data.keys,
        };

        Group::new(data.uuid, props, data.mode)
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn to_data(&self) -> GroupData {
        GroupData {
            uuid: self.uuid,
            name: self.props.name.clone(),
            volume: self.props.volume,
            keys: self.props.keys.clone(),
            mode: self.mode,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Playable {
    Sound(Sound),
    Group(Group),
}

impl Playable {
    pub fn from_data(data: PlayableData) -> Playable {
        match data {
            PlayableData::Sound(data) => Playable::Sound(Sound::from_data(data)),
            PlayableData::Group(data) => Playable::Group(Group::from_data(data)),
        }
    }

    pub fn uuid(&self) -> Uuid {
        match self {
            Playable::Sound(v) => v.uuid,
            Playable::Group(v) => v.uuid,
        }
    }

    pub fn parent(&self) -> Option<Uuid> {
        match self {
            Playable::Sound(v) => v.parent,
            Playable::Group(v) => v.parent,
        }
    }

    pub fn set_parent(&mut self, parent: Option<Uuid>) {
        match self {
            Playable::Sound(v) => v.parent = parent,
            Playable::Group(v) => v.parent = parent,
        }
    }

    pub fn props(&self) -> &Properties {
        match self {
            Playable::Sound(v) => &v.props,
            Playable::Group(v) => &v.props,
        }
    }

    pub fn props_mut(&mut self) -> &mut Properties {
        match self {
            Playable::Sound(v) => &mut v.props,
            Playable::Group(v) => &mut v.props,
        }
    }

    pub fn as_sound(&self) -> Option<&Sound> {
        match self {
            Playable::Sound(v) => Some(v),
            Playable::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Playable::Group(v) => Some(v),
            Playable::Sound(_) => None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Playable::Group(_))
    }

    pub fn to_data(&self) -> PlayableData {
        match self {
            Playable::Sound(v) => PlayableData::Sound(v.to_data()),
            Playable::Group(v) => PlayableData::Group(v.to_data()),
        }
    }
}

impl Object for Playable {
    type Id = PlayableId;

    fn uuid(&self) -> Uuid {
        Playable::uuid(self)
    }

    fn trace(&self, hub: &Hub, callback: &mut dyn FnMut(Uuid)) {
        callback(self.uuid());

        if let Playable::Group(group) = self {
            for &child in &group.children {
                if let Some(child) = hub.playables.get(child) {
                    child.trace(hub, callback);
                }
            }
        }
    }
}

/// Top-level container, optionally mirroring a folder on disk.
#[derive(Debug, Clone)]
pub struct Soundboard {
    uuid: Uuid,
    pub props: Properties,
    pub linked_folder: Option<Utf8PathBuf>,
    children: Vec<Uuid>,
}

impl Soundboard {
    pub fn new(uuid: Uuid, props: Properties) -> Soundboard {
        Soundboard {
            uuid,
            props,
            linked_folder: None,
            children: Vec::new(),
        }
    }

    pub fn from_data(data: SoundboardData) -> Soundboard {
        let props = Properties {
            name: data.name,
            volume: data.volume,
            keys: data.keys,
        };

        let mut soundboard = Soundboard::new(data.uuid, props);
        soundboard.linked_folder = data.linked_folder;
        soundboard
    }

    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    pub fn is_linked(&self) -> bool {
        self.linked_folder.is_some()
    }

    pub fn linked_folder(&self) -> Option<&Utf8Path> {
        self.linked_folder.as_deref()
    }

    pub fn to_data(&self) -> SoundboardData {
        SoundboardData {
            uuid: self.uuid,
            name: self.props.name.clone(),
            volume: self.props.volume,
            keys: self.props.keys.clone(),
            linked_folder: self.linked_folder.clone(),
            has_sounds: !self.children.is_empty(),
        }
    }
}

impl Object for Soundboard {
    type Id = SoundboardId;

    fn uuid(&self) -> Uuid {
        self.uuid
    }

    fn trace(&self, hub: &Hub, callback: &mut dyn FnMut(Uuid)) {
        callback(self.uuid);

        for &child in &self.children {
            if let Some(child) = hub.playables.get(child) {
                child.trace(hub, callback);
            }
        }
    }
}
