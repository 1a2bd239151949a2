use camino::{Utf8Path, Utf8PathBuf};
use msb_core::keys::KeyCombo;
use msb_core::Uuid;
use serde::{Deserialize, Serialize};

pub const DEFAULT_VOLUME: u8 = 100;

/// File extensions accepted as sounds.
pub const SOUND_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg"];

pub fn is_sound_file(path: &Utf8Path) -> bool {
    path.extension()
        .is_some_and(|ext| SOUND_EXTENSIONS.iter().any(|v| ext.eq_ignore_ascii_case(v)))
}

/// Which child a group yields when it is triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GroupMode {
    #[default]
    Sequence,
    Random,
    First,
    Combine,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundData {
    pub uuid: Uuid,
    pub name: String,
    pub volume: u8,
    pub keys: KeyCombo,
    pub path: Utf8PathBuf,
}

impl SoundData {
    /// A fresh sound named after the file it points to.
    pub fn from_path(path: Utf8PathBuf) -> SoundData {
        SoundData {
            uuid: Uuid::new_v4(),
            name: path.file_stem().unwrap_or_default().to_owned(),
            volume: DEFAULT_VOLUME,
            keys: KeyCombo::new(),
            path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupData {
    pub uuid: Uuid,
    pub name: String,
    pub volume: u8,
    pub keys: KeyCombo,
    pub mode: GroupMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayableData {
    Sound(SoundData),
    Group(GroupData),
}

impl PlayableData {
    pub fn uuid(&self) -> Uuid {
        match self {
            PlayableData::Sound(v) => v.uuid,
            PlayableData::Group(v) => v.uuid,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            PlayableData::Sound(v) => &v.name,
            PlayableData::Group(v) => &v.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundboardData {
    pub uuid: Uuid,
    pub name: String,
    pub volume: u8,
    pub keys: KeyCombo,
    pub linked_folder: Option<Utf8PathBuf>,
    pub has_sounds: bool,
}

impl SoundboardData {
    pub fn new(name: impl Into<String>) -> SoundboardData {
        SoundboardData {
            uuid: Uuid::new_v4(),
            name: name.into(),
            volume: DEFAULT_VOLUME,
            keys: KeyCombo::new(),
            linked_folder: None,
            has_sounds: false,
        }
    }
}
