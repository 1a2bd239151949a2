use camino::Utf8PathBuf;
use msb_core::keys::KeyCombo;
use msb_core::Uuid;

use crate::playable::GroupMode;
use crate::settings::Settings;
use crate::Result;

/// Everything that survives a restart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Library {
    pub settings: Settings,
    pub soundboards: Vec<SoundboardRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundboardRecord {
    pub uuid: Uuid,
    pub name: String,
    pub volume: u8,
    pub keys: KeyCombo,
    pub linked_folder: Option<Utf8PathBuf>,
    pub children: Vec<PlayableRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayableRecord {
    Sound {
        uuid: Uuid,
        name: String,
        volume: u8,
        keys: KeyCombo,
        path: Utf8PathBuf,
    },
    Group {
        uuid: Uuid,
        name: String,
        volume: u8,
        keys: KeyCombo,
        mode: GroupMode,
        children: Vec<PlayableRecord>,
    },
}

pub trait Persistence {
    fn load(&mut self) -> Result<Library>;

    fn save(&mut self, library: &Library) -> Result<()>;
}
