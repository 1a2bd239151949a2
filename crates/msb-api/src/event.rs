use msb_core::keys::KeyCombo;
use msb_core::Uuid;

use crate::playable::{PlayableData, SoundboardData};

/// Notifications emitted by the backend for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// These playables (or something inside them) started producing sound.
    Playing { uuids: Vec<Uuid> },
    /// Nothing inside these playables is producing sound anymore.
    NotPlaying { uuids: Vec<Uuid> },
    /// The last instance of a sound stopped.
    Stopped { uuid: Uuid },
    PlayError { message: String },
    /// Exactly one instance is playing, or `None` when zero or several are.
    SingleInstanceChanged { uuid: Option<Uuid> },

    PlayableAdded {
        parent: Uuid,
        playable: PlayableData,
        index: usize,
        is_playing: bool,
    },
    PlayableRemoved { uuid: Uuid },
    PlayableChanged { playable: PlayableData },
    ContainerSorted { container: Uuid, children: Vec<Uuid> },

    SoundboardAdded {
        soundboard: SoundboardData,
        index: usize,
        is_current: bool,
    },
    SoundboardRemoved { uuid: Uuid },
    SoundboardChanged { soundboard: SoundboardData },
    CurrentSoundboardChanged { soundboard: SoundboardData },

    /// A combination was dispatched while keybinds were enabled.
    KeybindPressed { combination: KeyCombo },
    KeyRecordingProgress {
        session: RecordingId,
        combination: KeyCombo,
    },
    KeybindsStateChanged { enabled: bool },
    OverlapSoundsStateChanged { enabled: bool },
    LoopSoundsStateChanged { enabled: bool },

    SaveFailed { message: String },
}

/// Identifies a key recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordingId(pub u64);

impl From<u64> for RecordingId {
    fn from(v: u64) -> RecordingId {
        RecordingId(v)
    }
}
