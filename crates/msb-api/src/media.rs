use std::fmt::Debug;

use camino::Utf8PathBuf;
use msb_core::keys::KeyCombo;
use msb_core::Uuid;

use crate::Result;

/// Identifies one concurrently playing occurrence of a sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub u64);

impl From<u64> for InstanceId {
    fn from(v: u64) -> InstanceId {
        InstanceId(v)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRoute {
    pub device: String,
    /// Linear gain in `0.0..=1.0`.
    pub gain: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AudioSource {
    pub uuid: Uuid,
    pub path: Utf8PathBuf,
    pub routes: Vec<DeviceRoute>,
    pub looping: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiCue {
    Error,
    KeybindsOn,
    KeybindsOff,
}

/// Decodes and mixes audio. The backend only starts and stops instances;
/// end-of-playback is reported back through `Backend::instance_ended`.
pub trait MediaBackend {
    fn create(&mut self, id: InstanceId, source: &AudioSource) -> Result<Box<dyn MediaInstance>>;

    fn play_cue(&mut self, cue: UiCue);
}

pub trait MediaInstance: Debug {
    fn play(&mut self) -> Result<()>;

    fn stop(&mut self);

    fn set_looping(&mut self, looping: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HoldHandle(pub u64);

/// Presses and releases keys on behalf of the user (push-to-talk).
pub trait KeySimulator {
    fn hold(&mut self, keys: &KeyCombo) -> HoldHandle;

    fn release(&mut self, handle: HoldHandle);
}
