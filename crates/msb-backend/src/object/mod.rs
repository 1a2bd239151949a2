mod hub;
mod storage;

pub use msb_core::Uuid;

pub use self::hub::{Hub, StorageRef};
pub use self::storage::Storage;

pub trait Object {
    type Id: slotmap::Key;

    fn uuid(&self) -> Uuid;

    /// Visits this object and everything it owns, parents before children.
    fn trace(&self, hub: &Hub, callback: &mut dyn FnMut(Uuid));
}

slotmap::new_key_type! {
    pub struct PlayableId;
    pub struct SoundboardId;
}
