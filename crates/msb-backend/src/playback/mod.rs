mod diff;
mod ops;

use msb_api::media::{AudioSource, HoldHandle, InstanceId, KeySimulator, MediaBackend, MediaInstance, UiCue};
use msb_api::{KeyCombo, Result};
use tracing::debug;

pub use self::diff::{changes, Changes};
use crate::id_allocator::IdAllocator;
use crate::object::Uuid;

#[derive(Debug)]
struct Instance {
    id: InstanceId,
    uuid: Uuid,
    media: Box<dyn MediaInstance>,
}

/// Multiset of playing sound instances plus the push-to-talk hold.
///
/// The tracker knows nothing about the playable tree; the backend feeds it
/// resolved sounds and turns its snapshots into notifications.
pub struct Tracker {
    media: Box<dyn MediaBackend>,
    keys: Box<dyn KeySimulator>,
    instances: Vec<Instance>,
    ids: IdAllocator<InstanceId>,
    hold: Option<HoldHandle>,
    single: Option<Uuid>,
}

impl Tracker {
    pub fn new(media: Box<dyn MediaBackend>, keys: Box<dyn KeySimulator>) -> Tracker {
        Tracker {
            media,
            keys,
            instances: Vec::new(),
            ids: IdAllocator::new(),
            hold: None,
            single: None,
        }
    }

    /// Uuid of every playing instance, in start order.
    pub fn playing(&self) -> Vec<Uuid> {
        self.instances.iter().map(|v| v.uuid).collect()
    }

    pub fn instance_count(&self, uuid: Uuid) -> usize {
        self.instances.iter().filter(|v| v.uuid == uuid).count()
    }

    pub fn is_any_playing(&self) -> bool {
        !self.instances.is_empty()
    }

    /// Creates and starts a new instance. Nothing is recorded if starting fails.
    pub fn start(&mut self, source: &AudioSource) -> Result<InstanceId> {
        let id = self.ids.next();
        let mut media = self.media.create(id, source)?;
        media.play()?;

        debug!(?id, uuid = %source.uuid, "Started instance");

        self.instances.push(Instance {
            id,
            uuid: source.uuid,
            media,
        });

        Ok(id)
    }

    /// Stops the oldest instance of `uuid`. Returns `false` if none was playing.
    pub fn stop_one(&mut self, uuid: Uuid) -> bool {
        let Some(index) = self.instances.iter().position(|v| v.uuid == uuid) else {
            return false;
        };

        let mut instance = self.instances.remove(index);
        instance.media.stop();
        true
    }

    /// Stops every instance of `uuid`, returning how many there were.
    pub fn stop_all_of(&mut self, uuid: Uuid) -> usize {
        let mut stopped = 0;

        self.instances.retain_mut(|instance| {
            if instance.uuid != uuid {
                return true;
            }

            instance.media.stop();
            stopped += 1;
            false
        });

        stopped
    }

    /// Forgets an instance that finished on its own.
    pub fn remove_instance(&mut self, id: InstanceId) -> Option<Uuid> {
        let index = self.instances.iter().position(|v| v.id == id)?;
        let instance = self.instances.remove(index);
        Some(instance.uuid)
    }

    pub fn set_looping(&mut self, looping: bool) {
        for instance in &mut self.instances {
            instance.media.set_looping(looping);
        }
    }

    pub fn play_cue(&mut self, cue: UiCue) {
        self.media.play_cue(cue);
    }

    /// Holds `ptt_keys` while anything plays and releases them once nothing does.
    pub fn update_hold(&mut self, ptt_keys: &KeyCombo) {
        let playing = self.is_any_playing();

        if playing && self.hold.is_none() && !ptt_keys.is_empty() {
            debug!(keys = %ptt_keys, "Holding push-to-talk keys");
            self.hold = Some(self.keys.hold(ptt_keys));
        }

        if !playing {
            if let Some(handle) = self.hold.take() {
                debug!("Releasing push-to-talk keys");
                self.keys.release(handle);
            }
        }
    }

    /// Returns the new value when "the only playing sound" changed.
    pub fn update_single(&mut self) -> Option<Option<Uuid>> {
        let single = match self.instances.as_slice() {
            [instance] => Some(instance.uuid),
            _ => None,
        };

        if single == self.single {
            return None;
        }

        self.single = single;
        Some(single)
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        if let Some(handle) = self.hold.take() {
            self.keys.release(handle);
        }
    }
}
