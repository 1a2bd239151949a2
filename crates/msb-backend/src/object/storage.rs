use msb_api::{Error, Result};
use msb_core::collections::HashMap;
use slotmap::SlotMap;

use super::{Object, Uuid};

/// Arena of objects addressed by their uuid.
#[derive(Debug)]
pub struct Storage<T: Object> {
    map: SlotMap<T::Id, T>,
    index: HashMap<Uuid, T::Id>,
}

impl<T: Object> Storage<T> {
    pub fn new() -> Storage<T> {
        Storage {
            map: SlotMap::default(),
            index: HashMap::default(),
        }
    }

    /// Inserts an object. Fails without touching the storage if its uuid is taken.
    pub fn insert(&mut self, object: T) -> Result<()> {
        let uuid = object.uuid();
        if self.index.contains_key(&uuid) {
            return Err(Error::new_internal(format!("uuid {uuid} is already in use")));
        }

        let id = self.map.insert(object);
        self.index.insert(uuid, id);
        Ok(())
    }

    pub fn has(&self, uuid: Uuid) -> bool {
        self.index.contains_key(&uuid)
    }

    pub fn get(&self, uuid: Uuid) -> Option<&T> {
        let id = *self.index.get(&uuid)?;
        self.map.get(id)
    }

    pub fn get_mut(&mut self, uuid: Uuid) -> Option<&mut T> {
        let id = *self.index.get(&uuid)?;
        self.map.get_mut(id)
    }

    pub fn remove(&mut self, uuid: Uuid) -> Option<T> {
        let id = self.index.remove(&uuid)?;
        self.map.remove(id)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<T: Object> Default for Storage<T> {
    fn default() -> Storage<T> {
        Storage::new()
    }
}
