use msb_api::{Error, Result};

use super::{Object, Storage, Uuid};
use crate::playable::{Container, Playable, Soundboard};

#[derive(Debug, Default)]
pub struct Hub {
    pub playables: Storage<Playable>,
    pub soundboards: Storage<Soundboard>,
    pub soundboard_order: Vec<Uuid>,
}

impl Hub {
    pub fn get<T: StorageRef>(&self, uuid: Uuid) -> Result<&T> {
        T::storage_ref(self)
            .get(uuid)
            .ok_or(Error::NotFound { uuid })
    }

    pub fn get_mut<T: StorageRef>(&mut self, uuid: Uuid) -> Result<&mut T> {
        T::storage_ref_mut(self)
            .get_mut(uuid)
            .ok_or(Error::NotFound { uuid })
    }

    pub fn soundboards_in_order(&self) -> impl Iterator<Item = &Soundboard> + '_ {
        self.soundboard_order
            .iter()
            .filter_map(|&uuid| self.soundboards.get(uuid))
    }

    pub fn container(&self, uuid: Uuid) -> Result<&dyn Container> {
        if let Some(soundboard) = self.soundboards.get(uuid) {
            return Ok(soundboard as &dyn Container);
        }

        match self.playables.get(uuid) {
            Some(Playable::Group(group)) => Ok(group as &dyn Container),
            _ => Err(Error::NotFound { uuid }),
        }
    }

    pub fn container_mut(&mut self, uuid: Uuid) -> Result<&mut dyn Container> {
        if self.soundboards.has(uuid) {
            return self
                .soundboards
                .get_mut(uuid)
                .map(|v| v as &mut dyn Container)
                .ok_or(Error::NotFound { uuid });
        }

        match self.playables.get_mut(uuid) {
            Some(Playable::Group(group)) => Ok(group as &mut dyn Container),
            _ => Err(Error::NotFound { uuid }),
        }
    }

    /// Every uuid owned by `uuid` (itself included), parents first.
    pub fn trace(&self, uuid: Uuid) -> Vec<Uuid> {
        let mut uuids = Vec::new();
        let mut callback = |uuid| uuids.push(uuid);

        if let Some(soundboard) = self.soundboards.get(uuid) {
            soundboard.trace(self, &mut callback);
        } else if let Some(playable) = self.playables.get(uuid) {
            playable.trace(self, &mut callback);
        }

        uuids
    }
}

pub trait StorageRef: Object + Sized {
    fn storage_ref(hub: &Hub) -> &Storage<Self>;

    fn storage_ref_mut(hub: &mut Hub) -> &mut Storage<Self>;
}

macro_rules! impl_storage_ref {
    ($field:ident: $ty:ty) => {
        impl StorageRef for $ty {
            fn storage_ref(hub: &Hub) -> &Storage<Self> {
                &hub.$field
            }

            fn storage_ref_mut(hub: &mut Hub) -> &mut Storage<Self> {
                &mut hub.$field
            }
        }
    };
}

impl_storage_ref!(playables: Playable);
impl_storage_ref!(soundboards: Soundboard);
