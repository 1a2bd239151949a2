use msb_api::library::{PlayableRecord, SoundboardRecord};
use msb_api::{Error, Result};

use crate::object::{Hub, Uuid};
use crate::playable::{Container, Group, Playable, Properties, Sound, Soundboard};

impl Hub {
    /// Rebuilds the tree from persisted records, keeping their uuids.
    ///
    /// Malformed records, such as a uuid listed twice, are a persistence error.
    pub fn from_records(records: Vec<SoundboardRecord>) -> Result<Hub> {
        let mut hub = Hub::default();
        hub.insert_records(records).map_err(Error::new_persistence)?;
        Ok(hub)
    }

    fn insert_records(&mut self, records: Vec<SoundboardRecord>) -> Result<()> {
        for record in records {
            let props = Properties {
                name: record.name,
                volume: record.volume,
                keys: record.keys,
            };

            let mut soundboard = Soundboard::new(record.uuid, props);
            soundboard.linked_folder = record.linked_folder;

            self.soundboards.insert(soundboard)?;
            self.soundboard_order.push(record.uuid);

            for child in record.children {
                self.insert_record(record.uuid, child)?;
            }
        }

        Ok(())
    }

    fn insert_record(&mut self, parent: Uuid, record: PlayableRecord) -> Result<()> {
        let (playable, children) = match record {
            PlayableRecord::Sound {
                uuid,
                name,
                volume,
                keys,
                path,
            } => {
                let props = Properties { name, volume, keys };
                (Playable::Sound(Sound::new(uuid, props, path)), Vec::new())
            }
            PlayableRecord::Group {
                uuid,
                name,
                volume,
                keys,
                mode,
                children,
            } => {
                let props = Properties { name, volume, keys };
                (Playable::Group(Group::new(uuid, props, mode)), children)
            }
        };

        let uuid = playable.uuid();
        self.playables.insert(playable)?;
        self.add_playable(parent, uuid, None)?;

        for child in children {
            self.insert_record(uuid, child)?;
        }

        Ok(())
    }

    pub fn to_records(&self) -> Vec<SoundboardRecord> {
        self.soundboards_in_order()
            .map(|soundboard| SoundboardRecord {
                uuid: soundboard.uuid(),
                name: soundboard.props.name.clone(),
                volume: soundboard.props.volume,
                keys: soundboard.props.keys.clone(),
                linked_folder: soundboard.linked_folder.clone(),
                children: self.child_records(soundboard.children()),
            })
            .collect()
    }

    fn child_records(&self, children: &[Uuid]) -> Vec<PlayableRecord> {
        children
            .iter()
            .filter_map(|&uuid| self.playables.get(uuid))
            .map(|playable| match playable {
                Playable::Sound(sound) => PlayableRecord::Sound {
                    uuid: sound.uuid(),
                    name: sound.props.name.clone(),
                    volume: sound.props.volume,
                    keys: sound.props.keys.clone(),
                    path: sound.path.clone(),
                },
                Playable::Group(group) => PlayableRecord::Group {
                    uuid: group.uuid(),
                    name: group.props.name.clone(),
                    volume: group.props.volume,
                    keys: group.props.keys.clone(),
                    mode: group.mode,
                    children: self.child_records(group.children()),
                },
            })
            .collect()
    }
}
