use camino::Utf8PathBuf;
use msb_api::library::{PlayableRecord, SoundboardRecord};
use msb_api::playable::GroupMode;
use msb_api::settings::Settings;
use msb_api::KeyCombo;
use serde::{Deserialize, Serialize};

use super::{encoding, Result};
use crate::define_version_enum;
use crate::object::Uuid;

define_version_enum! {
    enum Version {
        V1 = 1,
    }
    latest = V1
}

pub fn serialize_soundboard(record: &SoundboardRecord) -> Result<Vec<u8>> {
    let raw = SoundboardLatest {
        uuid: record.uuid,
        name: &record.name,
        volume: record.volume,
        keys: record.keys.clone(),
        linked_folder: record.linked_folder.clone(),
        children: record.children.iter().map(playable_to_raw).collect(),
    };

    encoding::serialize(Version::LATEST.as_u32(), &raw)
}

pub fn deserialize_soundboard(data: &[u8]) -> Result<SoundboardRecord> {
    let (version, data) = encoding::extract_version(data)?;
    let raw = match Version::from_u32(version)? {
        Version::V1 => encoding::deserialize::<SoundboardV1>(data)?,
    };

    Ok(SoundboardRecord {
        uuid: raw.uuid,
        name: raw.name.to_owned(),
        volume: raw.volume,
        keys: raw.keys,
        linked_folder: raw.linked_folder,
        children: raw.children.into_iter().map(playable_from_raw).collect(),
    })
}

pub fn serialize_settings(settings: &Settings) -> Result<Vec<u8>> {
    encoding::serialize(Version::LATEST.as_u32(), settings)
}

pub fn deserialize_settings(data: &[u8]) -> Result<Settings> {
    let (version, data) = encoding::extract_version(data)?;
    match Version::from_u32(version)? {
        Version::V1 => encoding::deserialize(data),
    }
}

fn playable_to_raw(record: &PlayableRecord) -> PlayableLatest<'_> {
    match record {
        PlayableRecord::Sound {
            uuid,
            name,
            volume,
            keys,
            path,
        } => PlayableV1::Sound {
            uuid: *uuid,
            name,
            volume: *volume,
            keys: keys.clone(),
            path: path.clone(),
        },
        PlayableRecord::Group {
            uuid,
            name,
            volume,
            keys,
            mode,
            children,
        } => PlayableV1::Group {
            uuid: *uuid,
            name,
            volume: *volume,
            keys: keys.clone(),
            mode: *mode,
            children: children.iter().map(playable_to_raw).collect(),
        },
    }
}

fn playable_from_raw(raw: PlayableV1<'_>) -> PlayableRecord {
    match raw {
        PlayableV1::Sound {
            uuid,
            name,
            volume,
            keys,
            path,
        } => PlayableRecord::Sound {
            uuid,
            name: name.to_owned(),
            volume,
            keys,
            path,
        },
        PlayableV1::Group {
            uuid,
            name,
            volume,
            keys,
            mode,
            children,
        } => PlayableRecord::Group {
            uuid,
            name: name.to_owned(),
            volume,
            keys,
            mode,
            children: children.into_iter().map(playable_from_raw).collect(),
        },
    }
}

type SoundboardLatest<'a> = SoundboardV1<'a>;
type PlayableLatest<'a> = PlayableV1<'a>;

#[derive(Debug, Serialize, Deserialize)]
struct SoundboardV1<'a> {
    uuid: Uuid,
    name: &'a str,
    volume: u8,
    keys: KeyCombo,
    linked_folder: Option<Utf8PathBuf>,
    #[serde(borrow)]
    children: Vec<PlayableV1<'a>>,
}

#[derive(Debug, Serialize, Deserialize)]
enum PlayableV1<'a> {
    Sound {
        uuid: Uuid,
        name: &'a str,
        volume: u8,
        keys: KeyCombo,
        path: Utf8PathBuf,
    },
    Group {
        uuid: Uuid,
        name: &'a str,
        volume: u8,
        keys: KeyCombo,
        mode: GroupMode,
        #[serde(borrow)]
        children: Vec<PlayableV1<'a>>,
    },
}
