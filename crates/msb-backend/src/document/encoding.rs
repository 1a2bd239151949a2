use serde::{Deserialize, Serialize};

use super::{Error, Result};

/// Encodes `value` behind a little-endian version prefix.
pub fn serialize<T: Serialize>(version: u32, value: &T) -> Result<Vec<u8>> {
    let mut vec = Vec::with_capacity(128);
    vec.extend(version.to_le_bytes());
    postcard::to_extend(value, vec).map_err(|_| Error::SerializationFailed)
}

pub fn extract_version(data: &[u8]) -> Result<(u32, &[u8])> {
    let prefix = data.get(0..4).ok_or(Error::InvalidDocument)?;
    let version = u32::from_le_bytes(prefix.try_into().map_err(|_| Error::InvalidDocument)?);
    Ok((version, &data[4..]))
}

pub fn deserialize<'de, T: Deserialize<'de>>(data: &'de [u8]) -> Result<T> {
    postcard::from_bytes(data).map_err(|_| Error::InvalidDocument)
}

/// Declares the versions a record type has been written with.
///
/// `from_u32` rejects versions newer than the ones listed.
#[macro_export]
macro_rules! define_version_enum {
    (enum $Version:ident { $($Ver:ident = $value:literal),+ $(,)? } latest = $Latest:ident) => {
        #[repr(u32)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        enum $Version {
            $($Ver = $value,)+
        }

        impl $Version {
            const LATEST: $Version = $Version::$Latest;

            fn from_u32(v: u32) -> Result<$Version, $crate::document::Error> {
                match v {
                    $($value => Ok($Version::$Ver),)+
                    _ => Err($crate::document::Error::UnsupportedVersion),
                }
            }

            fn as_u32(self) -> u32 {
                self as u32
            }
        }
    };
}
