use msb_api::playable::GroupMode;
use msb_api::{Error, Result};
use rand::Rng;
use tracing::debug;

use crate::object::{Hub, Uuid};
use crate::playable::{Container, Playable};

/// Resolves a playable to the sounds that should start when it is triggered.
///
/// A sound resolves to itself. A group picks one child according to its mode
/// and resolves that, except in combine mode where every child is resolved.
/// Sequence mode advances the group's cursor.
pub fn resolve<R: Rng + ?Sized>(hub: &mut Hub, uuid: Uuid, rng: &mut R) -> Result<Vec<Uuid>> {
    let mut sounds = Vec::new();
    resolve_into(hub, uuid, rng, &mut sounds)?;
    Ok(sounds)
}

fn resolve_into<R: Rng + ?Sized>(
    hub: &mut Hub,
    uuid: Uuid,
    rng: &mut R,
    sounds: &mut Vec<Uuid>,
) -> Result<()> {
    let group = match hub.get_mut::<Playable>(uuid)? {
        Playable::Sound(_) => {
            sounds.push(uuid);
            return Ok(());
        }
        Playable::Group(group) => group,
    };

    let len = group.children().len();
    if len == 0 {
        return Err(Error::EmptyGroup { uuid });
    }

    let index = match group.mode {
        GroupMode::First => 0,
        GroupMode::Sequence => {
            group.cursor = (group.cursor + 1) % len;
            group.cursor
        }
        GroupMode::Random => rng.gen_range(0..len),
        GroupMode::Combine => {
            let children = group.children().to_vec();
            let before = sounds.len();

            for child in children {
                match resolve_into(hub, child, rng, sounds) {
                    Err(error) if error.is_soft() => debug!(%child, "Skipping empty group"),
                    result => result?,
                }
            }

            if sounds.len() == before {
                return Err(Error::EmptyGroup { uuid });
            }

            return Ok(());
        }
    };

    let child = group.children()[index];
    resolve_into(hub, child, rng, sounds)
}
