use camino::Utf8PathBuf;
use msb_api::playable::{GroupMode, PlayableData, SoundData, SoundboardData};
use msb_api::{Error, Event, Result};
use tempfile::TempDir;

use super::ops::QUICK_SOUNDBOARD_NAME;
use super::*;
use crate::tests::{add_group, add_sound, add_soundboard, test_backend};

fn detached_sound(hub: &mut Hub, name: &str) -> Uuid {
    let sound = Sound::new(Uuid::new_v4(), Properties::new(name), Utf8PathBuf::from("/a.mp3"));
    let uuid = sound.uuid();
    hub.playables.insert(Playable::Sound(sound)).unwrap();
    uuid
}

#[test]
fn add_and_remove() -> Result<()> {
    let mut hub = Hub::default();
    let board = add_soundboard(&mut hub, "Board");
    let a = add_sound(&mut hub, board, "A");
    let b = detached_sound(&mut hub, "B");

    assert_eq!(hub.add_playable(board, b, Some(0))?, 0);
    assert_eq!(hub.children(board)?, &[b, a]);
    assert_eq!(hub.get::<Playable>(b)?.parent(), Some(board));
    assert!(hub.contains_playable(board, b));

    assert_eq!(hub.remove_playable(board, b)?, 0);
    assert_eq!(hub.children(board)?, &[a]);
    assert_eq!(hub.get::<Playable>(b)?.parent(), None);
    assert!(!hub.contains_playable(board, b));

    Ok(())
}

#[test]
fn add_rejects_parented_playable() -> Result<()> {
    let mut hub = Hub::default();
    let board = add_soundboard(&mut hub, "Board");
    let other = add_soundboard(&mut hub, "Other");
    let a = add_sound(&mut hub, board, "A");

    assert_eq!(
        hub.add_playable(other, a, None),
        Err(Error::AlreadyParented { uuid: a })
    );
    assert!(hub.children(other)?.is_empty());

    Ok(())
}

#[test]
fn add_rejects_bad_index_and_unknown_uuids() -> Result<()> {
    let mut hub = Hub::default();
    let board = add_soundboard(&mut hub, "Board");
    let b = detached_sound(&mut hub, "B");
    let missing = Uuid::new_v4();

    assert_eq!(hub.add_playable(board, b, Some(1)), Err(Error::IndexOutOfBounds));
    assert_eq!(
        hub.add_playable(missing, b, None),
        Err(Error::NotFound { uuid: missing })
    );
    assert_eq!(
        hub.add_playable(board, missing, None),
        Err(Error::NotFound { uuid: missing })
    );
    assert_eq!(hub.add_playable(b, b, None), Err(Error::NotFound { uuid: b }));

    Ok(())
}

#[test]
fn add_rejects_group_into_itself() -> Result<()> {
    let mut hub = Hub::default();
    let board = add_soundboard(&mut hub, "Board");
    let outer = add_group(&mut hub, board, "Outer", GroupMode::First);
    let inner = add_group(&mut hub, outer, "Inner", GroupMode::First);

    hub.remove_playable(board, outer)?;

    assert_eq!(hub.add_playable(outer, outer, None), Err(Error::RecursiveGroup));
    assert_eq!(hub.add_playable(inner, outer, None), Err(Error::RecursiveGroup));

    Ok(())
}

#[test]
fn remove_requires_direct_child() -> Result<()> {
    let mut hub = Hub::default();
    let board = add_soundboard(&mut hub, "Board");
    let group = add_group(&mut hub, board, "Group", GroupMode::First);
    let a = add_sound(&mut hub, group, "A");

    assert_eq!(hub.remove_playable(board, a), Err(Error::NotFound { uuid: a }));
    assert_eq!(hub.children(group)?, &[a]);

    Ok(())
}

#[test]
fn find_recursive_is_preorder() -> Result<()> {
    let mut hub = Hub::default();
    let board = add_soundboard(&mut hub, "Board");
    let a = add_sound(&mut hub, board, "A");
    let group = add_group(&mut hub, board, "Group", GroupMode::First);
    let b = add_sound(&mut hub, group, "B");
    let c = add_sound(&mut hub, board, "C");

    let all = hub.find_playables_recursive(board, |_| true);
    assert_eq!(all, vec![a, group, b, c]);

    let sounds = hub.find_playables_recursive(board, |p| !p.is_group());
    assert_eq!(sounds, vec![a, b, c]);

    Ok(())
}

#[test]
fn copy_uses_fresh_uuids() -> Result<()> {
    let mut hub = Hub::default();
    let board = add_soundboard(&mut hub, "Board");
    let group = add_group(&mut hub, board, "Group", GroupMode::Random);
    let a = add_sound(&mut hub, group, "A");

    let copy = hub.copy_playable(group, &mut Uuid::new_v4)?;
    let Playable::Group(copied) = hub.get::<Playable>(copy)? else {
        panic!("copy of a group must be a group");
    };

    assert_ne!(copy, group);
    assert_eq!(copied.parent, None);
    assert_eq!(copied.mode, GroupMode::Random);
    assert_eq!(copied.props.name, "Group");

    let inner = copied.children()[0];
    assert_ne!(inner, a);
    assert_eq!(hub.get::<Playable>(inner)?.parent(), Some(copy));
    assert_eq!(hub.get::<Playable>(inner)?.props().name, "A");

    // the original is untouched
    assert_eq!(hub.children(group)?, &[a]);

    Ok(())
}

#[test]
fn delete_drops_subtree() -> Result<()> {
    let mut hub = Hub::default();
    let board = add_soundboard(&mut hub, "Board");
    let group = add_group(&mut hub, board, "Group", GroupMode::First);
    let a = add_sound(&mut hub, group, "A");

    let removed = hub.delete_playable(group)?;
    assert_eq!(removed, vec![group, a]);
    assert!(!hub.playables.has(a));
    assert!(hub.children(board)?.is_empty());

    Ok(())
}

#[test]
fn ancestors_and_soundboard_of() {
    let mut hub = Hub::default();
    let board = add_soundboard(&mut hub, "Board");
    let group = add_group(&mut hub, board, "Group", GroupMode::First);
    let a = add_sound(&mut hub, group, "A");

    assert_eq!(hub.ancestors(a), vec![group, board]);
    assert_eq!(hub.soundboard_of(a), Some(board));
    assert_eq!(hub.soundboard_of(board), Some(board));
}

#[test]
fn add_sounds_to_destination() -> Result<()> {
    let mut t = test_backend();
    let board = t.current_soundboard().unwrap();
    let existing = t.sound(board, "Existing");
    t.events();

    let a = SoundData::from_path("/sounds/a.mp3".into());
    let b = SoundData::from_path("/sounds/b.wav".into());
    let container = t.add_sounds(vec![a.clone(), b.clone()], Some(board), false, Some(0))?;

    assert_eq!(container, board);
    assert_eq!(t.hub().children(board)?, &[a.uuid, b.uuid, existing]);

    let events = t.events();
    assert!(matches!(
        &events[0],
        Event::PlayableAdded { parent, index: 0, is_playing: false, .. } if *parent == board
    ));
    assert!(matches!(&events[1], Event::PlayableAdded { index: 1, .. }));

    Ok(())
}

#[test]
fn add_sounds_rejects_repeated_uuid() -> Result<()> {
    let mut t = test_backend();
    let board = t.current_soundboard().unwrap();
    t.events();

    let a = SoundData::from_path("/sounds/a.mp3".into());
    let b = SoundData {
        uuid: a.uuid,
        ..SoundData::from_path("/sounds/b.mp3".into())
    };

    assert!(matches!(
        t.add_sounds(vec![a, b], Some(board), false, None),
        Err(Error::Internal { .. })
    ));
    assert!(t.hub().children(board)?.is_empty());
    assert_eq!(t.hub().playables.len(), 0);
    assert!(t.events().is_empty());

    Ok(())
}

#[test]
fn storage_refuses_taken_uuid() -> Result<()> {
    let mut hub = Hub::default();
    let board = add_soundboard(&mut hub, "Board");
    let a = add_sound(&mut hub, board, "A");

    let copy = Sound::new(a, Properties::new("Copy"), Utf8PathBuf::from("/copy.mp3"));
    assert!(hub.playables.insert(Playable::Sound(copy)).is_err());

    assert_eq!(hub.get::<Playable>(a)?.props().name, "A");
    assert_eq!(hub.get::<Playable>(a)?.parent(), Some(board));
    assert_eq!(hub.add_playable(board, a, None), Err(Error::AlreadyParented { uuid: a }));
    assert_eq!(hub.children(board)?, &[a]);

    Ok(())
}

#[test]
fn add_sounds_without_destination_creates_quick_soundboard() -> Result<()> {
    let mut t = test_backend();

    let a = SoundData::from_path("/sounds/a.mp3".into());
    let container = t.add_sounds(vec![a.clone()], None, false, Some(5))?;

    let soundboards = t.soundboards();
    assert_eq!(soundboards[0].uuid, container);
    assert_eq!(soundboards[0].name, QUICK_SOUNDBOARD_NAME);
    assert_eq!(t.current_soundboard(), Some(container));
    assert_eq!(t.hub().children(container)?, &[a.uuid]);

    Ok(())
}

#[test]
fn add_sounds_moves_files() -> Result<()> {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let source_path = Utf8PathBuf::from_path_buf(source.path().join("horn.mp3")).unwrap();
    let target_dir = Utf8PathBuf::from_path_buf(target.path().join("library")).unwrap();
    std::fs::write(&source_path, b"mp3").unwrap();

    let mut t = test_backend();
    let board = t.current_soundboard().unwrap();
    t.update_settings(|s| s.sounds_location = Some(target_dir.clone()));

    let sound = SoundData::from_path(source_path.clone());
    t.add_sounds(vec![sound.clone()], Some(board), true, None)?;

    let moved = target_dir.join("horn.mp3");
    assert!(!source_path.exists());
    assert!(moved.exists());

    let PlayableData::Sound(data) = t.get_playable(sound.uuid)? else {
        panic!("expected a sound");
    };
    assert_eq!(data.path, moved);

    Ok(())
}

#[test]
fn edit_playable_keeps_uuid_and_place() -> Result<()> {
    let mut t = test_backend();
    let board = t.current_soundboard().unwrap();
    let group = t.group(board, "Group", GroupMode::First);
    t.events();

    let PlayableData::Group(mut data) = t.get_playable(group)? else {
        panic!("expected a group");
    };
    data.name = "Renamed".into();
    data.mode = GroupMode::Combine;
    data.volume = 40;
    t.edit_playable(PlayableData::Group(data.clone()))?;

    assert_eq!(t.get_playable(group)?, PlayableData::Group(data.clone()));
    assert_eq!(t.hub().children(board)?, &[group]);
    assert_eq!(
        t.events(),
        vec![Event::PlayableChanged {
            playable: PlayableData::Group(data.clone())
        }]
    );

    data.volume = 101;
    assert_eq!(
        t.edit_playable(PlayableData::Group(data)),
        Err(Error::InvalidVolume)
    );

    Ok(())
}

#[test]
fn copy_between_soundboards() -> Result<()> {
    let mut t = test_backend();
    let board = t.current_soundboard().unwrap();
    let other = t.soundboard("Other");
    let a = t.sound(board, "A");

    let copy = t.copy_or_move(a, Some(other), None, false)?;

    assert_ne!(copy, a);
    assert_eq!(t.hub().children(board)?, &[a]);
    assert_eq!(t.hub().children(other)?, &[copy]);

    Ok(())
}

#[test]
fn move_within_container() -> Result<()> {
    let mut t = test_backend();
    let board = t.current_soundboard().unwrap();
    let a = t.sound(board, "A");
    let b = t.sound(board, "B");
    let c = t.sound(board, "C");

    assert_eq!(t.copy_or_move(a, Some(board), Some(2), true)?, a);
    assert_eq!(t.hub().children(board)?, &[b, c, a]);

    assert_eq!(
        t.copy_or_move(a, Some(board), Some(3), true),
        Err(Error::IndexOutOfBounds)
    );
    assert_eq!(t.hub().children(board)?, &[b, c, a]);

    Ok(())
}

#[test]
fn move_group_into_descendant_is_rejected() -> Result<()> {
    let mut t = test_backend();
    let board = t.current_soundboard().unwrap();
    let outer = t.group(board, "Outer", GroupMode::First);
    let inner = t.group(outer, "Inner", GroupMode::First);

    assert_eq!(
        t.copy_or_move(outer, Some(inner), None, true),
        Err(Error::RecursiveGroup)
    );
    assert_eq!(t.hub().children(board)?, &[outer]);

    Ok(())
}

#[test]
fn remove_playable_drops_it() -> Result<()> {
    let mut t = test_backend();
    let board = t.current_soundboard().unwrap();
    let a = t.sound(board, "A");

    t.remove_playable(a)?;

    assert!(t.hub().children(board)?.is_empty());
    assert_eq!(t.get_playable(a), Err(Error::NotFound { uuid: a }));
    assert!(t.events().contains(&Event::PlayableRemoved { uuid: a }));

    Ok(())
}

#[test]
fn create_group_by_moving() -> Result<()> {
    let mut t = test_backend();
    let board = t.current_soundboard().unwrap();
    let a = t.sound(board, "A");
    let main = t.sound(board, "Main");
    let second = t.sound(board, "Second");

    let group = t.create_group(main, second, false)?;

    assert_eq!(t.hub().children(board)?, &[a, group]);
    assert_eq!(t.hub().children(group)?, &[main, second]);
    assert_eq!(t.get_playable(group)?.name(), "Main");

    Ok(())
}

#[test]
fn create_group_by_copying() -> Result<()> {
    let mut t = test_backend();
    let board = t.current_soundboard().unwrap();
    let main = t.sound(board, "Main");
    let second = t.sound(board, "Second");

    let group = t.create_group(main, second, true)?;

    assert_eq!(t.hub().children(board)?, &[group, second]);
    let children = t.hub().children(group)?.to_vec();
    assert_eq!(children[0], main);
    assert_ne!(children[1], second);
    assert_eq!(t.get_playable(children[1])?.name(), "Second");

    Ok(())
}

#[test]
fn ungroup_splices_children() -> Result<()> {
    let mut t = test_backend();
    let board = t.current_soundboard().unwrap();
    let a = t.sound(board, "A");
    let group = t.group(board, "Group", GroupMode::First);
    let b = t.sound(group, "B");
    let c = t.sound(group, "C");
    let d = t.sound(board, "D");

    t.ungroup(group)?;

    assert_eq!(t.hub().children(board)?, &[a, b, c, d]);
    assert_eq!(t.hub().ancestors(b), vec![board]);
    assert!(!t.hub().playables.has(group));

    Ok(())
}

#[test]
fn sort_ignores_case() -> Result<()> {
    let mut t = test_backend();
    let board = t.current_soundboard().unwrap();
    let b = t.sound(board, "banana");
    let a = t.sound(board, "Apple");
    let c = t.sound(board, "cherry");
    t.events();

    t.sort_container(board)?;

    assert_eq!(t.hub().children(board)?, &[a, b, c]);
    assert_eq!(
        t.events(),
        vec![Event::ContainerSorted {
            container: board,
            children: vec![a, b, c]
        }]
    );

    Ok(())
}

#[test]
fn linked_soundboard_rejects_manual_changes() -> Result<()> {
    let folder = TempDir::new().unwrap();
    let mut t = test_backend();
    let board = t.current_soundboard().unwrap();
    let other = t.soundboard("Other");
    let a = t.sound(board, "A");
    let b = t.sound(other, "B");

    let mut data = t.get_soundboard(board)?;
    data.linked_folder = Some(Utf8PathBuf::from_path_buf(folder.path().into()).unwrap());
    t.edit_soundboard(data)?;

    let violation = Error::LinkedSoundboardViolation { uuid: board };
    let sound = SoundData::from_path("/sounds/x.mp3".into());

    assert_eq!(
        t.add_sounds(vec![sound], Some(board), false, None),
        Err(violation.clone())
    );
    assert_eq!(
        t.copy_or_move(b, Some(board), None, true),
        Err(violation.clone())
    );
    assert_eq!(t.sort_container(board), Err(violation));
    assert_eq!(t.hub().children(other)?, &[b]);

    // linking to an empty folder dropped the manually added sound
    assert!(!t.hub().playables.has(a));

    Ok(())
}

#[test]
fn soundboard_lifecycle() -> Result<()> {
    let mut t = test_backend();
    let default = t.current_soundboard().unwrap();
    t.events();

    let data = SoundboardData::new("Memes");
    let uuid = t.create_soundboard(data.clone())?;

    assert_eq!(t.current_soundboard(), Some(uuid));
    assert_eq!(t.hub().soundboard_order, vec![uuid, default]);
    assert_eq!(
        t.events(),
        vec![
            Event::SoundboardAdded {
                soundboard: data.clone(),
                index: 0,
                is_current: true
            },
            Event::CurrentSoundboardChanged {
                soundboard: data.clone()
            },
        ]
    );

    t.move_soundboard(uuid, 1)?;
    assert_eq!(t.hub().soundboard_order, vec![default, uuid]);
    assert_eq!(t.move_soundboard(uuid, 2), Err(Error::IndexOutOfBounds));

    t.events();

    t.remove_soundboard(uuid)?;
    assert_eq!(t.hub().soundboard_order, vec![default]);
    assert_eq!(t.current_soundboard(), Some(default));
    assert_eq!(
        t.events(),
        vec![
            Event::SoundboardRemoved { uuid },
            Event::CurrentSoundboardChanged {
                soundboard: t.get_soundboard(default)?
            },
        ]
    );

    Ok(())
}

#[test]
fn removing_other_soundboard_keeps_current() -> Result<()> {
    let mut t = test_backend();
    let default = t.current_soundboard().unwrap();
    let other = t.soundboard("Other");
    t.events();

    t.remove_soundboard(other)?;

    assert_eq!(t.current_soundboard(), Some(default));
    assert_eq!(t.events(), vec![Event::SoundboardRemoved { uuid: other }]);

    Ok(())
}
