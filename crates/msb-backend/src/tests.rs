use std::cell::RefCell;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

use async_channel::Receiver;
use camino::Utf8PathBuf;
use msb_api::library::{Library, Persistence};
use msb_api::media::{
    AudioSource, HoldHandle, InstanceId, KeySimulator, MediaBackend, MediaInstance, UiCue,
};
use msb_api::playable::GroupMode;
use msb_api::{Error, Event, KeyCombo, Result};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::object::{Hub, Uuid};
use crate::playable::{Group, Playable, Properties, Sound, Soundboard};
use crate::{Backend, Collaborators};

#[derive(Debug, Default)]
pub struct MediaLog {
    pub started: Vec<(InstanceId, AudioSource)>,
    pub stopped: Vec<InstanceId>,
    pub looping: Vec<(InstanceId, bool)>,
    pub cues: Vec<UiCue>,
    /// Sources with these paths fail to start.
    pub broken: Vec<Utf8PathBuf>,
}

pub struct FakeMedia(Rc<RefCell<MediaLog>>);

impl MediaBackend for FakeMedia {
    fn create(&mut self, id: InstanceId, source: &AudioSource) -> Result<Box<dyn MediaInstance>> {
        if self.0.borrow().broken.contains(&source.path) {
            return Err(Error::new_playback(format!("cannot decode {}", source.path)));
        }

        self.0.borrow_mut().started.push((id, source.clone()));

        Ok(Box::new(FakeInstance {
            id,
            log: self.0.clone(),
        }))
    }

    fn play_cue(&mut self, cue: UiCue) {
        self.0.borrow_mut().cues.push(cue);
    }
}

#[derive(Debug)]
struct FakeInstance {
    id: InstanceId,
    log: Rc<RefCell<MediaLog>>,
}

impl MediaInstance for FakeInstance {
    fn play(&mut self) -> Result<()> {
        Ok(())
    }

    fn stop(&mut self) {
        self.log.borrow_mut().stopped.push(self.id);
    }

    fn set_looping(&mut self, looping: bool) {
        self.log.borrow_mut().looping.push((self.id, looping));
    }
}

#[derive(Debug, Default)]
pub struct KeyLog {
    pub held: Vec<(HoldHandle, KeyCombo)>,
    pub released: Vec<HoldHandle>,
}

impl KeyLog {
    pub fn is_holding(&self) -> bool {
        self.held.len() > self.released.len()
    }
}

pub struct FakeKeys(Rc<RefCell<KeyLog>>);

impl KeySimulator for FakeKeys {
    fn hold(&mut self, keys: &KeyCombo) -> HoldHandle {
        let mut log = self.0.borrow_mut();
        let handle = HoldHandle(log.held.len() as u64);
        log.held.push((handle, keys.clone()));
        handle
    }

    fn release(&mut self, handle: HoldHandle) {
        self.0.borrow_mut().released.push(handle);
    }
}

#[derive(Debug, Default)]
pub struct Store {
    pub library: Option<Library>,
    pub saves: usize,
    pub fail: bool,
}

pub struct FakePersistence(Rc<RefCell<Store>>);

impl Persistence for FakePersistence {
    fn load(&mut self) -> Result<Library> {
        Ok(self.0.borrow().library.clone().unwrap_or_default())
    }

    fn save(&mut self, library: &Library) -> Result<()> {
        let mut store = self.0.borrow_mut();
        if store.fail {
            return Err(Error::new_persistence("disk full"));
        }

        store.library = Some(library.clone());
        store.saves += 1;
        Ok(())
    }
}

pub struct TestBackend {
    pub backend: Backend,
    pub receiver: Receiver<Event>,
    pub media: Rc<RefCell<MediaLog>>,
    pub keys: Rc<RefCell<KeyLog>>,
    pub store: Rc<RefCell<Store>>,
}

impl TestBackend {
    /// Drains the notifications emitted so far.
    pub fn events(&self) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            events.push(event);
        }
        events
    }

    pub fn soundboard(&mut self, name: &str) -> Uuid {
        add_soundboard(&mut self.backend.hub, name)
    }

    pub fn group(&mut self, parent: Uuid, name: &str, mode: GroupMode) -> Uuid {
        add_group(&mut self.backend.hub, parent, name, mode)
    }

    pub fn sound(&mut self, parent: Uuid, name: &str) -> Uuid {
        add_sound(&mut self.backend.hub, parent, name)
    }

    /// Instance ids the media layer started for `uuid`, oldest first.
    pub fn instances_of(&self, uuid: Uuid) -> Vec<InstanceId> {
        self.media
            .borrow()
            .started
            .iter()
            .filter(|(_, source)| source.uuid == uuid)
            .map(|(id, _)| *id)
            .collect()
    }
}

impl Deref for TestBackend {
    type Target = Backend;

    fn deref(&self) -> &Backend {
        &self.backend
    }
}

impl DerefMut for TestBackend {
    fn deref_mut(&mut self) -> &mut Backend {
        &mut self.backend
    }
}

pub fn test_backend() -> TestBackend {
    test_backend_with(Library::default())
}

pub fn test_backend_with(library: Library) -> TestBackend {
    let media = Rc::new(RefCell::new(MediaLog::default()));
    let keys = Rc::new(RefCell::new(KeyLog::default()));
    let store = Rc::new(RefCell::new(Store {
        library: Some(library),
        ..Default::default()
    }));

    let collaborators = Collaborators {
        media: Box::new(FakeMedia(media.clone())),
        key_simulator: Box::new(FakeKeys(keys.clone())),
        persistence: Box::new(FakePersistence(store.clone())),
    };

    let mut backend = Backend::with_rng(collaborators, SmallRng::seed_from_u64(0)).unwrap();
    let receiver = backend.subscribe();

    TestBackend {
        backend,
        receiver,
        media,
        keys,
        store,
    }
}

pub fn add_soundboard(hub: &mut Hub, name: &str) -> Uuid {
    let soundboard = Soundboard::new(Uuid::new_v4(), Properties::new(name));
    let uuid = soundboard.uuid();
    hub.soundboards.insert(soundboard).unwrap();
    hub.soundboard_order.push(uuid);
    uuid
}

pub fn add_group(hub: &mut Hub, parent: Uuid, name: &str, mode: GroupMode) -> Uuid {
    let group = Group::new(Uuid::new_v4(), Properties::new(name), mode);
    let uuid = group.uuid();
    hub.playables.insert(Playable::Group(group)).unwrap();
    hub.add_playable(parent, uuid, None).unwrap();
    uuid
}

pub fn add_sound(hub: &mut Hub, parent: Uuid, name: &str) -> Uuid {
    let path = Utf8PathBuf::from(format!("/sounds/{name}.mp3"));
    let sound = Sound::new(Uuid::new_v4(), Properties::new(name), path);
    let uuid = sound.uuid();
    hub.playables.insert(Playable::Sound(sound)).unwrap();
    hub.add_playable(parent, uuid, None).unwrap();
    uuid
}

#[test]
fn empty_library_gets_default_soundboard() {
    let t = test_backend();

    let soundboards = t.soundboards();
    assert_eq!(soundboards.len(), 1);
    assert_eq!(soundboards[0].name, crate::DEFAULT_SOUNDBOARD_NAME);
    assert_eq!(t.current_soundboard(), Some(soundboards[0].uuid));
    assert_eq!(t.store.borrow().saves, 1);
    assert!(!t.is_dirty());
}

#[test]
fn library_survives_reload() -> Result<()> {
    let mut t = test_backend();
    let board = t.current_soundboard().unwrap();
    let group = t.group(board, "Group", GroupMode::Random);
    let sound = t.sound(group, "A");
    t.save();

    let library = t.store.borrow().library.clone().unwrap();
    let reloaded = test_backend_with(library);

    assert_eq!(reloaded.hub().ancestors(sound), vec![group, board]);
    assert_eq!(reloaded.get_playable(sound)?, t.get_playable(sound)?);

    Ok(())
}

#[test]
fn failed_save_is_reported_and_retried() -> Result<()> {
    let mut t = test_backend();
    t.store.borrow_mut().fail = true;

    t.create_soundboard(msb_api::playable::SoundboardData::new("Board"))?;

    assert!(t.is_dirty());
    assert!(t
        .events()
        .iter()
        .any(|event| matches!(event, Event::SaveFailed { .. })));
    assert_eq!(t.soundboards().len(), 2);

    t.store.borrow_mut().fail = false;
    let default = t.soundboards()[1].uuid;
    t.set_current_soundboard(default)?;

    assert!(!t.is_dirty());
    let saved = t.store.borrow().library.clone().unwrap();
    assert_eq!(saved.soundboards.len(), 2);

    Ok(())
}

#[test]
fn repeated_uuid_in_library_is_rejected() {
    use msb_api::library::{PlayableRecord, SoundboardRecord};

    let sound = PlayableRecord::Sound {
        uuid: Uuid::new_v4(),
        name: "A".into(),
        volume: 100,
        keys: KeyCombo::new(),
        path: "/sounds/a.mp3".into(),
    };
    let board = SoundboardRecord {
        uuid: Uuid::new_v4(),
        name: "Board".into(),
        volume: 100,
        keys: KeyCombo::new(),
        linked_folder: None,
        children: vec![sound.clone(), sound],
    };

    assert!(matches!(
        Hub::from_records(vec![board]),
        Err(Error::Persistence { .. })
    ));
}
