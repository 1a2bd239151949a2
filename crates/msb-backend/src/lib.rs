pub mod document;
pub mod hierarchy;
mod id_allocator;
pub mod keybind;
mod library;
pub mod object;
pub mod playable;
pub mod playback;
pub mod resolver;
mod settings;
mod subscribers;
mod sync;

#[cfg(test)]
mod tests;

use async_channel::Receiver;
use msb_api::library::{Library, Persistence};
use msb_api::media::{KeySimulator, MediaBackend};
use msb_api::playable::SoundboardData;
use msb_api::settings::Settings;
use msb_api::{Event, Result};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use self::keybind::{KeyState, Recordings};
use self::object::{Hub, Uuid};
use self::playable::{Properties, Soundboard};
use self::playback::Tracker;
use self::subscribers::Subscribers;

pub const DEFAULT_SOUNDBOARD_NAME: &str = "Default";

/// Everything the engine needs from the outside world.
pub struct Collaborators {
    pub media: Box<dyn MediaBackend>,
    pub key_simulator: Box<dyn KeySimulator>,
    pub persistence: Box<dyn Persistence>,
}

pub struct Backend {
    hub: Hub,
    settings: Settings,
    tracker: Tracker,
    key_state: KeyState,
    recordings: Recordings,
    subscribers: Subscribers<Event>,
    persistence: Box<dyn Persistence>,
    rng: SmallRng,
    dirty: bool,
}

impl Backend {
    pub fn new(collaborators: Collaborators) -> Result<Backend> {
        Backend::with_rng(collaborators, SmallRng::from_entropy())
    }

    /// Loads the library and brings linked soundboards up to date with their folders.
    pub fn with_rng(collaborators: Collaborators, rng: SmallRng) -> Result<Backend> {
        let Collaborators {
            media,
            key_simulator,
            mut persistence,
        } = collaborators;

        let Library {
            settings,
            soundboards,
        } = persistence.load()?;

        let mut backend = Backend {
            hub: Hub::from_records(soundboards)?,
            settings,
            tracker: Tracker::new(media, key_simulator),
            key_state: KeyState::new(),
            recordings: Recordings::default(),
            subscribers: Subscribers::new(),
            persistence,
            rng,
            dirty: false,
        };

        if backend.hub.soundboards.is_empty() {
            debug!("Library is empty, creating the default soundboard");
            let soundboard = Soundboard::new(Uuid::new_v4(), Properties::new(DEFAULT_SOUNDBOARD_NAME));
            backend.hub.soundboard_order.push(soundboard.uuid());
            backend.hub.soundboards.insert(soundboard)?;
            backend.dirty = true;
        }

        let linked = backend
            .hub
            .soundboards_in_order()
            .filter(|soundboard| soundboard.is_linked())
            .map(|soundboard| soundboard.uuid())
            .collect::<Vec<_>>();

        for soundboard in linked {
            if let Err(error) = backend.sync_linked_folder(soundboard) {
                warn!(?error, %soundboard, "Failed to sync linked folder");
            }
        }

        if backend.dirty {
            backend.save();
        }

        Ok(backend)
    }

    pub fn subscribe(&mut self) -> Receiver<Event> {
        self.subscribers.subscribe()
    }

    pub fn hub(&self) -> &Hub {
        &self.hub
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn soundboards(&self) -> Vec<SoundboardData> {
        self.hub
            .soundboards_in_order()
            .map(Soundboard::to_data)
            .collect()
    }

    /// Whether some change has not reached persistence yet.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn notify(&mut self, event: Event) {
        self.subscribers.notify(event);
    }

    /// Marks the library as changed and saves it.
    fn commit(&mut self) {
        self.dirty = true;
        self.save();
    }

    /// Writes the library out. A failure is reported but the in-memory state is
    /// kept and the save is retried on the next commit.
    pub fn save(&mut self) {
        let library = Library {
            settings: self.settings.clone(),
            soundboards: self.hub.to_records(),
        };

        match self.persistence.save(&library) {
            Ok(()) => self.dirty = false,
            Err(error) => {
                warn!(?error, "Failed to save library");
                self.notify(Event::SaveFailed {
                    message: error.to_string(),
                });
            }
        }
    }
}
