mod error;
pub mod event;
pub mod library;
pub mod media;
pub mod playable;
pub mod settings;

pub use msb_core::keys::{KeyCode, KeyCombo};
pub use msb_core::Uuid;

pub use self::error::{Error, Result};
pub use self::event::Event;
