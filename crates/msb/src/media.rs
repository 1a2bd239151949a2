use msb_api::media::{
    AudioSource, HoldHandle, InstanceId, KeySimulator, MediaBackend, MediaInstance, UiCue,
};
use msb_api::{KeyCombo, Result};
use tracing::info;

/// Media backend that only logs what it would play.
#[derive(Debug, Default)]
pub struct LogMedia;

impl MediaBackend for LogMedia {
    fn create(&mut self, id: InstanceId, source: &AudioSource) -> Result<Box<dyn MediaInstance>> {
        for route in &source.routes {
            info!(?id, path = %source.path, device = %route.device, gain = route.gain, "Routing instance");
        }

        Ok(Box::new(LogInstance { id }))
    }

    fn play_cue(&mut self, cue: UiCue) {
        info!(?cue, "Cue");
    }
}

#[derive(Debug)]
struct LogInstance {
    id: InstanceId,
}

impl MediaInstance for LogInstance {
    fn play(&mut self) -> Result<()> {
        info!(id = ?self.id, "Playing");
        Ok(())
    }

    fn stop(&mut self) {
        info!(id = ?self.id, "Stopping");
    }

    fn set_looping(&mut self, looping: bool) {
        info!(id = ?self.id, looping, "Looping changed");
    }
}

#[derive(Debug, Default)]
pub struct LogKeys {
    next: u64,
}

impl KeySimulator for LogKeys {
    fn hold(&mut self, keys: &KeyCombo) -> HoldHandle {
        let handle = HoldHandle(self.next);
        self.next += 1;
        info!(%keys, "Holding keys");
        handle
    }

    fn release(&mut self, handle: HoldHandle) {
        info!(?handle, "Releasing keys");
    }
}
