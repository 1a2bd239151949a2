use std::str::FromStr;

use camino::Utf8PathBuf;
use msb_api::media::InstanceId;
use msb_api::playable::SoundData;
use msb_api::{KeyCode, Result, Uuid};
use msb_backend::Backend;

/// A line read from stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Down(KeyCode),
    Up(KeyCode),
    Play(Uuid),
    Stop(Uuid),
    StopAll,
    Ended(InstanceId),
    Add(Utf8PathBuf),
    Select(Uuid),
    List,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Command, String> {
        let (name, arg) = match line.split_once(' ') {
            Some((name, arg)) => (name, arg.trim()),
            None => (line, ""),
        };

        let code = || arg.parse::<u32>().map_err(|e| format!("bad key code: {e}"));
        let uuid = || arg.parse::<Uuid>().map_err(|e| format!("bad uuid: {e}"));

        let command = match name {
            "down" => Command::Down(KeyCode(code()?)),
            "up" => Command::Up(KeyCode(code()?)),
            "play" => Command::Play(uuid()?),
            "stop" => Command::Stop(uuid()?),
            "stop-all" => Command::StopAll,
            "ended" => {
                let id = arg.parse::<u64>().map_err(|e| format!("bad instance: {e}"))?;
                Command::Ended(InstanceId(id))
            }
            "add" if !arg.is_empty() => Command::Add(Utf8PathBuf::from(arg)),
            "select" => Command::Select(uuid()?),
            "list" => Command::List,
            "quit" => Command::Quit,
            _ => return Err(format!("unknown command `{line}`")),
        };

        Ok(command)
    }
}

impl Command {
    pub fn run(self, backend: &mut Backend) -> Result<()> {
        match self {
            Command::Down(key) => backend.key_down(key),
            Command::Up(key) => backend.key_up(key),
            Command::Play(uuid) => backend.play(uuid)?,
            Command::Stop(uuid) => backend.stop(uuid)?,
            Command::StopAll => backend.stop_all(),
            Command::Ended(id) => backend.instance_ended(id),
            Command::Add(path) => {
                let destination = backend.current_soundboard();
                backend.add_sounds(vec![SoundData::from_path(path)], destination, false, None)?;
            }
            Command::Select(uuid) => backend.set_current_soundboard(uuid)?,
            Command::List => list(backend)?,
            Command::Quit => {}
        }

        Ok(())
    }
}

fn list(backend: &Backend) -> Result<()> {
    let current = backend.current_soundboard();

    for soundboard in backend.soundboards() {
        let marker = if Some(soundboard.uuid) == current { "*" } else { " " };
        println!("{marker} {} {} [{}]", soundboard.uuid, soundboard.name, soundboard.keys);
        print_children(backend, soundboard.uuid, 1)?;
    }

    Ok(())
}

fn print_children(backend: &Backend, container: Uuid, depth: usize) -> Result<()> {
    for playable in backend.get_children(container)? {
        let indent = "  ".repeat(depth);
        let count = backend.playing_instance_count(playable.uuid());
        println!("{indent}{} {} ({count} playing)", playable.uuid(), playable.name());

        if let msb_api::playable::PlayableData::Group(_) = playable {
            print_children(backend, playable.uuid(), depth + 1)?;
        }
    }

    Ok(())
}
