mod command;
mod media;

use std::io::BufRead;
use std::path::PathBuf;

use msb_api::{Error, Event, Result};
use msb_backend::document::Document;
use msb_backend::{Backend, Collaborators};
use tracing::{error, info, warn};
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use self::command::Command;
use self::media::{LogKeys, LogMedia};

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(ErrorLayer::default())
        .init();

    if let Err(error) = run() {
        error!(?error, "Fatal error");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let document = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => Document::open(&path),
        None => Document::new(),
    }
    .map_err(Error::new_persistence)?;

    match document.path() {
        Some(path) => info!(path = %path.display(), "Opened library"),
        None => info!("Using an unsaved library"),
    }

    let mut backend = Backend::new(Collaborators {
        media: Box::new(LogMedia::default()),
        key_simulator: Box::new(LogKeys::default()),
        persistence: Box::new(document),
    })?;

    let events = backend.subscribe();
    std::thread::spawn(move || {
        while let Ok(event) = events.recv_blocking() {
            log_event(&event);
        }
    });

    for line in std::io::stdin().lock().lines() {
        let line = line.map_err(Error::new_io)?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(message) => {
                warn!(%message, "Invalid command");
                continue;
            }
        };

        if matches!(command, Command::Quit) {
            break;
        }

        if let Err(error) = command.run(&mut backend) {
            warn!(?error, "Command failed");
        }
    }

    if backend.is_dirty() {
        backend.save();
    }

    Ok(())
}

fn log_event(event: &Event) {
    match event {
        Event::PlayError { message } | Event::SaveFailed { message } => {
            warn!(%message, "Backend reported an error")
        }
        event => info!(?event, "Event"),
    }
}
