mod encoding;
mod records;

use std::path::{Path, PathBuf};

use msb_api::library::{Library, Persistence};
use rusqlite::{Connection, OpenFlags, TransactionBehavior};
use tempfile::{NamedTempFile, TempPath};
use tracing::{debug, instrument};

/// The soundboard library stored in a SQLite database.
#[derive(Debug)]
pub struct Document {
    path: Option<PathBuf>,
    _temp_path: Option<TempPath>,
    db: Connection,
}

impl Document {
    /// Creates a document in a temporary file that is removed on drop.
    pub fn new() -> Result<Document> {
        let temp_path = NamedTempFile::with_prefix("msb-unsaved-")?.into_temp_path();
        let db = Connection::open(&temp_path)?;

        let mut document = Document {
            path: None,
            _temp_path: Some(temp_path),
            db,
        };

        document.create_schema()?;

        Ok(document)
    }

    /// Opens the document at `path`, creating an empty one if nothing is there.
    pub fn open(path: &Path) -> Result<Document> {
        let db = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        let mut document = Document {
            path: Some(path.into()),
            _temp_path: None,
            db,
        };

        match document.read_version()? {
            None => {
                debug!(?path, "Initializing new document");
                document.create_schema()?;
            }
            Some(Version::V1) => {}
        }

        Ok(document)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn read_version(&self) -> Result<Option<Version>> {
        let version: u32 = self
            .db
            .query_row("PRAGMA user_version", [], |row| row.get(0))?;

        match version {
            0 => Ok(None),
            v => Version::from_u32(v).map(Some),
        }
    }

    fn create_schema(&mut self) -> Result<()> {
        let tx = self
            .db
            .transaction_with_behavior(TransactionBehavior::Exclusive)?;

        tx.execute(
            &format!("PRAGMA user_version = {}", Version::LATEST.as_u32()),
            [],
        )?;

        let sql = "
            CREATE TABLE soundboards (
                position INTEGER PRIMARY KEY ASC,
                data BLOB NOT NULL
            );

            CREATE TABLE settings (
                id INTEGER PRIMARY KEY CHECK (id = 0),
                data BLOB NOT NULL
            );
        ";

        tx.execute_batch(sql)?;
        tx.commit()?;

        Ok(())
    }

    /// Reads the whole library. A document that was never written yields the defaults.
    #[instrument(skip_all, err)]
    pub fn read_library(&self) -> Result<Library> {
        let mut stmt = self
            .db
            .prepare_cached("SELECT data FROM soundboards ORDER BY position")?;

        let soundboards = stmt
            .query_and_then([], |row| {
                let data: Vec<u8> = row.get(0)?;
                records::deserialize_soundboard(&data)
            })?
            .collect::<Result<Vec<_>>>()?;

        let mut stmt = self
            .db
            .prepare_cached("SELECT data FROM settings WHERE id = 0")?;

        let settings = stmt
            .query_and_then([], |row| {
                let data: Vec<u8> = row.get(0)?;
                records::deserialize_settings(&data)
            })?
            .next()
            .transpose()?
            .unwrap_or_default();

        Ok(Library {
            settings,
            soundboards,
        })
    }

    /// Replaces the stored library in a single transaction.
    #[instrument(skip_all, err)]
    pub fn write_library(&mut self, library: &Library) -> Result<()> {
        let tx = self
            .db
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute("DELETE FROM soundboards", [])?;

        {
            let mut stmt =
                tx.prepare_cached("INSERT INTO soundboards (position, data) VALUES (?1, ?2)")?;

            for (position, soundboard) in library.soundboards.iter().enumerate() {
                let data = records::serialize_soundboard(soundboard)?;
                stmt.execute(rusqlite::params![position as i64, data])?;
            }
        }

        let settings = records::serialize_settings(&library.settings)?;
        tx.execute(
            "INSERT OR REPLACE INTO settings (id, data) VALUES (0, ?1)",
            [settings],
        )?;

        tx.commit()?;

        Ok(())
    }
}

impl Persistence for Document {
    fn load(&mut self) -> msb_api::Result<Library> {
        self.read_library().map_err(msb_api::Error::new_persistence)
    }

    fn save(&mut self, library: &Library) -> msb_api::Result<()> {
        self.write_library(library)
            .map_err(msb_api::Error::new_persistence)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unsupported version")]
    UnsupportedVersion,
    #[error("invalid document")]
    InvalidDocument,
    #[error("serialization failed")]
    SerializationFailed,
    #[error("database error: {error}")]
    Database {
        #[source]
        #[from]
        error: rusqlite::Error,
    },
    #[error("io error: {error}")]
    Io {
        #[source]
        #[from]
        error: std::io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

crate::define_version_enum! {
    enum Version {
        V1 = 1,
    }
    latest = V1
}
