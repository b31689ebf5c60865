//! Data directory, host config and store setup shared by every command.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use pullfocus_core::storage::{self, Config, StorageBackend};
use pullfocus_core::{KeyValueStore, MemoryStore, SqliteStore, TimerEngine};
use serde::Serialize;
use tracing::{debug, warn};

pub type CmdResult = Result<(), Box<dyn Error>>;

pub struct Host {
    pub dir: PathBuf,
    pub config: Config,
}

impl Host {
    pub fn load() -> Result<Self, Box<dyn Error>> {
        let dir = storage::data_dir()?;
        let config = Config::load(&dir)?;
        Ok(Self { dir, config })
    }

    pub fn open_store(&self) -> Result<Arc<dyn KeyValueStore>, Box<dyn Error>> {
        match self.config.storage.backend {
            StorageBackend::Sqlite => {
                let path = self.config.database_path(&self.dir);
                debug!(path = %path.display(), "using sqlite backend");
                Ok(Arc::new(SqliteStore::open(path)?))
            }
            StorageBackend::Memory => {
                warn!("memory backend selected, nothing will be kept after this command");
                Ok(Arc::new(MemoryStore::new()))
            }
        }
    }

    pub fn open_engine(&self) -> Result<TimerEngine, Box<dyn Error>> {
        Ok(TimerEngine::open(self.open_store()?))
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One JSON document per line, for streamed output.
pub fn print_line<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
