use std::fs::{File, OpenOptions};
use std::io::{BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::error;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Whole-file JSON snapshots in a single directory. Every save rewrites
/// the file completely; there is no locking and no atomic rename, so the
/// last writer wins and a crash mid-write leaves a corrupt file.
pub struct Store {
    root: PathBuf,
}

#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Corrupt(serde_json::Error),
}

impl Store {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// A missing file is a first run and yields the caller's default.
    /// A file that exists but doesn't parse is an error - the caller
    /// treats that as fatal rather than clobbering data it can't read.
    pub fn load<T: DeserializeOwned>(&self, name: &str, default: T) -> Result<T, LoadError> {
        let path = self.root.join(name);

        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(default),
            Err(e) => {
                error!("open \"{path:?}\": {e:?}");
                return Err(LoadError::Io(e));
            }
        };

        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            error!("parse \"{path:?}\": {e}");
            LoadError::Corrupt(e)
        })
    }

    pub fn save<T: Serialize>(&self, name: &str, value: &T) -> Result<(), std::io::Error> {
        let path = self.root.join(name);

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        let json = serde_json::to_string_pretty(value)?;
        file.write_all(json.as_bytes())
    }
}
