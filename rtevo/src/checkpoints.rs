//! Durable snapshots of a run and of the random
//! stream driving it, keyed by run index and
//! generation, so an interrupted experiment can
//! resume exactly where it stopped.
use crate::errors::CheckpointError;
use crate::{Run, SimContext};

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A restored snapshot.
#[derive(Debug, Deserialize)]
pub struct Checkpoint<D> {
    pub run_index: usize,
    pub generation: usize,
    pub context: SimContext,
    pub run: Run<D>,
}

impl<D> Checkpoint<D> {
    /// Splits the checkpoint into the state needed
    /// to continue the run.
    pub fn into_parts(self) -> (SimContext, Run<D>) {
        (self.context, self.run)
    }
}

#[derive(Serialize)]
struct CheckpointRef<'a, D> {
    run_index: usize,
    generation: usize,
    context: &'a SimContext,
    run: &'a Run<D>,
}

/// A directory of checkpoint files, one per
/// (run index, generation) pair, named
/// `r{run:03}-g{generation:03}.json`.
#[derive(Clone, Debug)]
pub struct CheckpointStore {
    directory: PathBuf,
}

impl CheckpointStore {
    /// Opens a store rooted at `directory`,
    /// creating the directory if needed.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn open(directory: impl Into<PathBuf>) -> Result<CheckpointStore, CheckpointError> {
        let directory = directory.into();
        fs::create_dir_all(&directory).map_err(|source| CheckpointError::Io {
            path: directory.clone(),
            source,
        })?;
        Ok(CheckpointStore { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Returns the file path of a checkpoint.
    ///
    /// # Examples
    /// ```
    /// use rtevo::CheckpointStore;
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let store = CheckpointStore::open(dir.path()).unwrap();
    /// assert!(store.path(3, 40).ends_with("r003-g040.json"));
    /// assert!(store.path(12, 1500).ends_with("r012-g1500.json"));
    /// ```
    pub fn path(&self, run_index: usize, generation: usize) -> PathBuf {
        self.directory.join(file_name(run_index, generation))
    }

    /// Returns `true` if a checkpoint file exists for the key.
    pub fn contains(&self, run_index: usize, generation: usize) -> bool {
        self.path(run_index, generation).is_file()
    }

    /// Writes a checkpoint of `run` at its current generation.
    ///
    /// The file is written in full under a temporary name,
    /// synced, then renamed into place: a checkpoint file
    /// is either absent or complete.
    ///
    /// # Errors
    /// Returns an error if encoding or any I/O step fails.
    /// No partial file is left behind.
    pub fn save<D: Serialize>(
        &self,
        run_index: usize,
        context: &SimContext,
        run: &Run<D>,
    ) -> Result<PathBuf, CheckpointError> {
        let generation = run.generation();
        let path = self.path(run_index, generation);
        let temp = TempPath::new(
            self.directory
                .join(format!(".{}.tmp", file_name(run_index, generation))),
        );
        let io_error = |source: io::Error| CheckpointError::Io {
            path: temp.path.clone(),
            source,
        };

        let file = File::create(&temp.path).map_err(io_error)?;
        let mut writer = BufWriter::new(file);
        let record = CheckpointRef {
            run_index,
            generation,
            context,
            run,
        };
        serde_json::to_writer(&mut writer, &record).map_err(|source| CheckpointError::Encode {
            run_index,
            generation,
            source,
        })?;
        let file = writer
            .into_inner()
            .map_err(|e| io_error(e.into_error()))?;
        file.sync_all().map_err(io_error)?;
        drop(file);

        fs::rename(&temp.path, &path).map_err(|source| CheckpointError::Io {
            path: path.clone(),
            source,
        })?;
        temp.disarm();
        debug!("saved checkpoint {}", path.display());
        Ok(path)
    }

    /// Reads the checkpoint for the given key.
    ///
    /// # Errors
    /// Returns `Ok(None)` if no such checkpoint exists,
    /// and an error if it exists but cannot be read,
    /// cannot be decoded, or holds a different key.
    pub fn load<D: DeserializeOwned>(
        &self,
        run_index: usize,
        generation: usize,
    ) -> Result<Option<Checkpoint<D>>, CheckpointError> {
        let path = self.path(run_index, generation);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(CheckpointError::Io { path, source }),
        };
        let checkpoint: Checkpoint<D> = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| CheckpointError::Corrupt {
                path: path.clone(),
                source,
            })?;
        let found = (checkpoint.run_index, checkpoint.generation);
        if found != (run_index, generation) {
            return Err(CheckpointError::KeyMismatch {
                path,
                expected: (run_index, generation),
                found,
            });
        }
        debug!("loaded checkpoint {}", path.display());
        Ok(Some(checkpoint))
    }

    /// Returns the highest generation with a
    /// checkpoint for `run_index`, if any.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be listed.
    pub fn latest(&self, run_index: usize) -> Result<Option<usize>, CheckpointError> {
        let io_error = |source| CheckpointError::Io {
            path: self.directory.clone(),
            source,
        };
        let prefix = format!("r{:03}-g", run_index);
        let mut latest = None;
        for entry in fs::read_dir(&self.directory).map_err(io_error)? {
            let name = entry.map_err(io_error)?.file_name();
            let generation = name
                .to_str()
                .and_then(|n| n.strip_prefix(&prefix))
                .and_then(|n| n.strip_suffix(".json"))
                .and_then(|n| n.parse::<usize>().ok());
            if let Some(generation) = generation {
                latest = latest.max(Some(generation));
            }
        }
        Ok(latest)
    }
}

fn file_name(run_index: usize, generation: usize) -> String {
    format!("r{:03}-g{:03}.json", run_index, generation)
}

/// Removes the wrapped file on drop unless disarmed.
struct TempPath {
    path: PathBuf,
    armed: bool,
}

impl TempPath {
    fn new(path: PathBuf) -> TempPath {
        TempPath { path, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for TempPath {
    fn drop(&mut self) {
        if self.armed {
            warn!("discarding incomplete checkpoint {}", self.path.display());
            let _ = fs::remove_file(&self.path);
        }
    }
}
