//! MessagePack implementation of the snapshot repository.
//!
//! Saves are atomic: the snapshot is written to a temporary file next to the
//! target and renamed over it, so readers never observe a half-written file.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use tempfile::NamedTempFile;

use crate::{Result, error::Error, ports::SnapshotRepository, q_learning::AgentSnapshot};

/// MessagePack-based snapshot repository.
///
/// # Examples
///
/// ```no_run
/// use morpion::adapters::MsgPackRepository;
/// use morpion::ports::SnapshotRepository;
/// use morpion::q_learning::{AgentConfig, QLearningAgent};
/// use std::path::Path;
///
/// let repo = MsgPackRepository;
/// let agent = QLearningAgent::new(AgentConfig::default())?;
///
/// repo.save(&agent.snapshot(), Path::new("agent.msgpack"))?;
/// let loaded = repo.load(Path::new("agent.msgpack"))?;
/// # Ok::<(), morpion::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    /// Create a new MessagePack repository.
    pub fn new() -> Self {
        Self
    }
}

impl SnapshotRepository for MsgPackRepository {
    fn save(&self, snapshot: &AgentSnapshot, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = NamedTempFile::new_in(dir).map_err(|source| Error::Io {
            operation: format!("create temporary file in {dir:?}"),
            source,
        })?;

        let mut writer = BufWriter::new(temp);
        rmp_serde::encode::write(&mut writer, snapshot).map_err(|e| {
            Error::SerializationContext {
                operation: "serialize agent snapshot to MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;
        writer.flush()?;

        let temp = writer.into_inner().map_err(|e| Error::Io {
            operation: "flush snapshot buffer".to_string(),
            source: e.into_error(),
        })?;
        temp.persist(path).map_err(|e| Error::Io {
            operation: format!("move snapshot into place at {path:?}"),
            source: e.error,
        })?;

        Ok(())
    }

    fn load(&self, path: &Path) -> Result<AgentSnapshot> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        let snapshot = rmp_serde::decode::from_read(BufReader::new(file)).map_err(|e| {
            Error::SerializationContext {
                operation: "deserialize agent snapshot from MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(snapshot)
    }
}
