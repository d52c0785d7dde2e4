//! Repository port for agent snapshot persistence.
//!
//! This module defines the trait boundary between the learning core and the
//! storage format used for trained agents.

use std::path::Path;

use crate::{Result, q_learning::AgentSnapshot};

/// Port for persisting and loading agent snapshots.
///
/// Implementations must treat a snapshot as one unit: a save either fully
/// replaces the target or leaves it as it was, and a load either returns a
/// complete snapshot or an error.
///
/// # Examples
///
/// ```no_run
/// use morpion::ports::SnapshotRepository;
/// use morpion::q_learning::QLearningAgent;
/// use std::path::Path;
///
/// fn persist<R: SnapshotRepository>(
///     repo: &R,
///     agent: &QLearningAgent,
///     path: &Path,
/// ) -> morpion::Result<()> {
///     repo.save(&agent.snapshot(), path)
/// }
/// ```
pub trait SnapshotRepository {
    /// Save a snapshot to persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The target directory cannot be written to
    /// - Serialization fails
    fn save(&self, snapshot: &AgentSnapshot, path: &Path) -> Result<()>;

    /// Load a snapshot from persistent storage.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist or cannot be read
    /// - The file format is invalid or corrupted
    fn load(&self, path: &Path) -> Result<AgentSnapshot>;
}
