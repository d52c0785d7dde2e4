//! Ports (trait boundaries) for external dependencies.
//!
//! The trainer talks to agents through [`Policy`], reports progress through
//! [`Observer`], and persists agents through [`SnapshotRepository`].

pub mod observer;
pub mod policy;
pub mod repository;

pub use observer::Observer;
pub use policy::Policy;
pub use repository::SnapshotRepository;
