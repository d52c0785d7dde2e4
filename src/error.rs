//! Error types for the morpion crate

use thiserror::Error;

/// Main error type for the morpion crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("illegal move at position {position}: {reason}")]
    IllegalMove { position: usize, reason: IllegalMoveReason },

    #[error("no legal actions available")]
    NoLegalActions,

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("unsupported snapshot format version {found} (expected {expected})")]
    UnsupportedSnapshotVersion { found: u32, expected: u32 },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Why a move was rejected by the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMoveReason {
    /// Index is not in 0..9
    OutOfRange,
    /// Cell already holds a mark
    Occupied,
    /// The game has already ended
    GameOver,
}

impl std::fmt::Display for IllegalMoveReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            IllegalMoveReason::OutOfRange => "position is out of bounds (must be 0-8)",
            IllegalMoveReason::Occupied => "position is already occupied",
            IllegalMoveReason::GameOver => "game already over",
        };
        f.write_str(text)
    }
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
