//! Locomotion errors.

/// Errors returned by the locomotion controller and its support types.
#[derive(Debug, thiserror::Error)]
pub enum LocomotionError {
    /// A required collaborator was never supplied
    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),

    /// A configuration value is out of range
    #[error("invalid config field `{field}`: {reason}")]
    InvalidConfig {
        /// Offending field name
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },

    /// Actor has not been spawned yet
    #[error("actor not spawned")]
    NotSpawned,

    /// Actor was spawned twice
    #[error("actor already spawned")]
    AlreadySpawned,

    /// Actor has been despawned
    #[error("actor despawned")]
    Despawned,

    /// Step delta is negative or not finite
    #[error("invalid time step: {0}")]
    InvalidTimeStep(f32),

    /// Input event carried unusable values
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Input queue is full and the event could not be coalesced
    #[error("input queue full (capacity {capacity})")]
    InputQueueFull {
        /// Queue capacity
        capacity: usize,
    },

    /// Filesystem error while loading configuration
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration JSON could not be parsed
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Input recording could not be encoded or decoded
    #[error("recording codec error: {0}")]
    RecordingCodec(#[from] bincode::Error),
}

/// Result alias for locomotion operations.
pub type Result<T> = std::result::Result<T, LocomotionError>;
