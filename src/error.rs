// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, JumpError>;

#[derive(Debug, Error)]
pub enum JumpError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("malformed landmark frame on line {line}: {reason}")]
    MalformedFrame { line: usize, reason: String },

    #[error("pose bridge: {0}")]
    Bridge(String),
}

/// Why a frame did not advance calibration or jump detection.
/// None of these are failures; the next frame simply tries again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSkip {
    /// No pose detected in the frame
    MissingObservation,
    /// A required landmark is absent or below the visibility threshold
    IncompleteVisibility(crate::landmarks::LandmarkId),
    /// Calibration pose rejected: arms not held level
    ArmsNotHorizontal,
    /// Calibration pose rejected: nose and heels at the same height
    ZeroReferenceHeight,
    /// Hips missing, no vertical signal for the jump tracker
    MissingHips,
}

impl std::fmt::Display for FrameSkip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameSkip::MissingObservation => write!(f, "no pose detected"),
            FrameSkip::IncompleteVisibility(id) => write!(f, "{:?} not visible", id),
            FrameSkip::ArmsNotHorizontal => write!(f, "arms not horizontal"),
            FrameSkip::ZeroReferenceHeight => write!(f, "zero reference height"),
            FrameSkip::MissingHips => write!(f, "hips missing"),
        }
    }
}
