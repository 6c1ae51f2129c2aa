// src/lib.rs
//! Vertical jump height from body landmarks.
//!
//! A [`session::Session`] consumes one [`landmarks::PoseObservation`] per frame.
//! Until a T-pose calibrates the cm-per-unit scale it only tries to calibrate;
//! afterwards it tracks the mean hip height and records each landed jump.
//!
//! Thresholds are in normalized image units, so detection sensitivity depends
//! on how far the subject stands from the camera.

pub mod calibration;
pub mod config;
pub mod data;
pub mod error;
pub mod filter;
pub mod history;
pub mod jump;
pub mod landmarks;
pub mod mediapipe_bridge;
pub mod session;
pub mod source;

#[cfg(feature = "desktop")]
pub mod app;
#[cfg(feature = "desktop")]
pub mod ui;
#[cfg(feature = "desktop")]
pub mod video;

pub use config::Config;
pub use error::{FrameSkip, JumpError};
pub use landmarks::{Landmark, LandmarkId, PoseObservation};
pub use session::{DisplayPayload, FrameOutcome, Session};
