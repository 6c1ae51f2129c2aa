// src/session.rs - Per-frame pipeline: filter -> calibrate or detect -> history
use crate::calibration::{CalibrationOutcome, CalibrationState, Calibrator};
use crate::config::Config;
use crate::error::FrameSkip;
use crate::filter::LandmarkFilter;
use crate::history::{JumpRecord, SessionHistory};
use crate::jump::{JumpPhase, JumpState, JumpTracker};
use crate::landmarks::PoseObservation;
use std::time::{Duration, Instant};

pub const CALIBRATION_PROMPT: &str = "Stand in T-pose for calibration";
pub const CALIBRATION_ACCEPTED: &str = "T-pose accepted";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameOutcome {
    pub frame: u64,
    pub calibrated: bool,
    /// Set on the single frame that committed the scale
    pub calibrated_now: bool,
    pub avg_hip_y: Option<f64>,
    pub phase: JumpPhase,
    pub current_height_cm: f64,
    /// Jump that landed on this frame
    pub jump: Option<JumpRecord>,
    pub skip: Option<FrameSkip>,
}

/// What the front end should show for the latest frame
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayPayload {
    pub calibration_text: Option<&'static str>,
    pub calibrated: bool,
    /// `None` when the latest frame had no pose
    pub phase: Option<JumpPhase>,
    pub current_height_cm: f64,
    pub top_jumps: Vec<f64>,
}

impl DisplayPayload {
    pub fn height_text(&self) -> String {
        format!("Jump Height: {:.1}cm", self.current_height_cm)
    }

    pub fn top_lines(&self) -> Vec<String> {
        self.top_jumps
            .iter()
            .enumerate()
            .map(|(i, h)| format!("Top {}: {:.1}cm", i + 1, h))
            .collect()
    }
}

pub struct Session {
    filter: LandmarkFilter,
    calibrator: Calibrator,
    tracker: JumpTracker,
    history: SessionHistory,
    top_n: usize,
    require_full_body_for_jumps: bool,
    confirmation: Duration,
    calibrated_at: Option<Instant>,
    frame_count: u64,
    last_had_pose: bool,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        let filter = LandmarkFilter::from_thresholds(&config.thresholds);
        Self {
            filter,
            calibrator: Calibrator::new(filter, config.session.known_height_cm),
            tracker: JumpTracker::from_thresholds(&config.thresholds),
            history: SessionHistory::new(),
            top_n: config.session.top_n,
            require_full_body_for_jumps: config.session.require_full_body_for_jumps,
            confirmation: Duration::try_from_secs_f64(config.session.confirmation_secs)
                .unwrap_or(Duration::from_secs(2)),
            calibrated_at: None,
            frame_count: 0,
            last_had_pose: false,
        }
    }

    pub fn calibration(&self) -> CalibrationState {
        self.calibrator.state()
    }

    pub fn jump_state(&self) -> &JumpState {
        self.tracker.state()
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn current_height_cm(&self) -> f64 {
        self.tracker
            .current_height_cm(self.calibrator.state().scale_cm_per_unit())
    }

    /// Process one frame. `now` only drives the calibration notice timer.
    pub fn process_frame(&mut self, observation: Option<&PoseObservation>, now: Instant) -> FrameOutcome {
        let frame = self.frame_count;
        self.frame_count += 1;
        self.last_had_pose = observation.is_some();

        let mut outcome = FrameOutcome {
            frame,
            ..Default::default()
        };

        match observation {
            None => outcome.skip = Some(FrameSkip::MissingObservation),
            Some(obs) if !self.calibrator.state().is_calibrated() => {
                match self.calibrator.attempt(obs) {
                    CalibrationOutcome::Calibrated { .. } => {
                        self.calibrated_at = Some(now);
                        outcome.calibrated_now = true;
                    }
                    CalibrationOutcome::AlreadyCalibrated => {}
                    CalibrationOutcome::Rejected(reason) => outcome.skip = Some(reason),
                }
            }
            Some(obs) => self.detect(obs, &mut outcome),
        }

        if let Some(reason) = outcome.skip {
            tracing::trace!(frame, %reason, "frame skipped");
        }

        outcome.calibrated = self.calibrator.state().is_calibrated();
        outcome.phase = self.tracker.phase();
        outcome.current_height_cm = self.current_height_cm();
        outcome
    }

    fn detect(&mut self, obs: &PoseObservation, outcome: &mut FrameOutcome) {
        if self.require_full_body_for_jumps {
            if let Some(hidden) = self.filter.first_hidden(obs) {
                outcome.skip = Some(FrameSkip::IncompleteVisibility(hidden));
                return;
            }
        }

        let Some(avg_hip_y) = obs.avg_hip_y() else {
            outcome.skip = Some(FrameSkip::MissingHips);
            return;
        };
        outcome.avg_hip_y = Some(avg_hip_y);

        let scale = self.calibrator.state().scale_cm_per_unit();
        if let Some(event) = self.tracker.update(avg_hip_y, scale) {
            let record = JumpRecord { height_cm: event.height_cm };
            self.history.record(record);
            tracing::info!(
                jump = self.history.len(),
                height_cm = record.height_cm,
                peak_displacement = event.peak_displacement,
                "jump completed"
            );
            outcome.jump = Some(record);
        }
    }

    pub fn display(&self, now: Instant) -> DisplayPayload {
        let calibrated = self.calibrator.state().is_calibrated();
        let calibration_text = if !calibrated {
            Some(CALIBRATION_PROMPT)
        } else {
            match self.calibrated_at {
                Some(at) if now.saturating_duration_since(at) < self.confirmation => {
                    Some(CALIBRATION_ACCEPTED)
                }
                _ => None,
            }
        };

        DisplayPayload {
            calibration_text,
            calibrated,
            phase: self.last_had_pose.then(|| self.tracker.phase()),
            current_height_cm: self.current_height_cm(),
            top_jumps: self
                .history
                .top(self.top_n)
                .iter()
                .map(|r| r.height_cm)
                .collect(),
        }
    }
}
