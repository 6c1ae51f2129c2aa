// src/calibration.rs - T-pose calibration of the cm-per-unit scale
use crate::error::FrameSkip;
use crate::filter::LandmarkFilter;
use crate::landmarks::{LandmarkId, PoseObservation};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CalibrationState {
    scale_cm_per_unit: Option<f64>,
}

impl CalibrationState {
    pub fn is_calibrated(&self) -> bool {
        self.scale_cm_per_unit.is_some()
    }

    /// Centimetres per normalized image unit; always positive when set
    pub fn scale_cm_per_unit(&self) -> Option<f64> {
        self.scale_cm_per_unit
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CalibrationOutcome {
    /// This attempt committed the scale
    Calibrated { scale_cm_per_unit: f64 },
    /// Scale was already frozen, nothing changed
    AlreadyCalibrated,
    /// Pose did not qualify, try again next frame
    Rejected(FrameSkip),
}

/// Turns one qualifying reference pose into a frozen length scale
pub struct Calibrator {
    filter: LandmarkFilter,
    known_height_cm: f64,
    state: CalibrationState,
}

impl Calibrator {
    pub fn new(filter: LandmarkFilter, known_height_cm: f64) -> Self {
        Self {
            filter,
            known_height_cm,
            state: CalibrationState::default(),
        }
    }

    pub fn state(&self) -> CalibrationState {
        self.state
    }

    pub fn known_height_cm(&self) -> f64 {
        self.known_height_cm
    }

    /// Try to calibrate from this frame. Safe to call every frame.
    pub fn attempt(&mut self, observation: &PoseObservation) -> CalibrationOutcome {
        if self.state.is_calibrated() {
            return CalibrationOutcome::AlreadyCalibrated;
        }

        if let Some(hidden) = self.filter.first_hidden(observation) {
            return CalibrationOutcome::Rejected(FrameSkip::IncompleteVisibility(hidden));
        }
        if !self.filter.are_arms_horizontal(observation) {
            return CalibrationOutcome::Rejected(FrameSkip::ArmsNotHorizontal);
        }

        let height_in_units = match reference_height(observation) {
            Some(h) if h > 0.0 => h,
            _ => return CalibrationOutcome::Rejected(FrameSkip::ZeroReferenceHeight),
        };

        let scale = self.known_height_cm / height_in_units;
        if !(scale.is_finite() && scale > 0.0) {
            return CalibrationOutcome::Rejected(FrameSkip::ZeroReferenceHeight);
        }

        self.state.scale_cm_per_unit = Some(scale);
        tracing::info!(
            known_height_cm = self.known_height_cm,
            height_in_units,
            scale_cm_per_unit = scale,
            "calibrated"
        );
        CalibrationOutcome::Calibrated { scale_cm_per_unit: scale }
    }
}

/// Vertical extent from the nose down to the lower of the two heels
fn reference_height(observation: &PoseObservation) -> Option<f64> {
    let nose = observation.get(LandmarkId::Nose)?;
    let left_heel = observation.get(LandmarkId::LeftHeel)?;
    let right_heel = observation.get(LandmarkId::RightHeel)?;

    let foot_y = left_heel.y().min(right_heel.y());
    Some((nose.y() - foot_y).abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::tests::t_pose;
    use crate::landmarks::Landmark;

    #[test]
    fn test_scale_from_reference_pose() {
        let mut calibrator = Calibrator::new(LandmarkFilter::default(), 183.0);
        let outcome = calibrator.attempt(&t_pose(0.10, 0.90));

        let scale = match outcome {
            CalibrationOutcome::Calibrated { scale_cm_per_unit } => scale_cm_per_unit,
            other => panic!("expected calibration, got {:?}", other),
        };
        assert!((scale - 228.75).abs() < 1e-9);
        assert!(calibrator.state().is_calibrated());
        assert_eq!(calibrator.state().scale_cm_per_unit(), Some(scale));
    }

    #[test]
    fn test_uses_higher_heel() {
        // min() of the heel y picks the heel higher in the frame
        let obs = t_pose(0.10, 0.90).with(LandmarkId::LeftHeel, Landmark::new(0.45, 0.70, 0.85));
        let mut calibrator = Calibrator::new(LandmarkFilter::default(), 120.0);
        calibrator.attempt(&obs);
        let scale = calibrator.state().scale_cm_per_unit().unwrap();
        assert!((scale - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_calibration_is_idempotent() {
        let mut calibrator = Calibrator::new(LandmarkFilter::default(), 183.0);
        calibrator.attempt(&t_pose(0.10, 0.90));
        let first = calibrator.state().scale_cm_per_unit();

        assert_eq!(
            calibrator.attempt(&t_pose(0.20, 0.60)),
            CalibrationOutcome::AlreadyCalibrated
        );
        assert_eq!(calibrator.state().scale_cm_per_unit(), first);
    }

    #[test]
    fn test_rejects_hidden_landmark() {
        let obs = t_pose(0.10, 0.90).with(LandmarkId::RightHip, Landmark::new(0.55, 0.5, 0.3));
        let mut calibrator = Calibrator::new(LandmarkFilter::default(), 183.0);
        assert_eq!(
            calibrator.attempt(&obs),
            CalibrationOutcome::Rejected(FrameSkip::IncompleteVisibility(LandmarkId::RightHip))
        );
        assert!(!calibrator.state().is_calibrated());
    }

    #[test]
    fn test_rejects_arms_down() {
        let obs = t_pose(0.10, 0.90).with(LandmarkId::LeftElbow, Landmark::new(0.40, 0.40, 0.9));
        let mut calibrator = Calibrator::new(LandmarkFilter::default(), 183.0);
        assert_eq!(
            calibrator.attempt(&obs),
            CalibrationOutcome::Rejected(FrameSkip::ArmsNotHorizontal)
        );
    }

    #[test]
    fn test_zero_height_does_not_commit() {
        let mut calibrator = Calibrator::new(LandmarkFilter::default(), 183.0);
        assert_eq!(
            calibrator.attempt(&t_pose(0.5, 0.5)),
            CalibrationOutcome::Rejected(FrameSkip::ZeroReferenceHeight)
        );
        assert!(!calibrator.state().is_calibrated());

        // A later good frame still calibrates
        assert!(matches!(
            calibrator.attempt(&t_pose(0.10, 0.90)),
            CalibrationOutcome::Calibrated { .. }
        ));
    }
}
