// src/filter.rs - Gates pose observations before calibration and detection
use crate::config::Thresholds;
use crate::landmarks::{LandmarkId, PoseObservation};

/// Landmarks that must all be visible for a frame to count as full body
pub const REQUIRED_LANDMARKS: [LandmarkId; 9] = [
    LandmarkId::Nose,
    LandmarkId::LeftHeel,
    LandmarkId::RightHeel,
    LandmarkId::LeftHip,
    LandmarkId::RightHip,
    LandmarkId::LeftShoulder,
    LandmarkId::RightShoulder,
    LandmarkId::LeftElbow,
    LandmarkId::RightElbow,
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandmarkFilter {
    visibility_threshold: f64,
    arm_tolerance: f64,
}

impl LandmarkFilter {
    pub fn new(visibility_threshold: f64, arm_tolerance: f64) -> Self {
        Self {
            visibility_threshold,
            arm_tolerance,
        }
    }

    pub fn from_thresholds(thresholds: &Thresholds) -> Self {
        Self::new(thresholds.visibility, thresholds.arm_tolerance)
    }

    /// First required landmark that is missing or not visible enough
    pub fn first_hidden(&self, observation: &PoseObservation) -> Option<LandmarkId> {
        REQUIRED_LANDMARKS.iter().copied().find(|id| {
            !observation
                .get(*id)
                .map(|lm| lm.is_visible(self.visibility_threshold))
                .unwrap_or(false)
        })
    }

    pub fn is_full_body_visible(&self, observation: &PoseObservation) -> bool {
        self.first_hidden(observation).is_none()
    }

    /// Both upper arms held level with the shoulders (T-pose)
    pub fn are_arms_horizontal(&self, observation: &PoseObservation) -> bool {
        let level = |shoulder: LandmarkId, elbow: LandmarkId| match (
            observation.get(shoulder),
            observation.get(elbow),
        ) {
            (Some(s), Some(e)) => (s.y() - e.y()).abs() < self.arm_tolerance,
            _ => false,
        };

        level(LandmarkId::LeftShoulder, LandmarkId::LeftElbow)
            && level(LandmarkId::RightShoulder, LandmarkId::RightElbow)
    }
}

impl Default for LandmarkFilter {
    fn default() -> Self {
        Self::from_thresholds(&Thresholds::default())
    }
}
