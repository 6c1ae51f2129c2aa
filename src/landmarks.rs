// src/landmarks.rs - Per-frame pose observation keyed by MediaPipe landmark
use nalgebra::Vector2;
use std::collections::HashMap;

/// MediaPipe Pose landmark indices (33 total)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum LandmarkId {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl LandmarkId {
    pub const COUNT: usize = 33;

    pub const ALL: [LandmarkId; Self::COUNT] = [
        Self::Nose,
        Self::LeftEyeInner,
        Self::LeftEye,
        Self::LeftEyeOuter,
        Self::RightEyeInner,
        Self::RightEye,
        Self::RightEyeOuter,
        Self::LeftEar,
        Self::RightEar,
        Self::MouthLeft,
        Self::MouthRight,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftPinky,
        Self::RightPinky,
        Self::LeftIndex,
        Self::RightIndex,
        Self::LeftThumb,
        Self::RightThumb,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
        Self::LeftHeel,
        Self::RightHeel,
        Self::LeftFootIndex,
        Self::RightFootIndex,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Landmarks on the subject's left side
    pub fn is_left(self) -> bool {
        matches!(
            self,
            Self::LeftEyeInner
                | Self::LeftEye
                | Self::LeftEyeOuter
                | Self::LeftEar
                | Self::MouthLeft
                | Self::LeftShoulder
                | Self::LeftElbow
                | Self::LeftWrist
                | Self::LeftPinky
                | Self::LeftIndex
                | Self::LeftThumb
                | Self::LeftHip
                | Self::LeftKnee
                | Self::LeftAnkle
                | Self::LeftHeel
                | Self::LeftFootIndex
        )
    }
}

/// Body connections drawn for the skeleton overlay
pub const POSE_CONNECTIONS: [(LandmarkId, LandmarkId); 16] = [
    (LandmarkId::LeftShoulder, LandmarkId::RightShoulder),
    (LandmarkId::LeftShoulder, LandmarkId::LeftElbow),
    (LandmarkId::LeftElbow, LandmarkId::LeftWrist),
    (LandmarkId::RightShoulder, LandmarkId::RightElbow),
    (LandmarkId::RightElbow, LandmarkId::RightWrist),
    (LandmarkId::LeftShoulder, LandmarkId::LeftHip),
    (LandmarkId::RightShoulder, LandmarkId::RightHip),
    (LandmarkId::LeftHip, LandmarkId::RightHip),
    (LandmarkId::LeftHip, LandmarkId::LeftKnee),
    (LandmarkId::LeftKnee, LandmarkId::LeftAnkle),
    (LandmarkId::LeftAnkle, LandmarkId::LeftHeel),
    (LandmarkId::LeftHeel, LandmarkId::LeftFootIndex),
    (LandmarkId::RightHip, LandmarkId::RightKnee),
    (LandmarkId::RightKnee, LandmarkId::RightAnkle),
    (LandmarkId::RightAnkle, LandmarkId::RightHeel),
    (LandmarkId::RightHeel, LandmarkId::RightFootIndex),
];

/// One detected body point in normalized image coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    /// x grows to the right, y grows downwards, both 0-1
    pub position: Vector2<f64>,
    /// Detector confidence that the point is visible (0-1)
    pub visibility: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, visibility: f64) -> Self {
        Self {
            position: Vector2::new(x, y),
            visibility,
        }
    }

    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }

    pub fn is_visible(&self, threshold: f64) -> bool {
        self.visibility > threshold
    }
}

/// Immutable snapshot of the pose detected in one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoseObservation {
    landmarks: HashMap<LandmarkId, Landmark>,
}

impl PoseObservation {
    pub fn new(landmarks: HashMap<LandmarkId, Landmark>) -> Self {
        Self { landmarks }
    }

    /// Build from MediaPipe's `[x, y, z, visibility]` rows, indexed by landmark.
    /// Rows past the 33rd are ignored; a short slice yields a partial observation.
    pub fn from_mediapipe(rows: &[[f64; 4]]) -> Self {
        let landmarks = rows
            .iter()
            .enumerate()
            .filter_map(|(i, row)| {
                LandmarkId::from_index(i).map(|id| (id, Landmark::new(row[0], row[1], row[3])))
            })
            .collect();
        Self { landmarks }
    }

    pub fn with(mut self, id: LandmarkId, landmark: Landmark) -> Self {
        self.landmarks.insert(id, landmark);
        self
    }

    pub fn get(&self, id: LandmarkId) -> Option<&Landmark> {
        self.landmarks.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LandmarkId, &Landmark)> {
        self.landmarks.iter()
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Mean vertical position of both hips, `None` if either is missing
    pub fn avg_hip_y(&self) -> Option<f64> {
        let left = self.get(LandmarkId::LeftHip)?;
        let right = self.get(LandmarkId::RightHip)?;
        Some((left.y() + right.y()) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_id_roundtrip() {
        assert_eq!(LandmarkId::from_index(0), Some(LandmarkId::Nose));
        assert_eq!(LandmarkId::from_index(23), Some(LandmarkId::LeftHip));
        assert_eq!(LandmarkId::from_index(30), Some(LandmarkId::RightHeel));
        assert_eq!(LandmarkId::from_index(33), None);
        for (i, id) in LandmarkId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn test_is_left() {
        assert!(LandmarkId::LeftEye.is_left());
        assert!(LandmarkId::MouthLeft.is_left());
        assert!(LandmarkId::LeftFootIndex.is_left());
        assert!(!LandmarkId::Nose.is_left());
        assert!(!LandmarkId::RightHip.is_left());
        assert_eq!(LandmarkId::ALL.iter().filter(|id| id.is_left()).count(), 16);
    }

    #[test]
    fn test_visibility_is_strict() {
        let lm = Landmark::new(0.5, 0.5, 0.5);
        assert!(!lm.is_visible(0.5));
        assert!(lm.is_visible(0.49));
    }

    #[test]
    fn test_from_mediapipe() {
        let mut rows = vec![[0.0, 0.0, 0.0, 0.0]; LandmarkId::COUNT];
        rows[LandmarkId::Nose.index()] = [0.5, 0.1, -0.2, 0.99];
        rows[LandmarkId::RightHeel.index()] = [0.45, 0.9, 0.1, 0.8];

        let obs = PoseObservation::from_mediapipe(&rows);
        assert_eq!(obs.len(), LandmarkId::COUNT);

        let nose = obs.get(LandmarkId::Nose).unwrap();
        assert_eq!(nose.y(), 0.1);
        assert_eq!(nose.visibility, 0.99);
        assert_eq!(obs.get(LandmarkId::RightHeel).unwrap().x(), 0.45);
    }

    #[test]
    fn test_from_mediapipe_partial() {
        let rows = vec![[0.5, 0.5, 0.0, 1.0]; 12];
        let obs = PoseObservation::from_mediapipe(&rows);
        assert_eq!(obs.len(), 12);
        assert!(obs.get(LandmarkId::LeftShoulder).is_some());
        assert!(obs.get(LandmarkId::RightShoulder).is_none());
    }

    #[test]
    fn test_avg_hip_y() {
        let obs = PoseObservation::default()
            .with(LandmarkId::LeftHip, Landmark::new(0.4, 0.52, 0.9))
            .with(LandmarkId::RightHip, Landmark::new(0.6, 0.48, 0.9));
        assert!((obs.avg_hip_y().unwrap() - 0.5).abs() < 1e-12);

        let one_hip = PoseObservation::default().with(LandmarkId::LeftHip, Landmark::new(0.4, 0.5, 0.9));
        assert_eq!(one_hip.avg_hip_y(), None);
    }
}
