// src/jump.rs - Hip-height state machine for jump detection
use crate::config::Thresholds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JumpPhase {
    #[default]
    NotJumping,
    Jumping,
}

impl JumpPhase {
    pub fn label(&self) -> &'static str {
        match self {
            JumpPhase::NotJumping => "Not Jumping",
            JumpPhase::Jumping => "Jumping",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JumpState {
    pub phase: JumpPhase,
    /// Resting hip height, captured once and never re-estimated
    pub baseline_y: Option<f64>,
    /// Largest rise above the baseline in the current jump (normalized units)
    pub peak_displacement: f64,
}

/// A jump that just landed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpEvent {
    pub height_cm: f64,
    pub peak_displacement: f64,
}

/// Round to one decimal place, the precision heights are recorded and shown at.
///
/// Rounds the exact binary value, so 12.35 (stored just below) gives 12.3
/// and exact halves go to even.
pub fn round_cm(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

/// Convert a displacement to centimetres; 0 without a scale
pub fn displacement_to_cm(displacement: f64, scale_cm_per_unit: Option<f64>) -> f64 {
    match scale_cm_per_unit {
        Some(scale) => round_cm(displacement * scale),
        None => 0.0,
    }
}

pub struct JumpTracker {
    takeoff_threshold: f64,
    landing_tolerance: f64,
    state: JumpState,
}

impl JumpTracker {
    pub fn new(takeoff_threshold: f64, landing_tolerance: f64) -> Self {
        Self {
            takeoff_threshold,
            landing_tolerance,
            state: JumpState::default(),
        }
    }

    pub fn from_thresholds(thresholds: &Thresholds) -> Self {
        Self::new(thresholds.takeoff, thresholds.landing)
    }

    pub fn state(&self) -> &JumpState {
        &self.state
    }

    pub fn phase(&self) -> JumpPhase {
        self.state.phase
    }

    /// Height of the jump in progress, 0 between jumps
    pub fn current_height_cm(&self, scale_cm_per_unit: Option<f64>) -> f64 {
        displacement_to_cm(self.state.peak_displacement, scale_cm_per_unit)
    }

    /// Feed one frame's mean hip y. Returns the jump that landed on this frame.
    pub fn update(&mut self, avg_hip_y: f64, scale_cm_per_unit: Option<f64>) -> Option<JumpEvent> {
        let baseline = *self.state.baseline_y.get_or_insert_with(|| {
            tracing::debug!(baseline_y = avg_hip_y, "hip baseline captured");
            avg_hip_y
        });

        // Smaller y is higher in the frame
        if self.state.phase == JumpPhase::NotJumping && avg_hip_y < baseline - self.takeoff_threshold {
            self.state.phase = JumpPhase::Jumping;
            tracing::debug!(avg_hip_y, baseline_y = baseline, "takeoff");
        }

        if self.state.phase != JumpPhase::Jumping {
            return None;
        }

        let displacement = baseline - avg_hip_y;
        self.state.peak_displacement = self.state.peak_displacement.max(displacement);

        if (avg_hip_y - baseline).abs() >= self.landing_tolerance {
            return None;
        }

        if scale_cm_per_unit.is_none() {
            tracing::warn!("jump landed before calibration, recording 0 cm");
        }
        let event = JumpEvent {
            height_cm: displacement_to_cm(self.state.peak_displacement, scale_cm_per_unit),
            peak_displacement: self.state.peak_displacement,
        };
        self.state.phase = JumpPhase::NotJumping;
        self.state.peak_displacement = 0.0;
        Some(event)
    }
}

impl Default for JumpTracker {
    fn default() -> Self {
        Self::from_thresholds(&Thresholds::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCALE: Option<f64> = Some(228.75);

    #[test]
    fn test_round_cm() {
        assert_eq!(round_cm(34.3125), 34.3);
        assert_eq!(round_cm(40.06), 40.1);
        assert_eq!(round_cm(0.0), 0.0);
    }

    #[test]
    fn test_round_cm_uses_exact_value() {
        assert_eq!(round_cm(12.35), 12.3);
        assert_eq!(round_cm(0.25), 0.2);
        assert_eq!(round_cm(0.35), 0.3);
        assert_eq!(round_cm(2.675), 2.7);
        assert_eq!(displacement_to_cm(0.15, Some(228.75)), 34.3);
    }

    #[test]
    fn test_jump_roundtrip() {
        let mut tracker = JumpTracker::default();
        let samples = [0.50, 0.40, 0.35, 0.40, 0.49];
        let mut phases = Vec::new();
        let mut landed = Vec::new();

        for (i, y) in samples.iter().enumerate() {
            if let Some(event) = tracker.update(*y, SCALE) {
                landed.push((i, event));
            }
            phases.push(tracker.phase());
            if i == 2 {
                assert!((tracker.state().peak_displacement - 0.15).abs() < 1e-9);
            }
        }

        assert_eq!(tracker.state().baseline_y, Some(0.50));
        assert_eq!(
            phases,
            vec![
                JumpPhase::NotJumping,
                JumpPhase::Jumping,
                JumpPhase::Jumping,
                JumpPhase::Jumping,
                JumpPhase::NotJumping,
            ]
        );
        assert_eq!(landed.len(), 1);
        assert_eq!(landed[0].0, 4);
        assert_eq!(landed[0].1.height_cm, 34.3);
    }

    #[test]
    fn test_current_height_resets_after_landing() {
        let mut tracker = JumpTracker::default();
        for y in [0.50, 0.40, 0.35] {
            tracker.update(y, SCALE);
        }
        assert_eq!(tracker.current_height_cm(SCALE), 34.3);

        assert!(tracker.update(0.50, SCALE).is_some());
        assert_eq!(tracker.current_height_cm(SCALE), 0.0);
        assert_eq!(tracker.state().peak_displacement, 0.0);
    }

    #[test]
    fn test_small_dip_is_not_a_jump() {
        let mut tracker = JumpTracker::default();
        for y in [0.50, 0.47, 0.46, 0.52, 0.50] {
            assert!(tracker.update(y, SCALE).is_none());
            assert_eq!(tracker.phase(), JumpPhase::NotJumping);
        }
        assert_eq!(tracker.current_height_cm(SCALE), 0.0);
    }

    #[test]
    fn test_peak_is_monotonic_within_jump() {
        let mut tracker = JumpTracker::default();
        let mut last_peak = 0.0;
        for y in [0.50, 0.42, 0.30, 0.38, 0.44] {
            tracker.update(y, SCALE);
            let peak = tracker.state().peak_displacement;
            assert!(peak >= last_peak);
            assert!(peak >= 0.0);
            last_peak = peak;
        }
        assert_eq!(tracker.phase(), JumpPhase::Jumping);
    }

    #[test]
    fn test_baseline_never_resets() {
        let mut tracker = JumpTracker::default();
        for y in [0.50, 0.40, 0.49, 0.60, 0.58] {
            tracker.update(y, SCALE);
        }
        assert_eq!(tracker.state().baseline_y, Some(0.50));
    }

    #[test]
    fn test_no_height_without_scale() {
        let mut tracker = JumpTracker::default();
        let mut events = Vec::new();
        for y in [0.50, 0.30, 0.50] {
            events.extend(tracker.update(y, None));
        }
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].height_cm, 0.0);
        assert_eq!(tracker.current_height_cm(None), 0.0);
    }

    #[test]
    fn test_consecutive_jumps() {
        let mut tracker = JumpTracker::default();
        let mut heights = Vec::new();
        for y in [0.50, 0.40, 0.50, 0.47, 0.30, 0.20, 0.48] {
            if let Some(event) = tracker.update(y, SCALE) {
                heights.push(event.height_cm);
            }
        }
        assert_eq!(heights, vec![22.9, 68.6]);
    }
}
