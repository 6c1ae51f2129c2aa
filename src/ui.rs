// src/ui.rs - Overlay drawing for the live window
use crate::jump::JumpPhase;
use crate::landmarks::{PoseObservation, POSE_CONNECTIONS};
use crate::session::{DisplayPayload, CALIBRATION_ACCEPTED};
use egui::{Color32, Pos2, Rect, Stroke};

#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color32,
    pub secondary: Color32,
    pub surface: Color32,
    pub success: Color32,
    pub error: Color32,
    pub text_primary: Color32,
    pub text_dark: Color32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color32::from_rgb(70, 130, 240),
            secondary: Color32::from_rgb(255, 152, 0),
            surface: Color32::from_rgb(50, 50, 55),
            success: Color32::from_rgb(76, 175, 80),
            error: Color32::from_rgb(244, 67, 54),
            text_primary: Color32::WHITE,
            text_dark: Color32::BLACK,
        }
    }
}

/// Map a normalized landmark position into the video rectangle
fn to_screen(rect: Rect, x: f64, y: f64) -> Pos2 {
    Pos2::new(
        rect.left() + x as f32 * rect.width(),
        rect.top() + y as f32 * rect.height(),
    )
}

pub fn draw_skeleton(painter: &egui::Painter, rect: Rect, pose: &PoseObservation, theme: &Theme) {
    for (from, to) in POSE_CONNECTIONS {
        if let (Some(a), Some(b)) = (pose.get(from), pose.get(to)) {
            painter.line_segment(
                [to_screen(rect, a.x(), a.y()), to_screen(rect, b.x(), b.y())],
                Stroke::new(2.0, theme.primary),
            );
        }
    }

    for (id, landmark) in pose.iter() {
        let pos = to_screen(rect, landmark.x(), landmark.y());
        let color = if id.is_left() {
            theme.primary
        } else {
            theme.secondary
        };
        painter.circle_filled(pos, 4.0, color);
    }
}

/// Calibration text top left, jump state bottom left, best jumps bottom right
pub fn draw_display(painter: &egui::Painter, rect: Rect, display: &DisplayPayload, theme: &Theme) {
    let font = egui::FontId::proportional(18.0);

    if let Some(text) = display.calibration_text {
        let (pos, color) = if text == CALIBRATION_ACCEPTED {
            (Pos2::new(rect.left() + 10.0, rect.top() + 60.0), theme.success)
        } else {
            (Pos2::new(rect.left() + 10.0, rect.top() + 30.0), theme.text_dark)
        };
        painter.text(pos, egui::Align2::LEFT_CENTER, text, font.clone(), color);
    }

    if !display.calibrated {
        return;
    }

    if let Some(phase) = display.phase {
        let color = match phase {
            JumpPhase::Jumping => theme.success,
            JumpPhase::NotJumping => theme.error,
        };
        painter.text(
            Pos2::new(rect.left() + 10.0, rect.bottom() - 60.0),
            egui::Align2::LEFT_CENTER,
            phase.label(),
            font.clone(),
            color,
        );
    }

    painter.text(
        Pos2::new(rect.left() + 10.0, rect.bottom() - 30.0),
        egui::Align2::LEFT_CENTER,
        display.height_text(),
        font.clone(),
        theme.text_primary,
    );

    let lines = display.top_lines();
    let count = lines.len();
    for (i, line) in lines.into_iter().enumerate() {
        painter.text(
            Pos2::new(rect.right() - 190.0, rect.bottom() - 30.0 * (count - i) as f32),
            egui::Align2::LEFT_CENTER,
            line,
            font.clone(),
            theme.text_dark,
        );
    }
}

/// Placeholder shown while no camera frame is available
pub fn draw_no_signal(painter: &egui::Painter, rect: Rect, message: &str, theme: &Theme) {
    painter.rect_filled(rect, egui::Rounding::same(4.0), theme.surface);
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        message,
        egui::FontId::proportional(16.0),
        Color32::from_rgb(150, 150, 155),
    );
}
