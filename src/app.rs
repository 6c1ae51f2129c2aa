// src/app.rs
use crate::config::Config;
use crate::data::{JumpLog, SessionExporter};
use crate::landmarks::PoseObservation;
use crate::mediapipe_bridge::MediaPipeBridge;
use crate::session::Session;
use crate::ui::{draw_display, draw_no_signal, draw_skeleton, Theme};
use crate::video::{self, CameraSource};

use eframe::egui;
use image::DynamicImage;
use std::time::Instant;
use tracing::{error, info, warn};

pub struct JumpTrackerApp {
    // Core components
    camera: Option<CameraSource>,
    bridge: Option<MediaPipeBridge>,
    session: Session,
    jump_log: Option<JumpLog>,
    exporter: SessionExporter,

    // UI State
    theme: Theme,
    show_pose: bool,
    texture: Option<egui::TextureHandle>,
    frame_size: egui::Vec2,
    last_pose: Option<PoseObservation>,
    status: Option<String>,
}

impl JumpTrackerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        let mut status = None;

        let camera = match CameraSource::open(&config.camera) {
            Ok(camera) => Some(camera),
            Err(e) => {
                error!(error = %e, "camera unavailable");
                status = Some(format!("Camera unavailable: {}", e));
                None
            }
        };

        let bridge = match MediaPipeBridge::spawn(&config.bridge) {
            Ok(bridge) => Some(bridge),
            Err(e) => {
                error!(error = %e, "pose estimator unavailable");
                status.get_or_insert_with(|| format!("Pose estimator unavailable: {}", e));
                None
            }
        };

        Self {
            camera,
            bridge,
            session: Session::new(&config),
            jump_log: config
                .session
                .save_heights
                .then(|| JumpLog::new(&config.session.jump_log_path)),
            exporter: SessionExporter::new(&config.export.output_dir, None),
            theme: Theme::default(),
            show_pose: config.session.show_pose,
            texture: None,
            frame_size: egui::Vec2::ZERO,
            last_pose: None,
            status,
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        let (toggle_pose, quit) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::P),
                i.key_pressed(egui::Key::Q) || i.key_pressed(egui::Key::Escape),
            )
        });

        if toggle_pose {
            self.show_pose = !self.show_pose;
        }
        if quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    /// Capture, estimate, and feed one frame into the session.
    /// Losing the camera or the estimator stops the loop.
    fn step(&mut self, ctx: &egui::Context) {
        let (Some(camera), Some(bridge)) = (self.camera.as_mut(), self.bridge.as_mut()) else {
            return;
        };

        let frame = match camera.read_frame() {
            Ok(frame) => frame,
            Err(e) => {
                error!(error = %e, "frame capture failed");
                self.status = Some(format!("Frame capture failed: {}", e));
                self.camera = None;
                return;
            }
        };

        let pose = match video::encode_jpeg(&frame).map_err(|e| e.to_string()).and_then(|bytes| {
            bridge.process(&bytes).map_err(|e| e.to_string())
        }) {
            Ok(pose) => pose,
            Err(e) => {
                error!(error = %e, "pose estimation failed");
                self.status = Some(format!("Pose estimation failed: {}", e));
                self.bridge = None;
                return;
            }
        };

        let outcome = self.session.process_frame(pose.as_ref(), Instant::now());
        if let (Some(record), Some(log)) = (outcome.jump, self.jump_log.as_ref()) {
            if let Err(e) = log.append(&record) {
                warn!(path = %log.path().display(), error = %e, "failed to save jump height");
            }
        }
        self.exporter.add_frame(&outcome);

        self.last_pose = pose;
        self.upload_frame(ctx, &frame);
    }

    fn upload_frame(&mut self, ctx: &egui::Context, frame: &DynamicImage) {
        let rgba = frame.to_rgba8();
        let size = [rgba.width() as usize, rgba.height() as usize];
        let image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());

        match self.texture.as_mut() {
            Some(texture) => texture.set(image, Default::default()),
            None => self.texture = Some(ctx.load_texture("camera", image, Default::default())),
        }
        self.frame_size = egui::vec2(size[0] as f32, size[1] as f32);
    }

    fn export_session(&mut self) {
        match self.exporter.export_csv() {
            Ok(dir) => {
                info!(dir = %dir.display(), "session exported");
                self.status = Some(format!("Exported to {}", dir.display()));
            }
            Err(e) => {
                error!(error = %e, "export failed");
                self.status = Some(format!("Export failed: {}", e));
            }
        }
    }

    fn render_control_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.checkbox(&mut self.show_pose, "Pose overlay (P)");

                ui.separator();

                if ui.button("Export CSV").clicked() {
                    self.export_session();
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("Jumps: {}", self.session.history().len()));
                    if let Some(status) = &self.status {
                        ui.label(egui::RichText::new(status).color(self.theme.error));
                    }
                });
            });
            ui.add_space(6.0);
        });
    }

    fn render_video_panel(&mut self, ctx: &egui::Context) {
        let display = self.session.display(Instant::now());

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let (response, painter) = ui.allocate_painter(available, egui::Sense::hover());
            let rect = match self.texture.as_ref() {
                Some(texture) if self.frame_size.x > 0.0 => {
                    let scale = (available.x / self.frame_size.x).min(available.y / self.frame_size.y);
                    let rect = egui::Rect::from_center_size(response.rect.center(), self.frame_size * scale);
                    painter.image(
                        texture.id(),
                        rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                    rect
                }
                _ => {
                    draw_no_signal(&painter, response.rect, "No camera frame", &self.theme);
                    return;
                }
            };

            if self.show_pose {
                if let Some(pose) = &self.last_pose {
                    draw_skeleton(&painter, rect, pose, &self.theme);
                }
            }
            draw_display(&painter, rect, &display, &self.theme);
        });
    }
}

impl eframe::App for JumpTrackerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);
        self.step(ctx);

        self.render_control_panel(ctx);
        self.render_video_panel(ctx);

        if self.camera.is_some() && self.bridge.is_some() {
            ctx.request_repaint();
        }
    }
}

impl Drop for JumpTrackerApp {
    fn drop(&mut self) {
        info!(
            frames = self.session.frame_count(),
            jumps = self.session.history().len(),
            "session finished"
        );
    }
}
