// src/data.rs - Jump height log and per-session CSV export
use crate::error::Result;
use crate::history::JumpRecord;
use crate::session::FrameOutcome;
use chrono::Local;
use csv::Writer;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Plain-text log with one height per line, appended as jumps land
pub struct JumpLog {
    path: PathBuf,
}

impl JumpLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &JumpRecord) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{:.1}", record.height_cm)?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct FrameRecord {
    frame: u64,
    calibrated: bool,
    avg_hip_y: Option<f64>,
    phase: &'static str,
    current_height_cm: f64,
    skip: Option<String>,
}

#[derive(Debug, Serialize)]
struct JumpRow {
    jump: usize,
    frame: u64,
    height_cm: f64,
}

pub struct SessionExporter {
    output_dir: PathBuf,
    session_name: String,
    frames: Vec<FrameRecord>,
    jumps: Vec<JumpRow>,
}

impl SessionExporter {
    pub fn new(output_dir: impl AsRef<Path>, session_name: Option<String>) -> Self {
        let session_name = session_name.unwrap_or_else(|| {
            format!("session_{}", Local::now().format("%Y%m%d_%H%M%S"))
        });

        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            session_name,
            frames: Vec::new(),
            jumps: Vec::new(),
        }
    }

    pub fn session_dir(&self) -> PathBuf {
        self.output_dir.join(&self.session_name)
    }

    pub fn add_frame(&mut self, outcome: &FrameOutcome) {
        self.frames.push(FrameRecord {
            frame: outcome.frame,
            calibrated: outcome.calibrated,
            avg_hip_y: outcome.avg_hip_y,
            phase: outcome.phase.label(),
            current_height_cm: outcome.current_height_cm,
            skip: outcome.skip.map(|s| s.to_string()),
        });

        if let Some(jump) = outcome.jump {
            self.jumps.push(JumpRow {
                jump: self.jumps.len() + 1,
                frame: outcome.frame,
                height_cm: jump.height_cm,
            });
        }
    }

    /// Write `frames.csv` and `jumps.csv`, returning the session directory
    pub fn export_csv(&self) -> Result<PathBuf> {
        let dir = self.session_dir();
        std::fs::create_dir_all(&dir)?;

        let mut writer = Writer::from_writer(File::create(dir.join("frames.csv"))?);
        for record in &self.frames {
            writer.serialize(record)?;
        }
        writer.flush()?;

        let mut writer = Writer::from_writer(File::create(dir.join("jumps.csv"))?);
        for row in &self.jumps {
            writer.serialize(row)?;
        }
        writer.flush()?;

        Ok(dir)
    }
}
