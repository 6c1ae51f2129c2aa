// src/source.rs - Newline-delimited JSON landmark frames
use crate::error::{JumpError, Result};
use crate::landmarks::PoseObservation;
use serde::Deserialize;
use std::io::BufRead;

/// One frame as written by the pose estimator:
/// `{"landmarks": [[x, y, z, visibility], ...]}`, or `null` landmarks when no pose was found
#[derive(Debug, Deserialize)]
struct FrameLine {
    #[serde(default)]
    landmarks: Option<Vec<[f64; 4]>>,
}

/// Parse a single frame line. `line_no` is only used for error messages.
pub fn parse_frame_line(line: &str, line_no: usize) -> Result<Option<PoseObservation>> {
    let frame: FrameLine = serde_json::from_str(line).map_err(|e| JumpError::MalformedFrame {
        line: line_no,
        reason: e.to_string(),
    })?;

    let Some(rows) = frame.landmarks else {
        return Ok(None);
    };
    if rows.is_empty() {
        return Ok(None);
    }
    if let Some(i) = rows.iter().position(|row| row.iter().any(|v| !v.is_finite())) {
        return Err(JumpError::MalformedFrame {
            line: line_no,
            reason: format!("landmark {} has a non-finite value", i),
        });
    }

    Ok(Some(PoseObservation::from_mediapipe(&rows)))
}

/// Reads one frame per line; blank lines are skipped
pub struct LandmarkReader<R> {
    reader: R,
    line_no: usize,
    buf: String,
}

impl<R: BufRead> LandmarkReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> Iterator for LandmarkReader<R> {
    type Item = Result<Option<PoseObservation>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_no += 1;
                    let line = self.buf.trim();
                    if line.is_empty() {
                        continue;
                    }
                    return Some(parse_frame_line(line, self.line_no));
                }
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}
