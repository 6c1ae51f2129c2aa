// src/mediapipe_bridge.rs - Talks to an external MediaPipe pose process
//
// Per frame: write a little-endian u32 byte count followed by the encoded
// image to the child's stdin, then read back one JSON frame line
// (see `source::parse_frame_line`).
use crate::config::BridgeConfig;
use crate::error::{JumpError, Result};
use crate::landmarks::PoseObservation;
use crate::source::parse_frame_line;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

pub struct MediaPipeBridge {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    frames_sent: usize,
    line: String,
}

impl MediaPipeBridge {
    pub fn spawn(config: &BridgeConfig) -> Result<Self> {
        tracing::info!(command = %config.command, args = ?config.args, "starting pose estimator");

        let mut child = Command::new(&config.command)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| JumpError::Bridge(format!("failed to start {}: {}", config.command, e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| JumpError::Bridge("estimator stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| JumpError::Bridge("estimator stdout unavailable".to_string()))?;

        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            frames_sent: 0,
            line: String::new(),
        })
    }

    /// Blocking round trip for one encoded frame
    pub fn process(&mut self, frame_data: &[u8]) -> Result<Option<PoseObservation>> {
        let len = u32::try_from(frame_data.len())
            .map_err(|_| JumpError::Bridge(format!("frame too large: {} bytes", frame_data.len())))?;

        self.stdin.write_all(&len.to_le_bytes())?;
        self.stdin.write_all(frame_data)?;
        self.stdin.flush()?;
        self.frames_sent += 1;

        self.line.clear();
        if self.stdout.read_line(&mut self.line)? == 0 {
            return Err(JumpError::Bridge("pose estimator exited".to_string()));
        }
        parse_frame_line(self.line.trim(), self.frames_sent)
    }
}

impl Drop for MediaPipeBridge {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
