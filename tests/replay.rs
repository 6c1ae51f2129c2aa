use jump_tracker::data::{JumpLog, SessionExporter};
use jump_tracker::source::LandmarkReader;
use jump_tracker::{Config, Session};
use std::fmt::Write as _;
use std::fs;
use std::io::BufReader;
use std::time::{Duration, Instant};

const NOSE: usize = 0;
const SHOULDERS: [usize; 2] = [11, 12];
const ELBOWS: [usize; 2] = [13, 14];
const HIPS: [usize; 2] = [23, 24];
const HEELS: [usize; 2] = [29, 30];

fn frame_line(elbow_y: f64, hip_y: f64) -> String {
    let mut rows = vec![[0.5, 0.5, 0.0, 0.9]; 33];
    rows[NOSE][1] = 0.10;
    for i in SHOULDERS {
        rows[i][1] = 0.25;
    }
    for i in ELBOWS {
        rows[i][1] = elbow_y;
    }
    for i in HIPS {
        rows[i][1] = hip_y;
    }
    for i in HEELS {
        rows[i][1] = 0.90;
    }
    serde_json::json!({ "landmarks": rows }).to_string()
}

fn recording() -> String {
    let mut out = String::new();
    // T-pose, then two jumps with a dropped frame in between
    writeln!(out, "{}", frame_line(0.25, 0.5)).unwrap();
    for hip_y in [0.5, 0.5, 0.40, 0.35, 0.50] {
        writeln!(out, "{}", frame_line(0.40, hip_y)).unwrap();
    }
    writeln!(out, "{{\"landmarks\": null}}").unwrap();
    writeln!(out).unwrap();
    for hip_y in [0.42, 0.25, 0.30, 0.49, 0.5] {
        writeln!(out, "{}", frame_line(0.40, hip_y)).unwrap();
    }
    out
}

#[test]
fn replay_records_and_logs_jumps() {
    let dir = tempfile::tempdir().unwrap();
    let log = JumpLog::new(dir.path().join("logs/jump_heights.txt"));
    let mut exporter = SessionExporter::new(dir.path(), Some("replay".to_string()));
    let mut session = Session::new(&Config::default());

    let start = Instant::now();
    let mut now = start;
    let mut jumps = Vec::new();
    for frame in LandmarkReader::new(BufReader::new(recording().as_bytes())) {
        let observation = frame.unwrap();
        let outcome = session.process_frame(observation.as_ref(), now);
        if let Some(record) = outcome.jump {
            log.append(&record).unwrap();
            jumps.push(record.height_cm);
        }
        exporter.add_frame(&outcome);
        now += Duration::from_millis(33);
    }

    assert_eq!(jumps, vec![34.3, 57.2]);
    assert_eq!(session.frame_count(), 12);
    assert_eq!(fs::read_to_string(log.path()).unwrap(), "34.3\n57.2\n");

    let display = session.display(now + Duration::from_secs(3));
    assert!(display.calibrated);
    assert_eq!(display.calibration_text, None);
    assert_eq!(display.top_lines(), vec!["Top 1: 57.2cm", "Top 2: 34.3cm"]);

    let out = exporter.export_csv().unwrap();
    let jumps_csv = fs::read_to_string(out.join("jumps.csv")).unwrap();
    assert_eq!(jumps_csv.lines().count(), 3);
    let frames_csv = fs::read_to_string(out.join("frames.csv")).unwrap();
    assert_eq!(frames_csv.lines().count(), 13);
}

#[test]
fn replay_without_tpose_never_measures() {
    let mut session = Session::new(&Config::default());
    let now = Instant::now();

    for hip_y in [0.5, 0.3, 0.5] {
        let line = frame_line(0.40, hip_y);
        let observation = jump_tracker::source::parse_frame_line(&line, 1).unwrap();
        let outcome = session.process_frame(observation.as_ref(), now);
        assert!(outcome.jump.is_none());
    }

    assert!(!session.calibration().is_calibrated());
    assert!(session.history().is_empty());
}

#[test]
fn malformed_line_reports_line_number() {
    let input = format!("{}\nnot json\n", frame_line(0.25, 0.5));
    let results: Vec<_> = LandmarkReader::new(BufReader::new(input.as_bytes())).collect();

    assert!(results[0].is_ok());
    let err = results[1].as_ref().unwrap_err();
    assert!(matches!(err, jump_tracker::JumpError::MalformedFrame { line: 2, .. }));
}
