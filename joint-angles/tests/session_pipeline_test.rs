//! Session Pipeline Integration Tests
//!
//! Drives complete sessions through the public API:
//! - Synthetic squat trajectories checked against hand-computed angles
//! - JSON Lines sources, detection gaps and malformed frames
//! - Recording, persistence and report rebuilding from angle logs

use joint_angles::export::angle_log;
use joint_angles::export::series_csv;
use joint_angles::export::AngleLog;
use joint_angles::pose::{JsonLinesSource, VecSource};
use joint_angles::workflow::{
    AnalysisSession, CompletedRecording, SessionConfig, SessionReport, SessionReportBuilder,
};
use joint_angles::{Detection, Error, JointName, Landmark, LandmarkFrame, PoseSample};
use serde_json::json;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

const TOLERANCE: f64 = 1e-6;

// ============================================================================
// Helper Functions
// ============================================================================

/// Both legs with the thigh raised `flexion_deg` from vertical and the shank
/// hanging straight down. Knee and hip angles are then `180 - flexion_deg`,
/// ankles stay at 90.
fn squat_frame(flexion_deg: f64) -> LandmarkFrame {
    let (sin, cos) = flexion_deg.to_radians().sin_cos();
    let mut frame = LandmarkFrame::new();

    for (x0, hip, knee, ankle, foot) in [
        (
            0.4,
            Landmark::LeftHip,
            Landmark::LeftKnee,
            Landmark::LeftAnkle,
            Landmark::LeftFootIndex,
        ),
        (
            0.6,
            Landmark::RightHip,
            Landmark::RightKnee,
            Landmark::RightAnkle,
            Landmark::RightFootIndex,
        ),
    ] {
        let (kx, ky) = (x0, 0.6);
        frame = frame
            .with(knee, kx, ky)
            .with(hip, kx + 0.25 * sin, ky - 0.25 * cos)
            .with(ankle, kx, ky + 0.3)
            .with(foot, kx + 0.1, ky + 0.3);
    }
    frame
}

fn squat_samples(count: usize, spacing: f64, step_deg: f64) -> Vec<PoseSample> {
    (0..count)
        .map(|k| {
            PoseSample::new(
                k as f64 * spacing,
                Detection::Detected(squat_frame(k as f64 * step_deg)),
            )
        })
        .collect()
}

/// Serialize samples to the JSON Lines landmark format
fn write_jsonl(path: &Path, samples: &[PoseSample]) {
    let mut file = std::fs::File::create(path).unwrap();
    for sample in samples {
        let landmarks = sample.detection.frame().map(|frame| {
            Landmark::ALL
                .into_iter()
                .filter_map(|landmark| {
                    frame
                        .get(landmark)
                        .map(|p| (landmark.name().to_string(), json!([p.x, p.y])))
                })
                .collect::<serde_json::Map<_, _>>()
        });
        let line = json!({ "t": sample.timestamp, "landmarks": landmarks });
        writeln!(file, "{}", line).unwrap();
    }
}

fn assert_series_close(actual: &[(f64, f64)], expected: &[(f64, f64)]) {
    assert_eq!(actual.len(), expected.len(), "series length");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a.0 - e.0).abs() < TOLERANCE && (a.1 - e.1).abs() < TOLERANCE,
            "point {i}: got {a:?}, expected {e:?}"
        );
    }
}

fn record_all(session: &mut AnalysisSession, samples: Vec<PoseSample>) -> SessionReport {
    session.start_recording(samples.first().map_or(0.0, |s| s.timestamp));
    session.run(&mut VecSource::new(samples)).unwrap();
    session.stop_recording()
}

// ============================================================================
// Trajectory Tests
// ============================================================================

#[test]
fn test_synthetic_squat_matches_hand_computed_trajectory() {
    let mut session = AnalysisSession::default();
    let report = record_all(&mut session, squat_samples(10, 0.2, 10.0));

    let expected_flexed: Vec<(f64, f64)> = (0..10)
        .map(|k| (k as f64 * 0.2, 180.0 - 10.0 * k as f64))
        .collect();
    let expected_ankle: Vec<(f64, f64)> = (0..10).map(|k| (k as f64 * 0.2, 90.0)).collect();

    for joint in [JointName::KneeL, JointName::KneeR, JointName::HipL, JointName::HipR] {
        assert_series_close(report.series(joint), &expected_flexed);
    }
    for joint in [JointName::AnkleL, JointName::AnkleR] {
        assert_series_close(report.series(joint), &expected_ankle);
    }

    let knee = report.summary(JointName::KneeL).unwrap();
    assert!((knee.range_of_motion - 90.0).abs() < TOLERANCE);
    assert!((knee.min - 90.0).abs() < TOLERANCE);
}

#[test]
fn test_jsonl_file_reproduces_in_memory_session() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("frames.jsonl");
    let samples = squat_samples(12, 0.25, 7.5);
    write_jsonl(&path, &samples);

    let from_memory = record_all(&mut AnalysisSession::default(), samples);

    let mut session = AnalysisSession::default();
    session.start_recording(0.0);
    let stats = session.run(&mut JsonLinesSource::open(&path).unwrap()).unwrap();
    let from_file = session.stop_recording();

    assert_eq!(stats.frames, 12);
    assert_eq!(stats.recorded, 12);
    for joint in JointName::ALL {
        assert_series_close(from_file.series(joint), from_memory.series(joint));
    }
}

#[test]
fn test_throttle_thins_recording_not_live_window() {
    // 30 fps for 3 seconds
    let samples = squat_samples(90, 1.0 / 30.0, 1.0);
    let mut session = AnalysisSession::default();
    let report = record_all(&mut session, samples);

    assert_eq!(session.window().len(JointName::KneeL), 90);

    let series = report.series(JointName::KneeL);
    // At most one recorded sample per 0.1 s: every third or fourth frame
    assert!(series.len() >= 22 && series.len() <= 30, "{}", series.len());
    for pair in series.windows(2) {
        assert!(pair[1].0 - pair[0].0 >= 0.1 - 1e-12);
    }
}

#[test]
fn test_live_window_keeps_trailing_ten_seconds() {
    let samples = squat_samples(300, 0.1, 0.1);
    let mut session = AnalysisSession::default();
    session.run(&mut VecSource::new(samples)).unwrap();

    let series = session.window().query(JointName::HipL);
    assert_eq!(series[0].0, 0.0);
    assert!(series.last().unwrap().0 <= 10.0 + 1e-9);
    assert!(series.len() >= 100 && series.len() <= 101, "{}", series.len());
    assert!(!session.is_recording());
}

// ============================================================================
// Detection Edge Cases
// ============================================================================

#[test]
fn test_detection_gaps_leave_holes_in_series() {
    let mut samples = squat_samples(6, 0.2, 10.0);
    samples[2] = PoseSample::new(0.4, Detection::NotDetected);
    samples[3] = PoseSample::new(0.6, Detection::NotDetected);

    let report = record_all(&mut AnalysisSession::default(), samples);
    let elapsed: Vec<f64> = report
        .series(JointName::KneeR)
        .iter()
        .map(|(t, _)| (t * 10.0).round() / 10.0)
        .collect();
    assert_eq!(elapsed, vec![0.0, 0.2, 0.8, 1.0]);
}

#[test]
fn test_only_undetected_frames_give_empty_report() {
    let samples = (0..5)
        .map(|i| PoseSample::new(i as f64, Detection::NotDetected))
        .collect();
    let report = record_all(&mut AnalysisSession::default(), samples);

    assert!(report.is_empty());
    for (_, series) in report.iter() {
        assert!(series.is_empty());
    }
}

#[test]
fn test_malformed_frame_aborts_run_with_missing_landmark() {
    let mut frame = squat_frame(0.0);
    frame = LandmarkFrame::from_iter(
        Landmark::ALL
            .into_iter()
            .filter(|l| *l != Landmark::RightFootIndex)
            .filter_map(|l| frame.get(l).map(|p| (l, *p))),
    );

    let mut session = AnalysisSession::default();
    let err = session
        .run(&mut VecSource::new([PoseSample::new(0.0, Detection::Detected(frame))]))
        .unwrap_err();

    match err {
        Error::MissingLandmark { joint, landmark } => {
            assert_eq!(joint, JointName::AnkleR);
            assert_eq!(landmark, Landmark::RightFootIndex);
        }
        other => panic!("expected MissingLandmark, got {other:?}"),
    }
}

#[test]
fn test_custom_session_config() {
    let config = SessionConfig {
        throttle_interval_secs: 0.5,
        window_seconds: 1.0,
        ..SessionConfig::default()
    };
    let mut session = AnalysisSession::new(config);
    let report = record_all(&mut session, squat_samples(20, 0.1, 1.0));

    // Recorded at 0.0, 0.5, 1.0, 1.5
    assert_eq!(report.series(JointName::HipR).len(), 4);
    assert!(session.window().len(JointName::HipR) <= 11);
}

// ============================================================================
// Persistence Tests
// ============================================================================

#[test]
fn test_recording_roundtrip_through_disk() {
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("session").join("angles.log");

    let mut session = AnalysisSession::default();
    session.attach_log(AngleLog::open(&log_path).unwrap());
    session.start_named_recording("squat-set", 0.0);
    session
        .run(&mut VecSource::new(squat_samples(8, 0.2, 12.5)))
        .unwrap();
    let recording = session.finish_recording();
    drop(session);

    let recording_path = dir.path().join("recording.json");
    recording.save(&recording_path).unwrap();
    let loaded = CompletedRecording::load(&recording_path).unwrap();
    assert_eq!(loaded, recording);
    assert_eq!(loaded.metadata().name, "squat-set");
    assert_eq!(loaded.metadata().sample_count, 8);

    // The log holds the same samples with truncated degrees
    let from_log = SessionReportBuilder::new().build(&angle_log::load_recording(&log_path).unwrap());
    let from_recording = SessionReportBuilder::new().build(&loaded);
    for joint in JointName::ALL {
        let log_series = from_log.series(joint);
        let full_series = from_recording.series(joint);
        assert_eq!(log_series.len(), full_series.len());
        for ((t_log, d_log), (t_full, d_full)) in log_series.iter().zip(full_series) {
            assert!((t_log - t_full).abs() <= 0.011, "{joint}: {t_log} vs {t_full}");
            assert_eq!(*d_log, d_full.trunc());
        }
    }
}

#[test]
fn test_rerun_into_same_directory_replaces_log() {
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("session").join("angles.log");

    for count in [5, 3] {
        let mut session = AnalysisSession::default();
        session.attach_log(AngleLog::create(&log_path).unwrap());
        session.start_named_recording("squat", 0.0);
        session
            .run(&mut VecSource::new(squat_samples(count, 0.2, 10.0)))
            .unwrap();
        let recording = session.finish_recording();
        recording.save(&dir.path().join("session").join("recording.json")).unwrap();
    }

    let from_log = angle_log::load_recording(&log_path).unwrap();
    let saved = CompletedRecording::load(&dir.path().join("session").join("recording.json")).unwrap();
    assert_eq!(from_log.len(), 3);
    assert_eq!(saved.metadata().sample_count, from_log.len());
}

#[test]
fn test_undetected_frames_are_recorded_as_empty_snapshots() {
    let mut samples = squat_samples(4, 0.2, 10.0);
    samples[1] = PoseSample::new(0.2, Detection::NotDetected);

    let mut session = AnalysisSession::default();
    session.start_recording(0.0);
    let stats = session.run(&mut VecSource::new(samples)).unwrap();
    let recording = session.finish_recording();

    assert_eq!(stats.detected, 3);
    assert_eq!(stats.recorded, 4);
    assert!(recording.samples()[1].angles.is_empty());
    assert_eq!(
        SessionReportBuilder::new().build(&recording).series(JointName::KneeL).len(),
        3
    );
}

#[test]
fn test_report_exports_agree() {
    let dir = TempDir::new().unwrap();
    let report = record_all(&mut AnalysisSession::default(), squat_samples(5, 0.2, 15.0));

    let csv_path = dir.path().join("series.csv");
    report.write_csv(&csv_path).unwrap();
    let from_csv = series_csv::read_series(&csv_path).unwrap();
    for joint in JointName::ALL {
        assert_series_close(&from_csv[&joint], report.series(joint));
    }

    let json_path = dir.path().join("report.json");
    report.save_json(&json_path).unwrap();
    assert_eq!(SessionReport::load_json(&json_path).unwrap(), report);

    let markdown = report.to_markdown();
    for joint in JointName::ALL {
        assert!(markdown.contains(&format!("| {} | 5 |", joint)), "{markdown}");
    }
}

#[test]
fn test_stop_without_start_yields_empty_artifacts() {
    let dir = TempDir::new().unwrap();
    let mut session = AnalysisSession::default();
    session.run(&mut VecSource::new(squat_samples(3, 0.2, 5.0))).unwrap();

    let report = session.stop_recording();
    assert!(report.is_empty());
    assert_eq!(report.point_count(), 0);

    let csv_path = dir.path().join("empty.csv");
    report.write_csv(&csv_path).unwrap();
    assert!(series_csv::read_series(&csv_path).unwrap().is_empty());
}
