//! Integration tests for replaying recorded notifications.

use rustcsc::integrations::{MetricPayload, PayloadPublisher};
use rustcsc::replay::{
    convert_log_file, load_entries, replay_entries, save_entries, ReplayEntry, ReplayError,
};
use rustcsc::sensors::{CscConfig, CscEvent, SensorCore};

const WHEEL_LOG: &str = "\
I 18:02:10.000 Notification received from 00002a5b-0000-1000-8000-00805f9b34fb, value: (0x) 01-64-00-00-00-00-04
I 18:02:11.000 Notification received from 00002a5b-0000-1000-8000-00805f9b34fb, value: (0x) 01-6A-00-00-00-00-08
W 18:02:11.400 Connection parameters updated
I 18:02:12.000 Notification received from 00002a5b-0000-1000-8000-00805f9b34fb, value: (0x) 01-6A-00-00-00-00-08
";

fn entry(timestamp: f64, value: &str) -> ReplayEntry {
    ReplayEntry {
        timestamp,
        value: value.to_string(),
    }
}

#[test]
fn test_log_to_replay_to_events() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("source").join("wheel.txt");
    let json_path = dir.path().join("output").join("wheel").join("1.json");
    std::fs::create_dir_all(log_path.parent().unwrap()).unwrap();
    std::fs::write(&log_path, WHEEL_LOG).unwrap();

    assert_eq!(convert_log_file(&log_path, &json_path).unwrap(), 3);

    let entries = load_entries(&json_path).unwrap();
    assert_eq!(entries[0], entry(0.0, "01-64-00-00-00-00-04"));
    assert_eq!(entries[2].timestamp, 2.0);

    let mut core = SensorCore::with_defaults(Vec::new());
    let summary = replay_entries(&mut core, &entries);

    assert_eq!(summary.processed, 3);
    assert_eq!(summary.rejected, 0);
    let events = core.into_handler();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], CscEvent::SpeedUpdated(v) if (v - 46.3536).abs() < 1e-3));
}

#[test]
fn test_separate_sessions_stay_isolated() {
    let wheel = vec![
        entry(0.0, "01-64-00-00-00-00-04"),
        entry(1.0, "01-6A-00-00-00-00-08"),
    ];
    let crank = vec![
        entry(0.0, "02-0A-00-00-02"),
        entry(1.0, "02-0C-00-00-08"),
    ];

    let (tx, rx) = crossbeam::channel::unbounded::<CscEvent>();
    std::thread::scope(|scope| {
        for entries in [&wheel, &crank] {
            let tx = tx.clone();
            scope.spawn(move || {
                let mut core = SensorCore::with_defaults(tx);
                replay_entries(&mut core, entries)
            });
        }
    });
    drop(tx);

    let mut speeds = 0;
    let mut cadences = 0;
    for event in rx {
        match event {
            CscEvent::SpeedUpdated(v) => {
                speeds += 1;
                assert!((v - 46.3536).abs() < 1e-3);
            }
            CscEvent::CadenceUpdated(v) => {
                cadences += 1;
                assert!((v - 80.0).abs() < 1e-9);
            }
        }
    }
    assert_eq!((speeds, cadences), (1, 1));
}

#[test]
fn test_replay_into_publisher() {
    let entries = vec![
        entry(0.0, "02-0A-00-00-02"),
        entry(1.0, "02-0B-00-00-06"),
    ];
    let (tx, rx) = crossbeam::channel::unbounded();
    let mut core = SensorCore::new(&CscConfig::default(), PayloadPublisher::new(tx));

    replay_entries(&mut core, &entries);
    drop(core);

    let payloads: Vec<Vec<u8>> = rx.iter().collect();
    assert_eq!(payloads.len(), 1);
    assert_eq!(
        MetricPayload::decode(&payloads[0]).unwrap(),
        MetricPayload::Cadence(60.0)
    );
}

#[test]
fn test_save_and_load_entries() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crank.json");
    let entries = vec![entry(0.0, "02-0A-00-00-02"), entry(0.875, "02-0B-00-00-06")];

    save_entries(&path, &entries).unwrap();
    assert_eq!(load_entries(&path).unwrap(), entries);
}

#[test]
fn test_load_errors() {
    let dir = tempfile::tempdir().unwrap();

    let missing = load_entries(&dir.path().join("missing.json"));
    assert!(matches!(missing, Err(ReplayError::IoError(_))));

    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{\"timestamp\": 0}").unwrap();
    assert!(matches!(load_entries(&path), Err(ReplayError::JsonError(_))));
}
