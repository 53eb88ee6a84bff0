//! Integration tests for configuration driving the sensor core.

use rustcsc::sensors::{CscEvent, SensorCore};
use rustcsc::storage::config::{load_config_from, save_config_to, AppConfig};

#[test]
fn test_configured_circumference_and_limits() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[csc]\nwheel_circumference = 2.0\nwheel_repeat_limit = 2\ncrank_repeat_limit = 1\n",
    )
    .unwrap();

    let config = load_config_from(&path).unwrap();
    let mut core = SensorCore::new(&config.csc, Vec::new());

    // Wheel: 10 revs over 1 s at 2 m = 72 km/h
    core.process(&[0x01, 0x0A, 0x00, 0x00, 0x00, 0x00, 0x04]).unwrap();
    core.process(&[0x01, 0x14, 0x00, 0x00, 0x00, 0x00, 0x08]).unwrap();
    core.process(&[0x01, 0x14, 0x00, 0x00, 0x00, 0x00, 0x08]).unwrap();
    core.process(&[0x01, 0x14, 0x00, 0x00, 0x00, 0x00, 0x08]).unwrap();

    // Crank: a single repeat is enough to report zero
    core.process(&[0x02, 0x0A, 0x00, 0x00, 0x02]).unwrap();
    core.process(&[0x02, 0x0A, 0x00, 0x00, 0x02]).unwrap();

    let events = core.into_handler();
    assert_eq!(events.len(), 3);
    assert!((events[0].value() - 72.0).abs() < 1e-9);
    assert_eq!(events[1], CscEvent::SpeedUpdated(0.0));
    assert_eq!(events[2], CscEvent::CadenceUpdated(0.0));
}

#[test]
fn test_saved_defaults_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    save_config_to(&path, &AppConfig::default()).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("[csc]"));
    assert!(content.contains("wheel_circumference = 2.146"));

    let loaded = load_config_from(&path).unwrap();
    assert_eq!(loaded.csc, AppConfig::default().csc);
}
