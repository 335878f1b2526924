//! Tests for verbose output and file logging.

use logger::{close_file_logging, enable_verbose, error, info, set_level, verbose, warn, Level};

#[cfg(feature = "verbose")]
#[test]
fn verbose_respects_runtime_flag() {
    verbose!("This should not appear");

    enable_verbose();
    assert!(logger::is_verbose_enabled());
    verbose!("This should appear: verbose test {}", 42);
}

#[cfg(feature = "file-logging")]
#[test]
fn file_logging_writes_timestamped_lines() {
    use logger::init_file_logging;
    use std::fs;

    let dir = tempfile::tempdir().expect("temp dir");
    let log_path = dir.path().join("logs").join("cityaid.log");

    set_level(Level::Info);
    assert!(init_file_logging(&log_path));

    info!("Test info message");
    warn!("Test warning message");
    error!("Test error message");

    #[cfg(feature = "verbose")]
    {
        enable_verbose();
        verbose!("This verbose message should NOT be in the file");
    }

    close_file_logging();

    let contents = fs::read_to_string(&log_path).expect("Failed to read log file");
    assert!(contents.contains("[INFO] Test info message"));
    assert!(contents.contains("[WARN] Test warning message"));
    assert!(contents.contains("[ERROR] Test error message"));
    assert!(!contents.contains("verbose message"));

    // Every line starts with a "YYYY-MM-DD HH:MM:SS" stamp
    for line in contents.lines() {
        let stamp = &line[..19];
        assert!(
            chrono::NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S").is_ok(),
            "missing timestamp in {line:?}"
        );
    }
}
