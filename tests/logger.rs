use pantry::logger::{get_log_file_path, Logger};

#[test]
fn test_logs_are_newest_first() {
    let logger = Logger::new();
    logger.log("first".to_string());
    logger.log("second".to_string());

    let logs = logger.get_logs();
    assert_eq!(logs.len(), 2);
    assert!(logs[0].contains("second"));
    assert!(logs[1].contains("first"));
    assert!(logs[0].starts_with('['));
}

#[test]
fn test_clear_and_shared_clones() {
    let logger = Logger::new();
    let clone = logger.clone();
    clone.log("from clone".to_string());
    assert_eq!(logger.get_logs().len(), 1);

    logger.clear();
    assert!(clone.get_logs().is_empty());
}

#[test]
fn test_buffer_is_bounded() {
    let logger = Logger::new();
    for i in 0..600 {
        logger.log(format!("line {}", i));
    }
    let logs = logger.get_logs();
    assert_eq!(logs.len(), 500);
    assert!(logs[0].contains("line 599"));
    assert!(logs.last().unwrap().contains("line 100"));
}

#[test]
fn test_log_file_path() {
    if let Ok(path) = get_log_file_path() {
        assert!(path.ends_with("pantry/pantry.log"));
    }
}
