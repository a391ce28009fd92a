use pantry::config::Config;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.sync.auto_sync_interval_minutes, 15);
    assert_eq!(config.inventory.expiring_soon_days, 3);
    assert_eq!(config.inventory.default_unit, "pcs");
    assert_eq!(config.remote.store_type, "file");
    assert!(!config.storage.in_memory);
    assert!(!config.logging.enabled);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_config_validation() {
    let mut config = Config::default();

    // Valid config should pass
    assert!(config.validate().is_ok());

    // Invalid sync interval should fail
    config.sync.auto_sync_interval_minutes = 2000;
    assert!(config.validate().is_err());

    // Reset and test the expiring-soon window
    config.sync.auto_sync_interval_minutes = 0;
    assert!(config.validate().is_ok());
    config.inventory.expiring_soon_days = 0;
    assert!(config.validate().is_err());

    config.inventory.expiring_soon_days = 7;
    config.logging.level = "chatty".to_string();
    assert!(config.validate().is_err());

    config.logging.level = "debug".to_string();
    config.remote.store_type = "carrier-pigeon".to_string();
    assert!(config.validate().is_err());

    config.remote.store_type = "file".to_string();
    config.remote.root_dir = "  ".to_string();
    assert!(config.validate().is_err());

    config.remote.store_type = "memory".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_serialization() {
    let config = Config::default();
    let toml_str = toml::to_string_pretty(&config).unwrap();
    assert!(toml_str.contains("auto_sync_interval_minutes = 15"));
    assert!(toml_str.contains("expiring_soon_days = 3"));
    assert!(toml_str.contains("store_type = \"file\""));
}

#[test]
fn test_partial_config_deserialization() {
    let partial_toml = r#"
[inventory]
expiring_soon_days = 5

[logging]
enabled = true
"#;

    let config: Config = toml::from_str(partial_toml).unwrap();

    assert_eq!(config.inventory.expiring_soon_days, 5);
    assert!(config.logging.enabled);

    // Unspecified values use defaults
    assert_eq!(config.inventory.default_category, "Other");
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.sync.auto_sync_interval_minutes, 15);
    assert!(config.storage.database_path.is_none());
}

#[test]
fn test_empty_config_deserialization() {
    let config: Config = toml::from_str("").unwrap();
    let default_config = Config::default();

    assert_eq!(
        config.sync.auto_sync_interval_minutes,
        default_config.sync.auto_sync_interval_minutes
    );
    assert_eq!(config.inventory.expiring_soon_days, default_config.inventory.expiring_soon_days);
    assert_eq!(config.remote.root_dir, default_config.remote.root_dir);
}

#[test]
fn test_load_and_generate_config_file() {
    let dir = std::env::temp_dir().join(format!("pantry-config-{}", uuid::Uuid::new_v4().simple()));
    let path = dir.join("config.toml");

    Config::generate_default_config(&path).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("# Pantry Configuration File"));

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded.inventory.expiring_soon_days, 3);

    std::fs::write(&path, "[sync]\nauto_sync_interval_minutes = 5000\n").unwrap();
    assert!(Config::load_from_file(&path).is_err());

    let _ = std::fs::remove_dir_all(&dir);
}
