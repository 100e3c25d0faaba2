use std::time::Duration;

use fleet_rs::config::Config;

// Env vars are process-global; everything touching them lives in one test.
#[test]
fn config_from_env() {
    unsafe {
        std::env::remove_var("FLEET_TRUCK_TIMEOUT_MS");
        std::env::remove_var("FLEET_BATCH_TIMEOUT_MS");
        std::env::remove_var("FLEET_MANIFEST");
    }
    let config = Config::from_env().unwrap();
    assert_eq!(config.truck_timeout, None);
    assert_eq!(config.batch_timeout, None);
    assert!(!config.log_level.is_empty());
    assert_eq!(config.deadline().per_truck, None);

    unsafe {
        std::env::set_var("FLEET_TRUCK_TIMEOUT_MS", "2000");
        std::env::set_var("FLEET_BATCH_TIMEOUT_MS", " 5000 ");
        std::env::set_var("FLEET_MANIFEST", "fixtures/fleet.toml");
    }
    let config = Config::from_env().unwrap();
    let deadline = config.deadline();
    assert_eq!(deadline.per_truck, Some(Duration::from_secs(2)));
    assert_eq!(deadline.batch, Some(Duration::from_secs(5)));
    assert_eq!(
        config.manifest.as_deref(),
        Some(std::path::Path::new("fixtures/fleet.toml"))
    );

    unsafe {
        std::env::set_var("FLEET_TRUCK_TIMEOUT_MS", "soon");
    }
    assert!(Config::from_env().is_err());

    unsafe {
        std::env::set_var("FLEET_TRUCK_TIMEOUT_MS", "0");
    }
    assert!(Config::from_env().is_err());

    // Clean up
    unsafe {
        std::env::remove_var("FLEET_TRUCK_TIMEOUT_MS");
        std::env::remove_var("FLEET_BATCH_TIMEOUT_MS");
        std::env::remove_var("FLEET_MANIFEST");
    }
}
