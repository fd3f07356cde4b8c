//! ModelManager lifecycle: save, alias resolution, reload, and failed loads
//! that must leave the live model untouched.

use std::sync::Arc;
use std::thread;

use neuropilot_core::config::{ModelConfig, StoreConfig};
use neuropilot_core::errors::{ModelError, StoreError};
use neuropilot_model::{HesitationNetwork, ModelManager, ParameterStore};
use tempfile::TempDir;

fn config() -> ModelConfig {
    ModelConfig {
        trunk_size: 8,
        hidden_size: 16,
        num_commands: 6,
        ..Default::default()
    }
}

fn manager_in(dir: &TempDir) -> ModelManager {
    ModelManager::with_store(ParameterStore::new(dir.path().join("models")), config())
}

#[test]
fn fresh_manager_is_unloaded() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager_in(&dir);
    assert!(!manager.is_loaded());
    assert!(manager.get().is_none());
    assert!(manager.current_version().is_none());
}

#[test]
fn load_without_any_artifact_fails_softly() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager_in(&dir);

    assert!(!manager.load("current"));
    assert!(!manager.load("v1.0"));
    assert!(!manager.is_loaded());

    assert!(matches!(
        manager.try_load("current"),
        Err(ModelError::AliasUnresolved { .. })
    ));
    assert!(matches!(
        manager.try_load("v1.0"),
        Err(ModelError::ArtifactNotFound { .. })
    ));
}

#[test]
fn save_then_load_current_restores_identical_parameters() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager_in(&dir);
    let network = HesitationNetwork::new(&config()).unwrap();

    let path = manager.save(&network, "v2.0").unwrap();
    assert!(path.ends_with("v2.0_model.safetensors"));
    assert!(path.exists());
    // Saving alone does not change what is served.
    assert!(!manager.is_loaded());

    assert!(manager.load("current"));
    let loaded = manager.get().unwrap();
    assert_eq!(loaded.version(), "v2.0");
    assert_eq!(
        loaded.network().named_parameters().unwrap(),
        network.named_parameters().unwrap()
    );
}

#[test]
fn save_creates_missing_root() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("nested").join("store");
    let manager = ModelManager::new(
        &StoreConfig {
            root: root.display().to_string(),
        },
        config(),
    );
    let network = HesitationNetwork::new(&config()).unwrap();
    manager.save(&network, "v1.0").unwrap();
    assert!(root.join("v1.0_model.safetensors").exists());
    assert!(root.join("current.json").exists());
}

#[test]
fn alias_is_last_write_wins() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager_in(&dir);
    let a = HesitationNetwork::new(&config()).unwrap();
    let b = HesitationNetwork::new(&config()).unwrap();

    manager.save(&a, "a").unwrap();
    manager.save(&b, "b").unwrap();

    assert!(manager.load("current"));
    assert_eq!(manager.current_version().as_deref(), Some("b"));
    // Superseded versions stay on disk.
    assert_eq!(manager.store().list_versions().unwrap(), vec!["a", "b"]);
    assert!(manager.load("a"));
    assert_eq!(manager.current_version().as_deref(), Some("a"));
}

#[test]
fn saving_same_parameters_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager_in(&dir);
    let network = HesitationNetwork::new(&config()).unwrap();

    let path = manager.save(&network, "v1.0").unwrap();
    let first = std::fs::read(&path).unwrap();
    manager.save(&network, "v1.0").unwrap();
    let second = std::fs::read(&path).unwrap();

    assert_eq!(first, second);
    assert_eq!(manager.store().list_versions().unwrap(), vec!["v1.0"]);
    assert!(manager.load("current"));
}

#[test]
fn reload_swaps_the_live_reference() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager_in(&dir);
    manager.save(&HesitationNetwork::new(&config()).unwrap(), "v1").unwrap();
    manager.save(&HesitationNetwork::new(&config()).unwrap(), "v2").unwrap();

    assert!(manager.load("v1"));
    let held = manager.get().unwrap();
    assert!(manager.load("v2"));
    let current = manager.get().unwrap();

    assert!(!Arc::ptr_eq(&held, &current));
    // A reference taken before the reload keeps working.
    assert_eq!(held.version(), "v1");
    assert_eq!(current.version(), "v2");
}

#[test]
fn failed_reload_keeps_previous_model() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager_in(&dir);
    manager.save(&HesitationNetwork::new(&config()).unwrap(), "v1").unwrap();
    assert!(manager.load("current"));
    let before = manager.get().unwrap();

    assert!(!manager.load("missing"));
    assert!(!manager.load("../etc"));

    let after = manager.get().unwrap();
    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(after.version(), "v1");
}

#[test]
fn shape_mismatch_fails_load() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager_in(&dir);
    manager.save(&HesitationNetwork::new(&config()).unwrap(), "v1").unwrap();

    let wider = ModelManager::with_store(
        ParameterStore::new(dir.path().join("models")),
        ModelConfig {
            num_commands: 12,
            ..config()
        },
    );
    assert!(matches!(
        wider.try_load("v1"),
        Err(ModelError::LoadFailed { .. })
    ));
    assert!(!wider.is_loaded());
}

#[test]
fn tampered_current_artifact_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager_in(&dir);
    let path = manager
        .save(&HesitationNetwork::new(&config()).unwrap(), "v1")
        .unwrap();

    let mut bytes = std::fs::read(&path).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    std::fs::write(&path, bytes).unwrap();

    assert!(matches!(
        manager.try_load("current"),
        Err(ModelError::ChecksumMismatch { .. })
    ));
    assert!(!manager.is_loaded());
}

#[test]
fn garbage_artifact_fails_load() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager_in(&dir);
    manager.store().ensure_root().unwrap();
    std::fs::write(
        manager.store().artifact_path("junk").unwrap(),
        b"definitely not safetensors",
    )
    .unwrap();

    assert!(matches!(
        manager.try_load("junk"),
        Err(ModelError::LoadFailed { .. })
    ));
}

#[test]
fn reserved_and_invalid_versions_cannot_be_saved() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager_in(&dir);
    let network = HesitationNetwork::new(&config()).unwrap();

    for version in ["current", "", "a/b"] {
        assert!(matches!(
            manager.save(&network, version),
            Err(ModelError::Store(StoreError::InvalidVersion { .. }))
        ));
    }
    assert!(manager.store().read_alias().unwrap().is_none());
}

#[test]
fn concurrent_saves_of_one_version_leave_a_consistent_store() {
    let dir = tempfile::tempdir().unwrap();
    let manager = Arc::new(manager_in(&dir));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                let network = HesitationNetwork::new(&config()).unwrap();
                for _ in 0..3 {
                    manager.save(&network, "v1").unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // The alias checksum matches whichever artifact won the last rename.
    assert!(manager.load("current"));
    let mut names: Vec<String> = std::fs::read_dir(manager.store().root())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, vec!["current.json", "v1_model.safetensors"]);
}

#[test]
fn failed_save_leaves_no_staging_file() {
    let dir = tempfile::tempdir().unwrap();
    let manager = manager_in(&dir);
    let network = HesitationNetwork::new(&config()).unwrap();
    manager.save(&network, "v1").unwrap();

    // A directory at the destination makes the final rename fail.
    let blocked = manager.store().artifact_path("blocked").unwrap();
    std::fs::create_dir_all(blocked.join("inner")).unwrap();
    assert!(manager.save(&network, "blocked").is_err());

    let staging: Vec<_> = std::fs::read_dir(manager.store().root())
        .unwrap()
        .filter_map(|e| e.unwrap().file_name().into_string().ok())
        .filter(|name| name.ends_with(".tmp"))
        .collect();
    assert!(staging.is_empty(), "{staging:?}");
    assert_eq!(
        manager.store().read_alias().unwrap().unwrap().active_version,
        "v1"
    );
}
