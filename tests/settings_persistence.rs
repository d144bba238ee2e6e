use tempfile::tempdir;
use triq::settings::{
    open_schulte_settings, schulte_presets, DifficultyLevel, GridSize, Preset, SchulteUpdate,
    SCHULTE_STORAGE_KEY,
};
use triq::storage::{FileStorage, Storage};

#[test]
fn preset_survives_restart_on_disk() {
    let dir = tempdir().unwrap();

    let mut store = open_schulte_settings(FileStorage::with_dir(dir.path()));
    store.apply_preset(Preset::Hard);
    drop(store);

    let store = open_schulte_settings(FileStorage::with_dir(dir.path()));
    assert!(store.is_loaded());
    assert_eq!(store.level(), DifficultyLevel::Hard);
    assert_eq!(store.settings(), schulte_presets().get(Preset::Hard));
}

#[test]
fn custom_grid_size_is_written_as_json() {
    let dir = tempdir().unwrap();
    let mut store = open_schulte_settings(FileStorage::with_dir(dir.path()));
    store.update_setting(SchulteUpdate::GridSize(GridSize::new(8).unwrap()));

    let raw = std::fs::read_to_string(dir.path().join("schulte-settings.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        serde_json::json!({"level": "custom", "settings": {"gridSize": 8}})
    );
}

#[test]
fn corrupt_file_is_replaced_with_defaults() {
    let dir = tempdir().unwrap();
    let mut storage = FileStorage::with_dir(dir.path());
    storage.set(SCHULTE_STORAGE_KEY, "{ truncated").unwrap();

    let store = open_schulte_settings(storage);
    assert_eq!(store.level(), DifficultyLevel::Medium);
    assert_eq!(store.settings().grid_size.get(), 5);

    let raw = store.storage().get(SCHULTE_STORAGE_KEY).unwrap().unwrap();
    assert!(raw.contains("\"medium\""));
}

#[test]
fn unreadable_location_falls_back_without_panicking() {
    let dir = tempdir().unwrap();
    // the record path is a directory, so reading it fails
    std::fs::create_dir_all(dir.path().join("schulte-settings.json")).unwrap();

    let mut store = open_schulte_settings(FileStorage::with_dir(dir.path()));
    assert_eq!(store.level(), DifficultyLevel::Medium);

    store.apply_preset(Preset::Easy);
    assert_eq!(store.level(), DifficultyLevel::Easy);
}
