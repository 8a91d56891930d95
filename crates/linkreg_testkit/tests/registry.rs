//! Integration tests for the registry through its files.

use linkreg_codec::CodecError;
use linkreg_core::{Asset, AssetFlags, Config, CoreError, ReferencePolicy, Registry, User};
use linkreg_testkit::prelude::*;

fn hashes(registry: &Registry) -> Vec<&str> {
    registry.assets().iter().map(Asset::hash).collect()
}

fn owned<'a>(registry: &'a Registry, username: &str) -> Vec<&'a str> {
    registry
        .find_user(username)
        .expect("user should exist")
        .owned()
        .collect()
}

#[test]
fn three_assets_load_in_order_and_delete_cascades() {
    let files = TestFiles::new();
    files.write_assets("a1 100 1\nz9 50 2\nm5 75 0\n");
    files.write_users("owner 1 m5 z9\n");

    let mut registry = Registry::new();
    registry.load_assets(&files.assets_path()).unwrap();
    registry.load_users(&files.users_path()).unwrap();
    assert_eq!(hashes(&registry), vec!["a1", "m5", "z9"]);

    registry.delete_asset("m5").unwrap();
    assert_eq!(hashes(&registry), vec!["a1", "z9"]);
    assert_eq!(owned(&registry, "owner"), vec!["z9"]);
}

#[test]
fn bob_loses_reference_when_asset_deleted() {
    let mut registry = Registry::new();
    registry.insert_asset("a1", 100, AssetFlags::ENCRYPTED).unwrap();
    registry.insert_user("Bob", 1).unwrap();
    registry.assign_asset("Bob", "a1").unwrap();

    registry.delete_asset("a1").unwrap();
    assert!(owned(&registry, "Bob").is_empty());
    verify_invariants(&registry);
}

#[test]
fn upper_and_lower_case_find_same_user() {
    let registry = sample_registry();
    let upper = registry.find_user("ALICE").unwrap();
    let lower = registry.find_user("alice").unwrap();
    assert!(std::ptr::eq(upper, lower));
    assert_eq!(upper.username(), "Alice");
}

#[test]
fn reference_shared_by_many_owners_is_fully_removed() {
    with_sample_registry(|registry, _| {
        let before = registry.owners_of("a1").unwrap();
        assert_eq!(before, vec!["bob", "Dave"]);

        registry.delete_asset("a1").unwrap();
        for user in registry.users().iter() {
            assert!(!user.owns("a1"));
        }
        assert!(registry.find_asset("a1").unwrap_err().is_not_found());
        verify_invariants(registry);
    });
}

#[test]
fn saved_files_reload_to_equal_registry() {
    with_sample_registry(|registry, files| {
        registry.delete_asset("m5").unwrap();
        registry.assign_asset("carol", "c3").unwrap();
        registry.save_assets(&files.assets_path()).unwrap();
        registry.save_users(&files.users_path()).unwrap();

        let mut reloaded = Registry::new();
        reloaded.load_assets(&files.assets_path()).unwrap();
        reloaded.load_users(&files.users_path()).unwrap();

        let before: Vec<Asset> = registry.assets().iter().cloned().collect();
        let after: Vec<Asset> = reloaded.assets().iter().cloned().collect();
        assert_eq!(before, after);
        let before: Vec<User> = registry.users().iter().cloned().collect();
        let after: Vec<User> = reloaded.users().iter().cloned().collect();
        assert_eq!(before, after);
    });
}

#[test]
fn save_without_noise_reproduces_file() {
    let files = TestFiles::new();
    let document = "a1 100 1\nc3 4096 12\nm5 75 0\nz9 50 2\n";
    files.write_assets(document);

    let mut registry = Registry::new();
    registry.load_assets(&files.assets_path()).unwrap();
    registry.save_assets(&files.assets_path()).unwrap();

    assert_eq!(files.read(&files.assets_path()), document);
}

#[test]
fn malformed_line_among_valid_ones_leaves_store_empty() {
    let files = TestFiles::new();
    files.write_assets("a1 100 1\nz9 50\nm5 75 0\n");

    let mut registry = sample_registry();
    let err = registry.load_assets(&files.assets_path()).unwrap_err();

    match err {
        CoreError::FileCorrupted(codec) => {
            assert_eq!(codec.line(), Some(2));
            assert!(matches!(codec.root(), CodecError::MissingField { .. }));
        }
        other => panic!("expected FileCorrupted, got {other:?}"),
    }
    assert!(registry.assets().is_empty());
    verify_invariants(&registry);
}

#[test]
fn four_field_line_is_corrupt() {
    let mut registry = Registry::new();
    let err = registry.load_assets_str("a1 100 1 extra\n").unwrap_err();
    assert!(matches!(err, CoreError::FileCorrupted(_)));
    assert!(registry.assets().is_empty());
}

#[test]
fn users_need_assets_loaded_first() {
    let files = TestFiles::sample();
    let mut registry = Registry::new();

    let err = registry.load_users(&files.users_path()).unwrap_err();
    assert!(err.is_not_found());
    assert!(registry.users().is_empty());
}

#[test]
fn lenient_policy_links_what_it_can() {
    let files = TestFiles::sample();
    let config = Config::new().reference_policy(ReferencePolicy::SkipUnknown);
    let mut registry = Registry::with_config(config);
    registry.load_assets_str("a1 1 0\n").unwrap();
    registry.load_users(&files.users_path()).unwrap();

    assert_eq!(registry.users().len(), 4);
    assert_eq!(owned(&registry, "dave"), vec!["a1"]);
    assert!(owned(&registry, "alice").is_empty());
}

#[test]
fn reloading_assets_drops_all_references() {
    with_sample_registry(|registry, files| {
        registry.load_assets(&files.assets_path()).unwrap();
        assert_eq!(registry.assets().len(), 4);
        assert!(registry.users().iter().all(|user| user.owned_count() == 0));
    });
}

#[test]
fn missing_file_is_reported() {
    let files = TestFiles::new();
    let mut registry = Registry::new();
    let err = registry.load_users(&files.users_path()).unwrap_err();
    assert!(matches!(err, CoreError::FileNotFound { .. }));
}

#[test]
fn deleting_missing_keys_is_an_error() {
    let mut registry = sample_registry();
    assert!(registry.delete_asset("ffff").unwrap_err().is_not_found());
    assert!(registry.delete_user("erin").unwrap_err().is_not_found());
    verify_invariants(&registry);
}

#[test]
fn flags_survive_round_trip_including_unknown_bits() {
    let mut registry = Registry::new();
    registry
        .insert_asset("f0", 1, AssetFlags::from_bits_retain(0b1010_0101))
        .unwrap();
    let mut out = Vec::new();
    registry.write_assets(&mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "f0 1 165\n");

    let asset = registry.find_asset("f0").unwrap();
    assert_eq!(asset.flags().names(), vec!["Encrypted", "Archived"]);
}
