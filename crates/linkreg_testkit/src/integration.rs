//! Cross-crate integration test helpers.
//!
//! [`IntegrationHarness`] drives a [`Registry`] and a plain model side by
//! side, then checks that they agree and that every registry invariant
//! holds.

use crate::generators::RegistryOp;
use linkreg_core::{AssetFlags, CoreError, KeyComparator, Registry};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
struct ModelUser {
    id: u32,
    owned: Vec<String>,
}

/// A registry paired with a model of what it should contain.
///
/// The model assumes the default configuration: byte-exact hashes and
/// case-insensitive usernames.
pub struct IntegrationHarness {
    /// The registry under test.
    pub registry: Registry,
    assets: BTreeMap<String, u32>,
    users: BTreeMap<String, ModelUser>,
}

impl IntegrationHarness {
    /// Creates a harness around an empty registry.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            assets: BTreeMap::new(),
            users: BTreeMap::new(),
        }
    }

    /// Applies one operation to both the registry and the model, checking
    /// that the registry succeeds exactly when the model says it should.
    pub fn apply(&mut self, op: &RegistryOp) {
        match op {
            RegistryOp::InsertAsset(hash, size) => {
                let result = self.registry.insert_asset(hash, *size, AssetFlags::empty());
                if self.assets.contains_key(hash) {
                    assert!(
                        matches!(result, Err(CoreError::DuplicateKey { .. })),
                        "duplicate asset {hash} was accepted"
                    );
                } else {
                    result.expect("Failed to insert asset");
                    self.assets.insert(hash.clone(), *size);
                }
            }
            RegistryOp::DeleteAsset(hash) => {
                let result = self.registry.delete_asset(hash);
                if self.assets.remove(hash).is_some() {
                    result.expect("Failed to delete asset");
                    for user in self.users.values_mut() {
                        user.owned.retain(|held| held != hash);
                    }
                } else {
                    assert!(result.expect_err("missing asset was deleted").is_not_found());
                }
            }
            RegistryOp::InsertUser(name, id) => {
                let result = self.registry.insert_user(name, *id);
                let key = name.to_lowercase();
                if self.users.contains_key(&key) {
                    assert!(matches!(result, Err(CoreError::DuplicateKey { .. })));
                } else {
                    result.expect("Failed to insert user");
                    self.users.insert(
                        key,
                        ModelUser {
                            id: *id,
                            owned: Vec::new(),
                        },
                    );
                }
            }
            RegistryOp::DeleteUser(name) => {
                let result = self.registry.delete_user(name);
                if self.users.remove(&name.to_lowercase()).is_some() {
                    result.expect("Failed to delete user");
                } else {
                    assert!(result.is_err(), "missing user {name} was deleted");
                }
            }
            RegistryOp::Assign(name, hash) => {
                let result = self.registry.assign_asset(name, hash);
                let asset_known = self.assets.contains_key(hash);
                match self.users.get_mut(&name.to_lowercase()) {
                    Some(user) if asset_known && !user.owned.contains(hash) => {
                        result.expect("Failed to assign asset");
                        user.owned.push(hash.clone());
                    }
                    Some(_) if asset_known => {
                        assert!(matches!(result, Err(CoreError::DuplicateReference { .. })));
                    }
                    _ => assert!(result.is_err(), "assign of {hash} to {name} succeeded"),
                }
            }
            RegistryOp::Unassign(name, hash) => {
                let result = self.registry.unassign_asset(name, hash);
                match self.users.get_mut(&name.to_lowercase()) {
                    Some(user) if user.owned.contains(hash) => {
                        result.expect("Failed to unassign asset");
                        user.owned.retain(|held| held != hash);
                    }
                    _ => assert!(result.is_err(), "unassign of {hash} from {name} succeeded"),
                }
            }
            RegistryOp::ClearAssets => {
                self.registry.clear_assets();
                self.assets.clear();
                for user in self.users.values_mut() {
                    user.owned.clear();
                }
            }
        }
    }

    /// Applies every operation, verifying after each one.
    pub fn run(&mut self, ops: &[RegistryOp]) {
        for op in ops {
            self.apply(op);
            self.verify_all();
        }
    }

    /// Verifies the registry invariants and that the registry matches the
    /// model.
    pub fn verify_all(&self) {
        verify_invariants(&self.registry);

        let assets: BTreeMap<String, u32> = self
            .registry
            .assets()
            .iter()
            .map(|asset| (asset.hash().to_owned(), asset.size_bytes()))
            .collect();
        assert_eq!(assets, self.assets, "asset store diverged from model");

        assert_eq!(self.registry.users().len(), self.users.len());
        for (key, expected) in &self.users {
            let user = self
                .registry
                .find_user(key)
                .expect("Model user missing from registry");
            assert_eq!(user.user_id(), expected.id);
            let owned: Vec<&str> = user.owned().collect();
            assert_eq!(owned, expected.owned, "owned assets of {key} diverged");
        }
    }

    /// Returns the number of assets in the model.
    pub fn tracked_assets(&self) -> usize {
        self.assets.len()
    }
}

impl Default for IntegrationHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks ordering, uniqueness and reference integrity of a registry.
pub fn verify_invariants(registry: &Registry) {
    let asset_order = registry.assets().order();
    let hashes: Vec<&str> = registry.assets().iter().map(|a| a.hash()).collect();
    for pair in hashes.windows(2) {
        assert!(
            asset_order.compare(pair[0], pair[1]).is_lt(),
            "assets out of order: {} then {}",
            pair[0],
            pair[1]
        );
    }

    let user_order = registry.users().order();
    let names: Vec<&str> = registry.users().iter().map(|u| u.username()).collect();
    for pair in names.windows(2) {
        assert!(
            user_order.compare(pair[0], pair[1]).is_lt(),
            "users out of order: {} then {}",
            pair[0],
            pair[1]
        );
    }
    let mut backwards: Vec<&str> = registry.users().iter().rev().map(|u| u.username()).collect();
    backwards.reverse();
    assert_eq!(names, backwards, "user list links disagree");

    for user in registry.users().iter() {
        let owned: Vec<&str> = user.owned().collect();
        for (index, hash) in owned.iter().enumerate() {
            let asset = registry
                .find_asset(hash)
                .unwrap_or_else(|_| panic!("{} holds dangling {hash}", user.username()));
            assert_eq!(asset.hash(), *hash, "reference is not the canonical hash");
            assert!(
                !owned[..index].contains(hash),
                "{} holds {hash} twice",
                user.username()
            );
        }
    }
}
