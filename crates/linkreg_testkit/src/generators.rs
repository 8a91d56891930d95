//! Property-based test generators using proptest.
//!
//! Provides strategies for generating documents and operation sequences
//! that the loaders accept.

use linkreg_codec::{AssetLine, UserLine};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Strategy for generating asset hashes.
pub fn hash_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-f0-9]{2,8}").expect("Invalid regex")
}

/// Strategy for generating usernames of mixed case.
pub fn username_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z][a-zA-Z0-9_]{0,11}").expect("Invalid regex")
}

/// Strategy for generating asset lines with distinct hashes.
pub fn asset_lines_strategy(max: usize) -> impl Strategy<Value = Vec<AssetLine>> {
    prop::collection::btree_map(hash_strategy(), (any::<u32>(), any::<u8>()), 0..max).prop_map(
        |assets: BTreeMap<String, (u32, u8)>| {
            assets
                .into_iter()
                .map(|(hash, (size, flags))| AssetLine::new(hash, size, flags))
                .collect()
        },
    )
}

/// Strategy for user lines whose usernames are distinct ignoring case and
/// whose hashes are drawn from `hashes` without repeats.
pub fn user_lines_strategy(
    hashes: Vec<String>,
    max: usize,
) -> impl Strategy<Value = Vec<UserLine>> {
    let picks = if hashes.is_empty() {
        Just(Vec::new()).boxed()
    } else {
        prop::collection::vec(prop::sample::subsequence(hashes.clone(), 0..=hashes.len()), 0..max)
            .boxed()
    };
    (prop::collection::vec(username_strategy(), 0..max), picks).prop_map(|(names, picks)| {
        let mut seen = BTreeSet::new();
        names
            .into_iter()
            .filter(|name| seen.insert(name.to_lowercase()))
            .enumerate()
            .map(|(index, name)| {
                let owned = picks.get(index).cloned().unwrap_or_default();
                UserLine::new(name, index as u32, owned)
            })
            .collect()
    })
}

/// Renders lines as a document, one per line.
pub fn render<T: std::fmt::Display>(lines: &[T]) -> String {
    lines.iter().map(|line| format!("{line}\n")).collect()
}

/// A registry operation for model-based testing.
#[derive(Debug, Clone)]
pub enum RegistryOp {
    /// Insert an asset.
    InsertAsset(String, u32),
    /// Delete an asset with its references.
    DeleteAsset(String),
    /// Insert a user.
    InsertUser(String, u32),
    /// Delete a user.
    DeleteUser(String),
    /// Give a user an asset.
    Assign(String, String),
    /// Take an asset from a user.
    Unassign(String, String),
    /// Delete every asset.
    ClearAssets,
}

/// Strategy for generating registry operations over small key pools, so
/// operations collide often.
pub fn registry_op_strategy() -> impl Strategy<Value = RegistryOp> {
    let hash = prop::sample::select(vec!["a1", "b2", "c3", "d4", "e5"]).prop_map(String::from);
    let user =
        prop::sample::select(vec!["alice", "Alice", "bob", "BOB", "carol"]).prop_map(String::from);
    prop_oneof![
        4 => (hash.clone(), any::<u32>()).prop_map(|(h, size)| RegistryOp::InsertAsset(h, size)),
        2 => hash.clone().prop_map(RegistryOp::DeleteAsset),
        3 => (user.clone(), any::<u32>()).prop_map(|(u, id)| RegistryOp::InsertUser(u, id)),
        1 => user.clone().prop_map(RegistryOp::DeleteUser),
        4 => (user.clone(), hash.clone()).prop_map(|(u, h)| RegistryOp::Assign(u, h)),
        2 => (user, hash).prop_map(|(u, h)| RegistryOp::Unassign(u, h)),
        1 => Just(RegistryOp::ClearAssets),
    ]
}

/// Strategy for generating operation sequences.
pub fn registry_ops_strategy(max: usize) -> impl Strategy<Value = Vec<RegistryOp>> {
    prop::collection::vec(registry_op_strategy(), 0..max)
}
