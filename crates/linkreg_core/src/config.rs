//! Registry configuration.

use crate::compare::KeyOrder;

/// What a user load does with a hash that names no loaded asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReferencePolicy {
    /// The whole load fails with `NotFound`.
    #[default]
    Strict,
    /// The hash is dropped with a warning; the user is still loaded.
    SkipUnknown,
}

/// What a history load does with a battle whose name and date repeat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BattleMerge {
    /// Fleets are appended to the existing battle.
    #[default]
    Continue,
    /// The repeat is a `DuplicateKey` error.
    Reject,
}

/// Configuration shared by the registry and the battle history.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Order of asset hashes.
    pub asset_order: KeyOrder,

    /// Order of usernames.
    pub user_order: KeyOrder,

    /// Order of battle names.
    pub battle_order: KeyOrder,

    /// Handling of unknown hashes in user files.
    pub reference_policy: ReferencePolicy,

    /// Handling of repeated battles in history files.
    pub battle_merge: BattleMerge,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            asset_order: KeyOrder::Bytewise,
            user_order: KeyOrder::CaseInsensitive,
            battle_order: KeyOrder::CaseInsensitive,
            reference_policy: ReferencePolicy::Strict,
            battle_merge: BattleMerge::Continue,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the asset hash order.
    #[must_use]
    pub const fn asset_order(mut self, order: KeyOrder) -> Self {
        self.asset_order = order;
        self
    }

    /// Sets the username order.
    #[must_use]
    pub const fn user_order(mut self, order: KeyOrder) -> Self {
        self.user_order = order;
        self
    }

    /// Sets the battle name order.
    #[must_use]
    pub const fn battle_order(mut self, order: KeyOrder) -> Self {
        self.battle_order = order;
        self
    }

    /// Sets the unknown-hash policy.
    #[must_use]
    pub const fn reference_policy(mut self, policy: ReferencePolicy) -> Self {
        self.reference_policy = policy;
        self
    }

    /// Sets the repeated-battle policy.
    #[must_use]
    pub const fn battle_merge(mut self, merge: BattleMerge) -> Self {
        self.battle_merge = merge;
        self
    }
}
