//! The asset/user registry.
//!
//! The registry owns both stores and is the only way to change how they
//! relate. Every user reference names an asset present in the asset store;
//! operations that remove assets detach the matching references first.
//!
//! Loads are all-or-nothing. A load replaces the target store, and if any
//! line fails to decode or link, the store is cleared again before the
//! error is returned.

use crate::asset::{Asset, AssetHandle, AssetStore};
use crate::config::{Config, ReferencePolicy};
use crate::error::{CoreError, CoreResult};
use crate::flags::AssetFlags;
use crate::persist::{read_text, write_replacing};
use crate::user::{User, UserHandle, UserStore};
use linkreg_codec::{decode_assets, decode_users};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

/// Assets, users, and the references between them.
#[derive(Debug, Clone)]
pub struct Registry {
    assets: AssetStore,
    users: UserStore,
    config: Config,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Creates an empty registry with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates an empty registry.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            assets: AssetStore::new(config.asset_order),
            users: UserStore::new(config.user_order),
            config,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read access to the asset store.
    #[must_use]
    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    /// Read access to the user store.
    #[must_use]
    pub fn users(&self) -> &UserStore {
        &self.users
    }

    // ---- assets ----

    /// Inserts an asset.
    ///
    /// # Errors
    ///
    /// See [`AssetStore::insert`].
    pub fn insert_asset(
        &mut self,
        hash: &str,
        size_bytes: u32,
        flags: AssetFlags,
    ) -> CoreResult<AssetHandle> {
        self.assets.insert(hash, size_bytes, flags)
    }

    /// Finds an asset by hash.
    ///
    /// # Errors
    ///
    /// See [`AssetStore::find`].
    pub fn find_asset(&self, hash: &str) -> CoreResult<&Asset> {
        let handle = self.assets.find(hash)?;
        self.assets.get(handle)
    }

    /// Finds an asset by hash for editing its size or flags.
    ///
    /// # Errors
    ///
    /// See [`AssetStore::find`].
    pub fn asset_mut(&mut self, hash: &str) -> CoreResult<&mut Asset> {
        let handle = self.assets.find(hash)?;
        self.assets.get_mut(handle)
    }

    /// Replaces the flags of an asset.
    ///
    /// # Errors
    ///
    /// `NotFound` if no asset has this hash.
    pub fn set_asset_flags(&mut self, hash: &str, flags: AssetFlags) -> CoreResult<()> {
        self.asset_mut(hash)?.set_flags(flags);
        Ok(())
    }

    /// Deletes an asset and every reference to it.
    ///
    /// References are detached from all users before the asset is unlinked,
    /// so no user is ever left holding a hash the store no longer has.
    ///
    /// # Errors
    ///
    /// `NotFound` if no asset has this hash.
    pub fn delete_asset(&mut self, hash: &str) -> CoreResult<Asset> {
        let handle = self.assets.find(hash)?;
        let canonical = self.assets.get(handle)?.hash().to_owned();

        let detached = self.users.detach_everywhere(&canonical);
        let asset = self.assets.remove(handle)?;

        debug!(hash = %canonical, detached, "deleted asset");
        Ok(asset)
    }

    /// Deletes every asset, detaching every reference first.
    pub fn clear_assets(&mut self) {
        let detached = self.users.clear_all_references();
        self.assets.clear();
        debug!(detached, "cleared assets");
    }

    /// Returns the usernames holding a reference to `hash`, in user order.
    ///
    /// # Errors
    ///
    /// `NotFound` if no asset has this hash.
    pub fn owners_of(&self, hash: &str) -> CoreResult<Vec<&str>> {
        let canonical = self.find_asset(hash)?.hash();
        Ok(self
            .users
            .iter()
            .filter(|user| user.owns(canonical))
            .map(User::username)
            .collect())
    }

    // ---- users ----

    /// Inserts a user with no assets.
    ///
    /// # Errors
    ///
    /// See [`UserStore::insert`].
    pub fn insert_user(&mut self, username: &str, user_id: u32) -> CoreResult<UserHandle> {
        self.users.insert(username, user_id)
    }

    /// Finds a user by name.
    ///
    /// # Errors
    ///
    /// See [`UserStore::find`].
    pub fn find_user(&self, username: &str) -> CoreResult<&User> {
        let handle = self.users.find(username)?;
        self.users.get(handle)
    }

    /// Deletes a user. Its assets stay in the asset store.
    ///
    /// # Errors
    ///
    /// See [`UserStore::delete`].
    pub fn delete_user(&mut self, username: &str) -> CoreResult<User> {
        self.users.delete(username)
    }

    /// Deletes every user. Assets are untouched.
    pub fn clear_users(&mut self) {
        self.users.clear();
    }

    /// Gives `username` a reference to the asset `hash`.
    ///
    /// # Errors
    ///
    /// - `NotFound` / `EmptyCollection` if the user or the asset is missing
    /// - `DuplicateReference` if the user already holds the asset
    pub fn assign_asset(&mut self, username: &str, hash: &str) -> CoreResult<()> {
        let canonical = self.find_asset(hash)?.hash().to_owned();
        let handle = self.users.find(username)?;
        self.users.get_mut(handle)?.attach(&canonical)
    }

    /// Removes `username`'s reference to `hash`. The asset itself stays.
    ///
    /// # Errors
    ///
    /// `NotFound` if the user, the asset, or the reference is missing.
    pub fn unassign_asset(&mut self, username: &str, hash: &str) -> CoreResult<()> {
        let canonical = self.find_asset(hash)?.hash().to_owned();
        let handle = self.users.find(username)?;
        self.users.get_mut(handle)?.detach(&canonical)
    }

    /// Drops all of `username`'s references and returns how many there were.
    ///
    /// # Errors
    ///
    /// See [`UserStore::find`].
    pub fn clear_user_assets(&mut self, username: &str) -> CoreResult<usize> {
        let handle = self.users.find(username)?;
        Ok(self.users.get_mut(handle)?.clear_owned())
    }

    // ---- persistence ----

    /// Replaces the asset store with the contents of an asset file.
    ///
    /// Clearing the asset store detaches every user reference, so load
    /// users after assets.
    ///
    /// # Errors
    ///
    /// `FileNotFound` or `Io` if the file cannot be read; `FileCorrupted`
    /// for a malformed line; `DuplicateKey` for a repeated hash. The asset
    /// store is empty after any error.
    pub fn load_assets(&mut self, path: &Path) -> CoreResult<usize> {
        self.clear_assets();
        let input = read_text(path)?;
        let count = self.load_assets_str(&input)?;
        info!(path = %path.display(), count, "loaded assets");
        Ok(count)
    }

    /// Replaces the asset store with the contents of an asset document.
    ///
    /// # Errors
    ///
    /// As [`Registry::load_assets`], minus file errors.
    pub fn load_assets_str(&mut self, input: &str) -> CoreResult<usize> {
        self.clear_assets();
        let result = self.fill_assets(input);
        if let Err(err) = &result {
            warn!(error = %err, "asset load failed, store cleared");
            self.clear_assets();
        }
        result
    }

    fn fill_assets(&mut self, input: &str) -> CoreResult<usize> {
        let lines = decode_assets(input)?;
        for line in &lines {
            self.assets.insert(
                &line.hash,
                line.size_bytes,
                AssetFlags::from_bits_retain(line.flags),
            )?;
        }
        Ok(lines.len())
    }

    /// Replaces the user store with the contents of a user file.
    ///
    /// Every hash is resolved against the assets already loaded.
    ///
    /// # Errors
    ///
    /// `FileNotFound` or `Io` if the file cannot be read; `FileCorrupted`
    /// for a malformed line; `DuplicateKey` for a repeated username;
    /// `DuplicateReference` for a hash listed twice on one line; `NotFound`
    /// for an unknown hash under [`ReferencePolicy::Strict`]. The user store
    /// is empty after any error.
    pub fn load_users(&mut self, path: &Path) -> CoreResult<usize> {
        self.clear_users();
        let input = read_text(path)?;
        let count = self.load_users_str(&input)?;
        info!(path = %path.display(), count, "loaded users");
        Ok(count)
    }

    /// Replaces the user store with the contents of a user document.
    ///
    /// # Errors
    ///
    /// As [`Registry::load_users`], minus file errors.
    pub fn load_users_str(&mut self, input: &str) -> CoreResult<usize> {
        self.clear_users();
        let result = self.fill_users(input);
        if let Err(err) = &result {
            warn!(error = %err, "user load failed, store cleared");
            self.clear_users();
        }
        result
    }

    fn fill_users(&mut self, input: &str) -> CoreResult<usize> {
        let lines = decode_users(input)?;
        for line in &lines {
            let handle = self.users.insert(&line.username, line.user_id)?;
            for hash in &line.hashes {
                let canonical = match self.assets.find(hash) {
                    Ok(asset) => self.assets.get(asset)?.hash().to_owned(),
                    Err(err) if err.is_not_found() => match self.config.reference_policy {
                        ReferencePolicy::Strict => return Err(err),
                        ReferencePolicy::SkipUnknown => {
                            warn!(user = %line.username, hash = %hash, "skipping unknown asset");
                            continue;
                        }
                    },
                    Err(err) => return Err(err),
                };
                self.users.get_mut(handle)?.attach(&canonical)?;
            }
        }
        Ok(lines.len())
    }

    /// Writes every asset, one line each, in store order.
    ///
    /// # Errors
    ///
    /// Returns an I/O error from `out`.
    pub fn write_assets(&self, out: &mut dyn Write) -> std::io::Result<()> {
        for asset in self.assets.iter() {
            writeln!(out, "{}", asset.to_line())?;
        }
        Ok(())
    }

    /// Writes every user, one line each, in store order.
    ///
    /// # Errors
    ///
    /// Returns an I/O error from `out`.
    pub fn write_users(&self, out: &mut dyn Write) -> std::io::Result<()> {
        for user in self.users.iter() {
            writeln!(out, "{}", user.to_line())?;
        }
        Ok(())
    }

    /// Saves the asset store to `path`, replacing the file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be written; the old file is then kept.
    pub fn save_assets(&self, path: &Path) -> CoreResult<()> {
        write_replacing(path, |out| self.write_assets(out))?;
        info!(path = %path.display(), count = self.assets.len(), "saved assets");
        Ok(())
    }

    /// Saves the user store to `path`, replacing the file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be written; the old file is then kept.
    pub fn save_users(&self, path: &Path) -> CoreResult<()> {
        write_replacing(path, |out| self.write_users(out))?;
        info!(path = %path.display(), count = self.users.len(), "saved users");
        Ok(())
    }

    /// Saves users, then assets.
    ///
    /// Users go first so that a failure between the two writes leaves a
    /// users file that still loads against the old assets file.
    ///
    /// # Errors
    ///
    /// The error from whichever save failed; a failed users save leaves
    /// both files untouched.
    pub fn save_all(&self, assets_path: &Path, users_path: &Path) -> CoreResult<()> {
        self.save_users(users_path)?;
        self.save_assets(assets_path)
    }
}
