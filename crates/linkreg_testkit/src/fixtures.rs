//! Test fixtures and file helpers.
//!
//! Provides sample documents and temp-directory backed files for tests
//! that go through the loaders and savers.

use linkreg_core::Registry;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Sample asset document, deliberately out of order and commented.
pub const SAMPLE_ASSETS: &str = "\
; hash size flags
a1 100 1
z9 50 2 ; read-only
m5 75 0

c3 4096 12
";

/// Sample user document matching [`SAMPLE_ASSETS`].
pub const SAMPLE_USERS: &str = "\
; username id hashes...
bob 2 a1 m5
Alice 1 m5 z9
carol 3
Dave 4 c3 a1 z9
";

/// Sample battle history with a repeated battle.
pub const SAMPLE_HISTORY: &str = "\
BATTLE:Endor
DATE:19830525
FLEET:Rebel Fleet|r1|30|Shield Active, Ready for Jump
FLEET:Imperial Navy|i1|80|Critical Damage
BATTLE:Coruscant
DATE:19990519
FLEET:Home Guard|h1|12|Withdrawal
BATTLE:Endor
DATE:19830525
FLEET:Ewoks|e1|3|holding the forest
";

/// A temp directory with an asset, a user and a history file slot.
pub struct TestFiles {
    dir: TempDir,
}

impl TestFiles {
    /// Creates an empty temp directory.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Creates a temp directory holding the sample documents.
    pub fn sample() -> Self {
        let files = Self::new();
        files.write_assets(SAMPLE_ASSETS);
        files.write_users(SAMPLE_USERS);
        files.write_history(SAMPLE_HISTORY);
        files
    }

    /// Returns the temp directory.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Returns the asset file path.
    pub fn assets_path(&self) -> PathBuf {
        self.dir.path().join("assets.txt")
    }

    /// Returns the user file path.
    pub fn users_path(&self) -> PathBuf {
        self.dir.path().join("users.txt")
    }

    /// Returns the history file path.
    pub fn history_path(&self) -> PathBuf {
        self.dir.path().join("history.txt")
    }

    /// Overwrites the asset file.
    pub fn write_assets(&self, contents: &str) {
        fs::write(self.assets_path(), contents).expect("Failed to write asset file");
    }

    /// Overwrites the user file.
    pub fn write_users(&self, contents: &str) {
        fs::write(self.users_path(), contents).expect("Failed to write user file");
    }

    /// Overwrites the history file.
    pub fn write_history(&self, contents: &str) {
        fs::write(self.history_path(), contents).expect("Failed to write history file");
    }

    /// Reads a file back as text.
    pub fn read(&self, path: &Path) -> String {
        fs::read_to_string(path).expect("Failed to read file")
    }
}

impl Default for TestFiles {
    fn default() -> Self {
        Self::new()
    }
}

/// Loads the sample documents into a registry.
pub fn sample_registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .load_assets_str(SAMPLE_ASSETS)
        .expect("Sample assets should load");
    registry
        .load_users_str(SAMPLE_USERS)
        .expect("Sample users should load");
    registry
}

/// Runs a test with the sample registry loaded from temp files.
pub fn with_sample_registry<F, R>(f: F) -> R
where
    F: FnOnce(&mut Registry, &TestFiles) -> R,
{
    let files = TestFiles::sample();
    let mut registry = Registry::new();
    registry
        .load_assets(&files.assets_path())
        .expect("Failed to load sample assets");
    registry
        .load_users(&files.users_path())
        .expect("Failed to load sample users");
    f(&mut registry, &files)
}
