//! Assets and the ordered asset store.

use crate::arena::SlotId;
use crate::compare::{KeyComparator, KeyOrder};
use crate::error::{CoreError, CoreResult};
use crate::flags::{count_01_pairs_in_str, AssetFlags};
use crate::list::{Position, SinglyList};
use linkreg_codec::{is_valid_token, AssetLine};

/// A digital asset, identified by its content hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    hash: String,
    size_bytes: u32,
    flags: AssetFlags,
}

impl Asset {
    /// Returns the content hash. It never changes after insertion.
    #[must_use]
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Returns the size in bytes.
    #[must_use]
    pub fn size_bytes(&self) -> u32 {
        self.size_bytes
    }

    /// Returns the state flags.
    #[must_use]
    pub fn flags(&self) -> AssetFlags {
        self.flags
    }

    /// Replaces the size.
    pub fn set_size_bytes(&mut self, size_bytes: u32) {
        self.size_bytes = size_bytes;
    }

    /// Replaces the flags.
    pub fn set_flags(&mut self, flags: AssetFlags) {
        self.flags = flags;
    }

    /// Counts 01 bit pairs across the hash bytes.
    #[must_use]
    pub fn hash_bit_pairs(&self) -> u32 {
        count_01_pairs_in_str(&self.hash)
    }

    /// Returns the line this asset is saved as.
    #[must_use]
    pub fn to_line(&self) -> AssetLine {
        AssetLine::new(&self.hash, self.size_bytes, self.flags.bits())
    }
}

/// Handle to an asset in an [`AssetStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetHandle(SlotId);

/// Assets kept in ascending hash order, unique under the store's comparator.
#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    list: SinglyList<Asset>,
    order: KeyOrder,
}

impl AssetStore {
    /// Creates an empty store ordered by `order`.
    #[must_use]
    pub const fn new(order: KeyOrder) -> Self {
        Self {
            list: SinglyList::new(),
            order,
        }
    }

    /// Returns the comparator.
    #[must_use]
    pub fn order(&self) -> KeyOrder {
        self.order
    }

    /// Inserts an asset at its sorted position.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `hash` is empty or contains whitespace or `;`
    /// - `DuplicateKey` if an equal hash exists; the store is unchanged
    pub fn insert(&mut self, hash: &str, size_bytes: u32, flags: AssetFlags) -> CoreResult<AssetHandle> {
        if !is_valid_token(hash) {
            return Err(CoreError::invalid_argument(format!("invalid asset hash {hash:?}")));
        }
        match self.list.locate(|asset| self.order.compare(hash, &asset.hash)) {
            Position::Occupied(_) => Err(CoreError::duplicate_key(hash)),
            Position::Vacant { after } => {
                let asset = Asset {
                    hash: hash.to_owned(),
                    size_bytes,
                    flags,
                };
                self.list.insert_after(after, asset).map(AssetHandle)
            }
        }
    }

    /// Finds the asset whose hash equals `hash`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty hash, `NotFound` if absent.
    pub fn find(&self, hash: &str) -> CoreResult<AssetHandle> {
        if hash.is_empty() {
            return Err(CoreError::invalid_argument("empty asset hash"));
        }
        self.list
            .find(|asset| self.order.compare(hash, &asset.hash))
            .map(AssetHandle)
            .ok_or_else(|| CoreError::not_found(hash))
    }

    /// Returns the asset behind `handle`.
    ///
    /// # Errors
    ///
    /// `StaleHandle` if the asset was removed.
    pub fn get(&self, handle: AssetHandle) -> CoreResult<&Asset> {
        self.list.get(handle.0)
    }

    /// Returns the asset behind `handle` mutably. The hash stays read-only.
    ///
    /// # Errors
    ///
    /// `StaleHandle` if the asset was removed.
    pub fn get_mut(&mut self, handle: AssetHandle) -> CoreResult<&mut Asset> {
        self.list.get_mut(handle.0)
    }

    /// Unlinks an asset without looking at any owner.
    ///
    /// Only the registry calls this, after detaching every reference.
    pub(crate) fn remove(&mut self, handle: AssetHandle) -> CoreResult<Asset> {
        self.list.remove(handle.0)
    }

    /// Drops every asset. Only the registry calls this, after detaching
    /// every reference.
    pub(crate) fn clear(&mut self) {
        self.list.clear();
    }

    /// Returns the smallest asset.
    #[must_use]
    pub fn first(&self) -> Option<&Asset> {
        self.list.iter().next()
    }

    /// Iterates over assets in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &Asset> + '_ {
        self.list.iter()
    }

    /// Returns the number of assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns true if the store holds no assets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hashes(store: &AssetStore) -> Vec<&str> {
        store.iter().map(Asset::hash).collect()
    }

    fn sample() -> AssetStore {
        let mut store = AssetStore::new(KeyOrder::Bytewise);
        store.insert("a1", 100, AssetFlags::ENCRYPTED).unwrap();
        store.insert("z9", 50, AssetFlags::READ_ONLY).unwrap();
        store.insert("m5", 75, AssetFlags::empty()).unwrap();
        store
    }

    #[test]
    fn insert_keeps_ascending_order() {
        let store = sample();
        assert_eq!(hashes(&store), vec!["a1", "m5", "z9"]);
        assert_eq!(store.first().map(Asset::hash), Some("a1"));
    }

    #[test]
    fn insert_new_head_and_tail() {
        let mut store = sample();
        store.insert("0a", 1, AssetFlags::empty()).unwrap();
        store.insert("zz", 1, AssetFlags::empty()).unwrap();
        assert_eq!(hashes(&store), vec!["0a", "a1", "m5", "z9", "zz"]);
    }

    #[test]
    fn duplicate_insert_leaves_store_unchanged() {
        let mut store = sample();
        let err = store.insert("m5", 1, AssetFlags::ARCHIVED).unwrap_err();

        assert!(matches!(err, CoreError::DuplicateKey { ref key } if key == "m5"));
        assert_eq!(store.len(), 3);
        let handle = store.find("m5").unwrap();
        assert_eq!(store.get(handle).unwrap().size_bytes(), 75);
    }

    #[test]
    fn insert_rejects_bad_tokens() {
        let mut store = AssetStore::new(KeyOrder::Bytewise);
        for bad in ["", "has space", "semi;colon"] {
            assert!(matches!(
                store.insert(bad, 1, AssetFlags::empty()),
                Err(CoreError::InvalidArgument { .. })
            ));
        }
        assert!(store.is_empty());
    }

    #[test]
    fn bytewise_hashes_are_case_sensitive() {
        let mut store = AssetStore::new(KeyOrder::Bytewise);
        store.insert("ab", 1, AssetFlags::empty()).unwrap();
        store.insert("AB", 2, AssetFlags::empty()).unwrap();

        assert_eq!(hashes(&store), vec!["AB", "ab"]);
        assert!(store.find("Ab").unwrap_err().is_not_found());
    }

    #[test]
    fn find_errors() {
        let store = sample();
        assert!(store.find("b2").unwrap_err().is_not_found());
        assert!(matches!(store.find(""), Err(CoreError::InvalidArgument { .. })));
    }

    #[test]
    fn get_mut_edits_size_and_flags() {
        let mut store = sample();
        let handle = store.find("z9").unwrap();
        let asset = store.get_mut(handle).unwrap();
        asset.set_size_bytes(51);
        asset.set_flags(AssetFlags::ARCHIVED | AssetFlags::CORRUPTED);

        let asset = store.get(handle).unwrap();
        assert_eq!(asset.size_bytes(), 51);
        assert_eq!(asset.flags().names(), vec!["Archived", "Corrupted"]);
    }

    #[test]
    fn removed_handle_goes_stale() {
        let mut store = sample();
        let handle = store.find("m5").unwrap();
        store.remove(handle).unwrap();

        assert_eq!(hashes(&store), vec!["a1", "z9"]);
        assert!(matches!(store.get(handle), Err(CoreError::StaleHandle { .. })));
    }

    #[test]
    fn to_line_keeps_unknown_flag_bits() {
        let mut store = AssetStore::new(KeyOrder::Bytewise);
        let handle = store
            .insert("h1", 9, AssetFlags::from_bits_retain(0xF0))
            .unwrap();
        let line = store.get(handle).unwrap().to_line();
        assert_eq!(line.to_string(), "h1 9 240");
    }

    #[test]
    fn hash_bit_pairs() {
        let mut store = AssetStore::new(KeyOrder::Bytewise);
        let handle = store.insert("aa", 1, AssetFlags::empty()).unwrap();
        assert_eq!(store.get(handle).unwrap().hash_bit_pairs(), 4);
    }
}
