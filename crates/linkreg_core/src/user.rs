//! Users and the ordered user store.

use crate::arena::SlotId;
use crate::compare::{KeyComparator, KeyOrder};
use crate::error::{CoreError, CoreResult};
use crate::flags::count_01_pairs_in_str;
use crate::list::{DoublyList, Position};
use crate::refs::RefList;
use linkreg_codec::{is_valid_token, UserLine};

/// A user and the asset hashes it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    username: String,
    user_id: u32,
    owned: RefList,
}

impl User {
    /// Returns the username as it was inserted.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the numeric id.
    #[must_use]
    pub fn user_id(&self) -> u32 {
        self.user_id
    }

    /// Iterates over owned asset hashes in attachment order.
    pub fn owned(&self) -> impl Iterator<Item = &str> + '_ {
        self.owned.iter()
    }

    /// Returns the number of owned assets.
    #[must_use]
    pub fn owned_count(&self) -> usize {
        self.owned.len()
    }

    /// Checks whether the user holds a reference to `hash`.
    #[must_use]
    pub fn owns(&self, hash: &str) -> bool {
        self.owned.contains(hash)
    }

    /// Counts 01 bit pairs across the username bytes.
    #[must_use]
    pub fn name_bit_pairs(&self) -> u32 {
        count_01_pairs_in_str(&self.username)
    }

    /// Returns the line this user is saved as.
    #[must_use]
    pub fn to_line(&self) -> UserLine {
        UserLine::new(&self.username, self.user_id, self.owned.iter())
    }

    /// `hash` must be the canonical key of an existing asset.
    pub(crate) fn attach(&mut self, hash: &str) -> CoreResult<()> {
        if self.owned.attach(hash) {
            Ok(())
        } else {
            Err(CoreError::duplicate_reference(&self.username, hash))
        }
    }

    pub(crate) fn detach(&mut self, hash: &str) -> CoreResult<()> {
        if self.owned.detach(hash) {
            Ok(())
        } else {
            Err(CoreError::not_found(hash))
        }
    }

    pub(crate) fn clear_owned(&mut self) -> usize {
        self.owned.clear()
    }
}

/// Handle to a user in a [`UserStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserHandle(SlotId);

/// Users kept in ascending username order, unique under the store's
/// comparator, walkable in both directions.
#[derive(Debug, Clone, Default)]
pub struct UserStore {
    list: DoublyList<User>,
    order: KeyOrder,
}

impl UserStore {
    /// Creates an empty store ordered by `order`.
    #[must_use]
    pub const fn new(order: KeyOrder) -> Self {
        Self {
            list: DoublyList::new(),
            order,
        }
    }

    /// Returns the comparator.
    #[must_use]
    pub fn order(&self) -> KeyOrder {
        self.order
    }

    /// Inserts a user with no owned assets.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `username` is empty or contains whitespace or `;`
    /// - `DuplicateKey` if an equal username exists; the store is unchanged
    pub fn insert(&mut self, username: &str, user_id: u32) -> CoreResult<UserHandle> {
        if !is_valid_token(username) {
            return Err(CoreError::invalid_argument(format!(
                "invalid username {username:?}"
            )));
        }
        match self
            .list
            .locate(|user| self.order.compare(username, &user.username))
        {
            Position::Occupied(_) => Err(CoreError::duplicate_key(username)),
            Position::Vacant { after } => {
                let user = User {
                    username: username.to_owned(),
                    user_id,
                    owned: RefList::new(),
                };
                self.list.insert_after(after, user).map(UserHandle)
            }
        }
    }

    /// Finds the user whose name equals `username` under the comparator.
    ///
    /// # Errors
    ///
    /// `EmptyCollection` on an empty store, `InvalidArgument` for an empty
    /// name, `NotFound` if absent.
    pub fn find(&self, username: &str) -> CoreResult<UserHandle> {
        if self.list.is_empty() {
            return Err(CoreError::EmptyCollection);
        }
        if username.is_empty() {
            return Err(CoreError::invalid_argument("empty username"));
        }
        self.list
            .find(|user| self.order.compare(username, &user.username))
            .map(UserHandle)
            .ok_or_else(|| CoreError::not_found(username))
    }

    /// Returns the user behind `handle`.
    ///
    /// # Errors
    ///
    /// `StaleHandle` if the user was deleted.
    pub fn get(&self, handle: UserHandle) -> CoreResult<&User> {
        self.list.get(handle.0)
    }

    pub(crate) fn get_mut(&mut self, handle: UserHandle) -> CoreResult<&mut User> {
        self.list.get_mut(handle.0)
    }

    /// Unlinks a user and drops its reference list. Assets are untouched.
    ///
    /// # Errors
    ///
    /// Same as [`UserStore::find`].
    pub fn delete(&mut self, username: &str) -> CoreResult<User> {
        let handle = self.find(username)?;
        let mut user = self.list.remove(handle.0)?;
        user.clear_owned();
        Ok(user)
    }

    /// Drops every user. Assets are untouched.
    pub fn clear(&mut self) {
        self.list.clear();
    }

    /// Removes `hash` from every user that holds it and returns how many
    /// references were dropped.
    pub(crate) fn detach_everywhere(&mut self, hash: &str) -> usize {
        self.list
            .values_mut()
            .map(|user| usize::from(user.owned.detach(hash)))
            .sum()
    }

    /// Drops every reference of every user.
    pub(crate) fn clear_all_references(&mut self) -> usize {
        self.list.values_mut().map(User::clear_owned).sum()
    }

    /// Returns the smallest user.
    #[must_use]
    pub fn first(&self) -> Option<&User> {
        self.list.iter().next()
    }

    /// Returns the largest user.
    #[must_use]
    pub fn last(&self) -> Option<&User> {
        self.list.iter().next_back()
    }

    /// Iterates over users in ascending order; `.rev()` walks backwards.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &User> + '_ {
        self.list.iter()
    }

    /// Returns the number of users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns true if the store holds no users.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}
