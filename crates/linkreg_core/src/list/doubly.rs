//! Doubly linked list with head and tail.

use super::Position;
use crate::arena::{Arena, SlotId};
use crate::error::CoreResult;
use std::cmp::Ordering;

#[derive(Debug, Clone)]
struct Node<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// A doubly linked list whose nodes live in an arena.
///
/// Unlinking is O(1) given a handle: both neighbours are patched and
/// head/tail move when the node sat at either end.
#[derive(Debug, Clone)]
pub struct DoublyList<T> {
    nodes: Arena<Node<T>>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
}

impl<T> Default for DoublyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DoublyList<T> {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            head: None,
            tail: None,
        }
    }

    /// Walks from the head until `probe` stops returning `Greater`.
    ///
    /// Same contract as [`SinglyList::locate`](super::SinglyList::locate).
    pub fn locate(&self, probe: impl Fn(&T) -> Ordering) -> Position {
        let mut after = None;
        for (id, value) in self.entries() {
            match probe(value) {
                Ordering::Less => break,
                Ordering::Equal => return Position::Occupied(id),
                Ordering::Greater => after = Some(id),
            }
        }
        Position::Vacant { after }
    }

    /// Returns the first element for which `probe` is `Equal`.
    pub fn find(&self, probe: impl Fn(&T) -> Ordering) -> Option<SlotId> {
        self.entries()
            .find(|(_, value)| probe(value) == Ordering::Equal)
            .map(|(id, _)| id)
    }

    /// Splices `value` in after `after`, or at the head for `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if `after` is stale or the arena is full.
    pub fn insert_after(&mut self, after: Option<SlotId>, value: T) -> CoreResult<SlotId> {
        let next = match after {
            Some(prev) => self.nodes.get(prev)?.next,
            None => self.head,
        };
        let id = self.nodes.insert(Node {
            value,
            prev: after,
            next,
        })?;

        match after {
            Some(prev) => self.nodes.get_mut(prev)?.next = Some(id),
            None => self.head = Some(id),
        }
        match next {
            Some(next) => self.nodes.get_mut(next)?.prev = Some(id),
            None => self.tail = Some(id),
        }
        Ok(id)
    }

    /// Appends `value` at the tail.
    ///
    /// # Errors
    ///
    /// Returns an error if the arena is full.
    pub fn push_back(&mut self, value: T) -> CoreResult<SlotId> {
        self.insert_after(self.tail, value)
    }

    /// Unlinks the node `id` and returns its value.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::StaleHandle`](crate::CoreError::StaleHandle) if
    /// `id` is not in the list.
    pub fn remove(&mut self, id: SlotId) -> CoreResult<T> {
        let node = self.nodes.remove(id)?;
        match node.prev {
            Some(prev) => self.nodes.get_mut(prev)?.next = node.next,
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.nodes.get_mut(next)?.prev = node.prev,
            None => self.tail = node.prev,
        }
        Ok(node.value)
    }

    /// Returns the element behind `id`.
    ///
    /// # Errors
    ///
    /// Returns a stale handle error if the handle no longer matches.
    pub fn get(&self, id: SlotId) -> CoreResult<&T> {
        self.nodes.get(id).map(|node| &node.value)
    }

    /// Returns the element behind `id` mutably.
    ///
    /// Callers must not change whatever the list is ordered by.
    ///
    /// # Errors
    ///
    /// Returns a stale handle error if the handle no longer matches.
    pub fn get_mut(&mut self, id: SlotId) -> CoreResult<&mut T> {
        self.nodes.get_mut(id).map(|node| &mut node.value)
    }

    /// Returns the head element's handle.
    #[must_use]
    pub fn head(&self) -> Option<SlotId> {
        self.head
    }

    /// Returns the tail element's handle.
    #[must_use]
    pub fn tail(&self) -> Option<SlotId> {
        self.tail
    }

    /// Drops every element.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }

    /// Iterates over handles and elements; reversible.
    pub fn entries(&self) -> Entries<'_, T> {
        Entries {
            list: self,
            front: self.head,
            back: self.tail,
            remaining: self.nodes.len(),
        }
    }

    /// Iterates over elements from head to tail; reversible.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + '_ {
        self.entries().map(|(_, value)| value)
    }

    /// Mutable access to every element, in no particular order.
    ///
    /// Callers must not change whatever the list is ordered by.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.nodes.values_mut().map(|node| &mut node.value)
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Double-ended iterator over a [`DoublyList`].
pub struct Entries<'a, T> {
    list: &'a DoublyList<T>,
    front: Option<SlotId>,
    back: Option<SlotId>,
    remaining: usize,
}

impl<'a, T> Iterator for Entries<'a, T> {
    type Item = (SlotId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        let node = self.list.nodes.get(id).ok()?;
        self.front = node.next;
        self.remaining -= 1;
        Some((id, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Entries<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        let node = self.list.nodes.get(id).ok()?;
        self.back = node.prev;
        self.remaining -= 1;
        Some((id, &node.value))
    }
}

impl<T> ExactSizeIterator for Entries<'_, T> {}
