//! Singly linked list.

use super::Position;
use crate::arena::{Arena, SlotId};
use crate::error::{CoreError, CoreResult};
use std::cmp::Ordering;

#[derive(Debug, Clone)]
struct Node<T> {
    value: T,
    next: Option<SlotId>,
}

/// A singly linked list whose nodes live in an arena.
#[derive(Debug, Clone)]
pub struct SinglyList<T> {
    nodes: Arena<Node<T>>,
    head: Option<SlotId>,
}

impl<T> Default for SinglyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SinglyList<T> {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            head: None,
        }
    }

    /// Walks from the head until `probe` stops returning `Greater`.
    ///
    /// `probe` compares the sought key against an element: `Less` means the
    /// key sorts before it, `Equal` is a match.
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
    ///
    /// Scans the whole list; it does not rely on ordering.
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
        let id = self.nodes.insert(Node { value, next })?;
        match after {
            Some(prev) => self.nodes.get_mut(prev)?.next = Some(id),
            None => self.head = Some(id),
        }
        Ok(id)
    }

    /// Unlinks the node `id` and returns its value.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::StaleHandle`] if `id` is not in the list.
    pub fn remove(&mut self, id: SlotId) -> CoreResult<T> {
        let next = self.nodes.get(id)?.next;
        if self.head == Some(id) {
            self.head = next;
        } else {
            let prev = self
                .predecessor(id)
                .ok_or(CoreError::StaleHandle {
                    index: id.index(),
                    generation: id.generation(),
                })?;
            self.nodes.get_mut(prev)?.next = next;
        }
        Ok(self.nodes.remove(id)?.value)
    }

    fn predecessor(&self, id: SlotId) -> Option<SlotId> {
        let mut cursor = self.head;
        while let Some(current) = cursor {
            let next = self.nodes.get(current).ok()?.next;
            if next == Some(id) {
                return Some(current);
            }
            cursor = next;
        }
        None
    }

    /// Returns the element behind `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::StaleHandle`] if the handle no longer matches.
    pub fn get(&self, id: SlotId) -> CoreResult<&T> {
        self.nodes.get(id).map(|node| &node.value)
    }

    /// Returns the element behind `id` mutably.
    ///
    /// Callers must not change whatever the list is ordered by.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::StaleHandle`] if the handle no longer matches.
    pub fn get_mut(&mut self, id: SlotId) -> CoreResult<&mut T> {
        self.nodes.get_mut(id).map(|node| &mut node.value)
    }

    /// Returns the head element's handle.
    #[must_use]
    pub fn head(&self) -> Option<SlotId> {
        self.head
    }

    /// Drops every element.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
    }

    /// Iterates over handles and elements from head to tail.
    pub fn entries(&self) -> Entries<'_, T> {
        Entries {
            list: self,
            cursor: self.head,
        }
    }

    /// Iterates over elements from head to tail.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
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

/// Iterator over a [`SinglyList`] from head to tail.
pub struct Entries<'a, T> {
    list: &'a SinglyList<T>,
    cursor: Option<SlotId>,
}

impl<'a, T> Iterator for Entries<'a, T> {
    type Item = (SlotId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let node = self.list.nodes.get(id).ok()?;
        self.cursor = node.next;
        Some((id, &node.value))
    }
}
