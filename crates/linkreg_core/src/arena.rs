//! Index-stable slot arena with generational handles.
//!
//! Freed slots go onto a free list and are reused by later inserts. Each
//! slot carries a generation counter that is bumped on every insert and
//! remove, so a handle to a removed value can never reach whatever
//! reuses its slot.

use crate::error::{CoreError, CoreResult};

/// Handle to a value stored in an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId {
    index: u32,
    generation: u32,
}

impl SlotId {
    /// Returns the slot index.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Returns the generation the handle was issued at.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    fn stale(self) -> CoreError {
        CoreError::StaleHandle {
            index: self.index,
            generation: self.generation,
        }
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    /// Odd while occupied, even while free.
    generation: u32,
    value: Option<T>,
}

/// A vector of slots plus a free list.
#[derive(Debug, Clone)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<u32>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    /// Creates an empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Stores a value and returns its handle.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::AllocationFailure`] once every `u32` slot index
    /// is in use.
    pub fn insert(&mut self, value: T) -> CoreResult<SlotId> {
        let id = if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.generation = slot.generation.wrapping_add(1);
            slot.value = Some(value);
            SlotId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = u32::try_from(self.slots.len()).map_err(|_| CoreError::AllocationFailure {
                what: "arena slot",
            })?;
            self.slots.push(Slot {
                generation: 1,
                value: Some(value),
            });
            SlotId {
                index,
                generation: 1,
            }
        };
        self.len += 1;
        Ok(id)
    }

    /// Removes and returns the value behind `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::StaleHandle`] if the slot was already freed.
    pub fn remove(&mut self, id: SlotId) -> CoreResult<T> {
        let slot = self
            .slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .ok_or_else(|| id.stale())?;
        let value = slot.value.take().ok_or_else(|| id.stale())?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(id.index);
        self.len -= 1;
        Ok(value)
    }

    /// Returns the value behind `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::StaleHandle`] if the handle no longer matches.
    pub fn get(&self, id: SlotId) -> CoreResult<&T> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_ref())
            .ok_or_else(|| id.stale())
    }

    /// Returns the value behind `id` mutably.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::StaleHandle`] if the handle no longer matches.
    pub fn get_mut(&mut self, id: SlotId) -> CoreResult<&mut T> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.value.as_mut())
            .ok_or_else(|| id.stale())
    }

    /// Checks whether `id` still refers to a live value.
    #[must_use]
    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_ok()
    }

    /// Drops every value. Outstanding handles all become stale.
    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                // Index fits: it was issued by `insert`.
                self.free_list.push(index as u32);
            }
        }
        self.len = 0;
    }

    /// Mutable access to every live value, in slot order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.slots.iter_mut().filter_map(|slot| slot.value.as_mut())
    }

    /// Returns the number of live values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no values are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots ever allocated, live or free.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}
