//! Ordered linked lists over an [`Arena`](crate::arena::Arena).
//!
//! Links are [`SlotId`]s rather than pointers, so unlinking a node can never
//! leave a neighbour pointing at freed memory; a stale link simply fails to
//! resolve.
//!
//! Both lists are ordered by the caller. Neither compares elements itself:
//! [`SinglyList::locate`] and [`DoublyList::locate`] take a probe that
//! compares the sought key against each element, which is how stores inject
//! their comparator.

mod doubly;
mod singly;

pub use doubly::{DoublyList, Entries as DoublyEntries};
pub use singly::{Entries as SinglyEntries, SinglyList};

use crate::arena::SlotId;

/// Result of walking a list for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// An element with an equal key exists.
    Occupied(SlotId),
    /// No equal element; a new one belongs right after `after`, or at the
    /// head when `after` is `None`.
    Vacant {
        /// The last element ordered before the key.
        after: Option<SlotId>,
    },
}
