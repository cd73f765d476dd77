/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Bounded least-recently-used memory keyed by destination id.
//!
//! [`LruMemory`] stores up to `CAP` entries in a fixed arena and threads a
//! doubly-linked access list through it:
//!
//! ```text
//!  head (most recent)                               tail (least recent)
//!    ┌───┐  next  ┌───┐  next  ┌───┐        ┌───┐
//!    │ 4 │ ─────► │ 0 │ ─────► │ 7 │ ─ … ─► │ 2 │ ──► evicted on insert when full
//!    └───┘ ◄───── └───┘ ◄───── └───┘        └───┘
//!           prev          prev
//! ```
//!
//! A `hashbrown` index maps keys to arena slots. Removal swaps the last slot
//! into the hole and repairs its links, so the arena stays dense.
//!
//! # Invariants
//!
//! - `len() <= CAP` at all times.
//! - Reads through [`get`](LruMemory::get), [`get_mut`](LruMemory::get_mut)
//!   and [`get_or_insert_with`](LruMemory::get_or_insert_with) promote the
//!   entry to most recent; [`peek`](LruMemory::peek) does not.
//! - Inserting a new key into a full memory evicts exactly the least recent entry.

use alloc::string::String;

use hashbrown::HashMap;
use heapless::Vec as HVec;

/// Number of destinations remembered before the least recent is forgotten.
pub const DESTINATION_CAPACITY: usize = 128;

#[derive(Clone, Debug)]
struct Slot<V> {
    key: String,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Fixed-capacity LRU map from string keys to `V`.
///
/// `CAP` must be non-zero.
#[derive(Clone, Debug)]
pub struct LruMemory<V, const CAP: usize> {
    slots: HVec<Slot<V>, CAP>,
    index: HashMap<String, usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<V, const CAP: usize> Default for LruMemory<V, CAP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, const CAP: usize> LruMemory<V, CAP> {
    const NON_ZERO_CAPACITY: () = assert!(CAP > 0, "LruMemory capacity must be non-zero");

    /// Empty memory.
    pub fn new() -> Self {
        let () = Self::NON_ZERO_CAPACITY;
        Self {
            slots: HVec::new(),
            index: HashMap::new(),
            head: None,
            tail: None,
        }
    }

    /// Maximum number of entries.
    pub const fn capacity(&self) -> usize {
        CAP
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// `true` when nothing is remembered.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// `true` if `key` is present. Does not affect recency.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Look up `key` without touching recency.
    pub fn peek(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&i| &self.slots[i].value)
    }

    /// Look up `key` and mark it most recently used.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let i = *self.index.get(key)?;
        self.touch(i);
        Some(&self.slots[i].value)
    }

    /// Mutable lookup; marks `key` most recently used.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let i = *self.index.get(key)?;
        self.touch(i);
        Some(&mut self.slots[i].value)
    }

    /// Return the entry for `key`, creating it with `make` if absent.
    ///
    /// Creating an entry in a full memory evicts the least recent one.
    pub fn get_or_insert_with(&mut self, key: &str, make: impl FnOnce() -> V) -> &mut V {
        let i = match self.index.get(key) {
            Some(&i) => {
                self.touch(i);
                i
            }
            None => self.insert_new(String::from(key), make()).0,
        };
        &mut self.slots[i].value
    }

    /// Insert or replace `key`, marking it most recently used.
    ///
    /// Returns the entry evicted to make room, if any. Replacing an existing
    /// key never evicts.
    pub fn insert(&mut self, key: &str, value: V) -> Option<(String, V)> {
        if let Some(&i) = self.index.get(key) {
            self.slots[i].value = value;
            self.touch(i);
            return None;
        }
        self.insert_new(String::from(key), value).1
    }

    /// Remove `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let i = *self.index.get(key)?;
        Some(self.remove_at(i).value)
    }

    /// Forget every entry.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
        self.head = None;
        self.tail = None;
    }

    /// Key that the next insert into a full memory would evict.
    pub fn least_recent(&self) -> Option<&str> {
        self.tail.map(|i| self.slots[i].key.as_str())
    }

    /// Entries from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        let mut cursor = self.head;
        core::iter::from_fn(move || {
            let slot = &self.slots[cursor?];
            cursor = slot.next;
            Some((slot.key.as_str(), &slot.value))
        })
    }

    // ── Arena bookkeeping ──────────────────────────────────────────────────

    fn insert_new(&mut self, key: String, value: V) -> (usize, Option<(String, V)>) {
        let evicted = if self.slots.is_full() {
            self.tail.map(|t| {
                let slot = self.remove_at(t);
                (slot.key, slot.value)
            })
        } else {
            None
        };

        let i = self.slots.len();
        // Never full here: CAP > 0 and the tail was just evicted.
        let pushed = self.slots.push(Slot {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        });
        debug_assert!(pushed.is_ok(), "arena full after eviction");
        self.index.insert(key, i);
        self.push_front(i);
        (i, evicted)
    }

    fn remove_at(&mut self, i: usize) -> Slot<V> {
        self.unlink(i);
        let last = self.slots.len() - 1;
        let slot = self.slots.swap_remove(i);
        self.index.remove(&slot.key);

        if i != last {
            // Slot `last` now lives at `i`; repoint its neighbours and index entry.
            let (prev, next) = (self.slots[i].prev, self.slots[i].next);
            match prev {
                Some(p) => self.slots[p].next = Some(i),
                None => self.head = Some(i),
            }
            match next {
                Some(n) => self.slots[n].prev = Some(i),
                None => self.tail = Some(i),
            }
            if let Some(ix) = self.index.get_mut(&self.slots[i].key) {
                *ix = i;
            }
        }
        slot
    }

    fn unlink(&mut self, i: usize) {
        let (prev, next) = (self.slots[i].prev, self.slots[i].next);
        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n].prev = prev,
            None => self.tail = prev,
        }
        self.slots[i].prev = None;
        self.slots[i].next = None;
    }

    fn push_front(&mut self, i: usize) {
        self.slots[i].prev = None;
        self.slots[i].next = self.head;
        match self.head {
            Some(h) => self.slots[h].prev = Some(i),
            None => self.tail = Some(i),
        }
        self.head = Some(i);
    }

    fn touch(&mut self, i: usize) {
        if self.head != Some(i) {
            self.unlink(i);
            self.push_front(i);
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::vec::Vec;

    fn keys<V, const CAP: usize>(m: &LruMemory<V, CAP>) -> Vec<&str> {
        m.iter().map(|(k, _)| k).collect()
    }

    #[test]
    fn test_insert_and_recency_order() {
        let mut m: LruMemory<u32, 4> = LruMemory::new();
        m.insert("a", 1);
        m.insert("b", 2);
        m.insert("c", 3);
        assert_eq!(keys(&m), ["c", "b", "a"]);
        assert_eq!(m.least_recent(), Some("a"));

        assert_eq!(m.get("a"), Some(&1));
        assert_eq!(keys(&m), ["a", "c", "b"]);
    }

    #[test]
    fn test_peek_does_not_touch() {
        let mut m: LruMemory<u32, 4> = LruMemory::new();
        m.insert("a", 1);
        m.insert("b", 2);
        assert_eq!(m.peek("a"), Some(&1));
        assert_eq!(m.least_recent(), Some("a"));
    }

    #[test]
    fn test_full_insert_evicts_least_recent() {
        let mut m: LruMemory<u32, 3> = LruMemory::new();
        m.insert("a", 1);
        m.insert("b", 2);
        m.insert("c", 3);
        m.get("a");

        let evicted = m.insert("d", 4);
        assert_eq!(evicted, Some((String::from("b"), 2)));
        assert_eq!(m.len(), 3);
        assert!(!m.contains_key("b"));
        assert_eq!(keys(&m), ["d", "a", "c"]);
    }

    #[test]
    fn test_single_slot_keeps_evicting() {
        let mut m: LruMemory<u32, 1> = LruMemory::new();
        assert_eq!(m.insert("a", 1), None);
        for (i, key) in ["b", "c", "d"].into_iter().enumerate() {
            assert!(m.insert(key, i as u32).is_some());
            assert_eq!(m.len(), 1);
            assert_eq!(m.least_recent(), Some(key));
        }
    }

    #[test]
    fn test_replace_existing_never_evicts() {
        let mut m: LruMemory<u32, 2> = LruMemory::new();
        m.insert("a", 1);
        m.insert("b", 2);
        assert_eq!(m.insert("a", 10), None);
        assert_eq!(m.len(), 2);
        assert_eq!(m.peek("a"), Some(&10));
        assert_eq!(m.least_recent(), Some("b"));
    }

    #[test]
    fn test_get_or_insert_with_creates_once() {
        let mut m: LruMemory<u32, 2> = LruMemory::new();
        *m.get_or_insert_with("a", || 5) += 1;
        *m.get_or_insert_with("a", || 100) += 1;
        assert_eq!(m.peek("a"), Some(&7));

        m.get_or_insert_with("b", || 0);
        m.get_or_insert_with("c", || 0);
        assert!(!m.contains_key("a"));
    }

    #[test]
    fn test_remove_repairs_links() {
        let mut m: LruMemory<u32, 8> = LruMemory::new();
        for (i, k) in ["a", "b", "c", "d", "e"].iter().enumerate() {
            m.insert(k, i as u32);
        }
        // Remove from the middle, the head and the tail in turn.
        assert_eq!(m.remove("c"), Some(2));
        assert_eq!(keys(&m), ["e", "d", "b", "a"]);
        assert_eq!(m.remove("e"), Some(4));
        assert_eq!(keys(&m), ["d", "b", "a"]);
        assert_eq!(m.remove("a"), Some(0));
        assert_eq!(keys(&m), ["d", "b"]);
        assert_eq!(m.least_recent(), Some("b"));
        assert_eq!(m.remove("zzz"), None);

        // Moved slots stay addressable.
        assert_eq!(m.get("d"), Some(&3));
        assert_eq!(m.get("b"), Some(&1));
        assert_eq!(keys(&m), ["b", "d"]);
    }

    #[test]
    fn test_clear_empties() {
        let mut m: LruMemory<u32, 4> = LruMemory::new();
        m.insert("a", 1);
        m.clear();
        assert!(m.is_empty());
        assert_eq!(m.least_recent(), None);
        assert_eq!(keys(&m), Vec::<&str>::new());
        m.insert("b", 2);
        assert_eq!(keys(&m), ["b"]);
    }

    #[test]
    fn test_destination_capacity_bound() {
        let mut m: LruMemory<u32, DESTINATION_CAPACITY> = LruMemory::new();
        for i in 0..DESTINATION_CAPACITY {
            assert_eq!(m.insert(&format!("srv-{i}"), i as u32), None);
        }
        assert_eq!(m.len(), DESTINATION_CAPACITY);

        let evicted = m.insert("srv-new", 0);
        assert_eq!(evicted.map(|(k, _)| k), Some(String::from("srv-0")));
        assert_eq!(m.len(), DESTINATION_CAPACITY);
        assert!(m.contains_key("srv-new"));
    }
}
