//! Insertion-ordered open-addressing hash map with tombstone deletion.
//!
//! Buckets live in one flat array probed linearly; occupied buckets are also
//! threaded into a doubly linked list (by index) that records insertion order.
//! Removal leaves a tombstone so probe chains of other keys stay intact.
#![forbid(unsafe_code)]

use std::fmt;
use std::hash::{BuildHasher, BuildHasherDefault, Hash};

use rustc_hash::FxHasher;

pub type FxBuildHasher = BuildHasherDefault<FxHasher>;

/// Capacity of the first table and the floor for every regrowth.
pub const MIN_CAPACITY: usize = 16;
/// A rehash sizes the table to at least this many buckets per live entry.
pub const GROWTH_FACTOR: usize = 16;

/// Handle to a bucket. Valid until the bucket is removed or the next insert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BucketId(usize);

impl BucketId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Result of probing for a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Probe {
    /// The key is stored in this bucket.
    Occupied(BucketId),
    /// The key is absent; this is where it would be placed.
    Vacant(BucketId),
}

enum Slot<K, V> {
    Empty,
    Tombstone,
    Occupied(K, V),
}

struct Bucket<K, V> {
    prev: Option<usize>,
    next: Option<usize>,
    slot: Slot<K, V>,
}

impl<K, V> Bucket<K, V> {
    const fn empty() -> Self {
        Self {
            prev: None,
            next: None,
            slot: Slot::Empty,
        }
    }
}

pub struct LinkedHashList<K, V, S = FxBuildHasher> {
    buckets: Vec<Bucket<K, V>>,
    used: usize,
    tombstones: usize,
    first: Option<usize>,
    last: Option<usize>,
    hash_builder: S,
}

impl<K, V> LinkedHashList<K, V, FxBuildHasher> {
    pub fn new() -> Self {
        Self::with_hasher(FxBuildHasher::default())
    }
}

impl<K, V, S: Default> Default for LinkedHashList<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> LinkedHashList<K, V, S> {
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            buckets: Vec::new(),
            used: 0,
            tombstones: 0,
            first: None,
            last: None,
            hash_builder,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.used
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// `(occupied + tombstones) / capacity`, or 0 for an unallocated table.
    pub fn load_factor(&self) -> f32 {
        if self.buckets.is_empty() {
            0.0
        } else {
            (self.used + self.tombstones) as f32 / self.buckets.len() as f32
        }
    }

    /// Oldest live entry.
    #[inline]
    pub fn first(&self) -> Option<BucketId> {
        self.first.map(BucketId)
    }

    /// Newest live entry.
    #[inline]
    pub fn last(&self) -> Option<BucketId> {
        self.last.map(BucketId)
    }

    pub fn next(&self, id: BucketId) -> Option<BucketId> {
        self.occupied(id.0).and_then(|b| b.next).map(BucketId)
    }

    pub fn prev(&self, id: BucketId) -> Option<BucketId> {
        self.occupied(id.0).and_then(|b| b.prev).map(BucketId)
    }

    pub fn key(&self, id: BucketId) -> Option<&K> {
        match self.buckets.get(id.0).map(|b| &b.slot) {
            Some(Slot::Occupied(k, _)) => Some(k),
            _ => None,
        }
    }

    pub fn value(&self, id: BucketId) -> Option<&V> {
        match self.buckets.get(id.0).map(|b| &b.slot) {
            Some(Slot::Occupied(_, v)) => Some(v),
            _ => None,
        }
    }

    pub fn value_mut(&mut self, id: BucketId) -> Option<&mut V> {
        match self.buckets.get_mut(id.0).map(|b| &mut b.slot) {
            Some(Slot::Occupied(_, v)) => Some(v),
            _ => None,
        }
    }

    pub fn entry(&self, id: BucketId) -> Option<(&K, &V)> {
        match self.buckets.get(id.0).map(|b| &b.slot) {
            Some(Slot::Occupied(k, v)) => Some((k, v)),
            _ => None,
        }
    }

    /// Live entries in insertion order.
    pub fn iter(&self) -> Iter<'_, K, V, S> {
        Iter {
            list: self,
            cur: self.first,
            remaining: self.used,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Walks from the oldest entry and returns the first one matching `pred`.
    pub fn find_first<F>(&self, mut pred: F) -> Option<BucketId>
    where
        F: FnMut(&K, &V) -> bool,
    {
        let mut cur = self.first;
        while let Some(i) = cur {
            let b = &self.buckets[i];
            if let Slot::Occupied(k, v) = &b.slot {
                if pred(k, v) {
                    return Some(BucketId(i));
                }
            }
            cur = b.next;
        }
        None
    }

    /// Tombstones `id` and unlinks it. Returns the owned entry, or `None` if
    /// the bucket was not occupied.
    pub fn remove(&mut self, id: BucketId) -> Option<(K, V)> {
        let bucket = self.buckets.get_mut(id.0)?;
        if !matches!(bucket.slot, Slot::Occupied(..)) {
            return None;
        }
        let Slot::Occupied(k, v) = std::mem::replace(&mut bucket.slot, Slot::Tombstone) else {
            return None;
        };
        let (prev, next) = (bucket.prev.take(), bucket.next.take());
        match prev {
            Some(p) => self.buckets[p].next = next,
            None => self.first = next,
        }
        match next {
            Some(n) => self.buckets[n].prev = prev,
            None => self.last = prev,
        }
        self.used -= 1;
        self.tombstones += 1;
        Some((k, v))
    }

    /// Drops every entry but keeps the allocated buckets.
    pub fn clear(&mut self) {
        for b in &mut self.buckets {
            *b = Bucket::empty();
        }
        self.used = 0;
        self.tombstones = 0;
        self.first = None;
        self.last = None;
    }

    fn occupied(&self, i: usize) -> Option<&Bucket<K, V>> {
        self.buckets
            .get(i)
            .filter(|b| matches!(b.slot, Slot::Occupied(..)))
    }

    fn link_back(&mut self, i: usize) {
        self.buckets[i].prev = self.last;
        self.buckets[i].next = None;
        match self.last {
            Some(l) => self.buckets[l].next = Some(i),
            None => self.first = Some(i),
        }
        self.last = Some(i);
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LinkedHashList<K, V, S> {
    /// Linear probe from the key's home bucket. Returns the matching occupied
    /// bucket, else the first tombstone passed, else the first empty bucket.
    pub fn probe(&self, key: &K) -> Option<Probe> {
        Self::probe_in(&self.hash_builder, &self.buckets, key)
    }

    /// Lookup that rejects vacant results.
    pub fn get_checked(&self, key: &K) -> Option<BucketId> {
        match self.probe(key) {
            Some(Probe::Occupied(id)) => Some(id),
            _ => None,
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.get_checked(key).and_then(|id| self.value(id))
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.get_checked(key)?;
        self.value_mut(id)
    }

    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get_checked(key).is_some()
    }

    /// Inserts at the tail of the insertion order. An existing key keeps its
    /// position and has its value replaced.
    pub fn insert(&mut self, key: K, value: V) -> BucketId {
        let cap = self.buckets.len();
        if self.used + self.tombstones + 1 > cap * 3 / 4 {
            self.rehash(Self::regrow_capacity(self.used));
        }
        match self.probe(&key) {
            Some(Probe::Occupied(id)) => {
                self.buckets[id.0].slot = Slot::Occupied(key, value);
                id
            }
            Some(Probe::Vacant(id)) => {
                self.occupy(id.0, key, value);
                id
            }
            None => {
                self.rehash(self.buckets.len().max(MIN_CAPACITY) * 2);
                self.insert(key, value)
            }
        }
    }

    pub fn remove_key(&mut self, key: &K) -> Option<V> {
        let id = self.get_checked(key)?;
        self.remove(id).map(|(_, v)| v)
    }

    fn regrow_capacity(used: usize) -> usize {
        let mut total = MIN_CAPACITY;
        while total < used * GROWTH_FACTOR {
            total *= 2;
        }
        total
    }

    fn probe_in(hash_builder: &S, buckets: &[Bucket<K, V>], key: &K) -> Option<Probe> {
        let cap = buckets.len();
        if cap == 0 {
            return None;
        }
        let mut index = (hash_builder.hash_one(key) as usize) % cap;
        let mut tombstone = None;
        for _ in 0..cap {
            match &buckets[index].slot {
                Slot::Tombstone => {
                    if tombstone.is_none() {
                        tombstone = Some(index);
                    }
                }
                Slot::Empty => {
                    return Some(Probe::Vacant(BucketId(tombstone.unwrap_or(index))));
                }
                Slot::Occupied(k, _) if k == key => {
                    return Some(Probe::Occupied(BucketId(index)));
                }
                Slot::Occupied(..) => {}
            }
            index = (index + 1) % cap;
        }
        tombstone.map(|i| Probe::Vacant(BucketId(i)))
    }

    fn occupy(&mut self, i: usize, key: K, value: V) {
        if matches!(self.buckets[i].slot, Slot::Tombstone) {
            self.tombstones -= 1;
        }
        self.buckets[i].slot = Slot::Occupied(key, value);
        self.link_back(i);
        self.used += 1;
    }

    /// Moves every live entry into a fresh table, oldest first, so the
    /// insertion order survives and all tombstones are dropped.
    fn rehash(&mut self, new_capacity: usize) {
        let mut old = std::mem::take(&mut self.buckets);
        self.buckets.resize_with(new_capacity, Bucket::empty);
        let mut cur = self.first;
        self.used = 0;
        self.tombstones = 0;
        self.first = None;
        self.last = None;
        while let Some(i) = cur {
            cur = old[i].next;
            if let Slot::Occupied(k, v) = std::mem::replace(&mut old[i].slot, Slot::Empty) {
                if let Some(Probe::Vacant(id)) =
                    Self::probe_in(&self.hash_builder, &self.buckets, &k)
                {
                    self.occupy(id.0, k, v);
                }
            }
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for LinkedHashList<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

pub struct Iter<'a, K, V, S> {
    list: &'a LinkedHashList<K, V, S>,
    cur: Option<usize>,
    remaining: usize,
}

impl<'a, K, V, S> Iterator for Iter<'a, K, V, S> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.cur?;
        let b = &self.list.buckets[i];
        self.cur = b.next;
        self.remaining = self.remaining.saturating_sub(1);
        match &b.slot {
            Slot::Occupied(k, v) => Some((k, v)),
            _ => None,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V, S> IntoIterator for &'a LinkedHashList<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_insert_allocates_min_capacity() {
        let mut m: LinkedHashList<(i32, i32), u32> = LinkedHashList::new();
        assert_eq!(m.capacity(), 0);
        assert!(m.probe(&(0, 0)).is_none());
        m.insert((0, 0), 7);
        assert_eq!(m.capacity(), MIN_CAPACITY);
        assert_eq!(m.get(&(0, 0)), Some(&7));
    }

    #[test]
    fn remove_fixes_endpoints() {
        let mut m: LinkedHashList<i32, i32> = LinkedHashList::new();
        let a = m.insert(1, 10);
        m.insert(2, 20);
        m.insert(3, 30);
        assert_eq!(m.remove(a), Some((1, 10)));
        assert_eq!(m.key(m.first().unwrap()), Some(&2));
        let last = m.last().unwrap();
        assert_eq!(m.remove(last), Some((3, 30)));
        assert_eq!(m.key(m.last().unwrap()), Some(&2));
        assert_eq!(m.first(), m.last());
        assert_eq!(m.tombstones(), 2);
        // Removing an already tombstoned bucket is a no-op.
        assert_eq!(m.remove(a), None);
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn tombstone_is_reused_for_reinsert() {
        let mut m: LinkedHashList<i32, i32> = LinkedHashList::new();
        let id = m.insert(5, 1);
        m.remove(id);
        assert_eq!(m.tombstones(), 1);
        assert_eq!(m.probe(&5), Some(Probe::Vacant(id)));
        let id2 = m.insert(5, 2);
        assert_eq!(id, id2);
        assert_eq!(m.tombstones(), 0);
        assert_eq!(m.get(&5), Some(&2));
    }

    #[test]
    fn existing_key_keeps_order_position() {
        let mut m: LinkedHashList<&str, i32> = LinkedHashList::new();
        m.insert("a", 1);
        m.insert("b", 2);
        m.insert("a", 3);
        let got: Vec<_> = m.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(got, vec![("a", 3), ("b", 2)]);
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn rehash_grows_to_sixteen_times_live_entries() {
        let mut m: LinkedHashList<u32, u32> = LinkedHashList::new();
        for i in 0..12 {
            m.insert(i, i);
        }
        assert_eq!(m.capacity(), 16);
        // 13th insert crosses 3/4 of 16 with 12 live entries -> 16*12 = 192 -> 256
        m.insert(12, 12);
        assert_eq!(m.capacity(), 256);
        let keys: Vec<u32> = m.keys().copied().collect();
        assert_eq!(keys, (0..13).collect::<Vec<_>>());
    }

    #[test]
    fn churn_with_one_live_entry_stays_at_min_capacity() {
        let mut m: LinkedHashList<u32, u32> = LinkedHashList::new();
        m.insert(0, 0);
        for i in 1..1000 {
            let id = m.insert(i, i);
            assert!(m.load_factor() <= 0.75);
            m.remove(id);
            assert_eq!(m.capacity(), MIN_CAPACITY);
        }
        let keys: Vec<u32> = m.keys().copied().collect();
        assert_eq!(keys, vec![0]);
    }

    #[test]
    fn find_first_scans_from_oldest() {
        let mut m: LinkedHashList<i32, i32> = LinkedHashList::new();
        for i in 0..6 {
            m.insert(i, i * i);
        }
        let id = m.find_first(|_, v| *v > 5).unwrap();
        assert_eq!(m.key(id), Some(&3));
        assert!(m.find_first(|k, _| *k > 10).is_none());
    }

    #[test]
    fn cursor_walk_allows_mutation() {
        let mut m: LinkedHashList<i32, i32> = LinkedHashList::new();
        for i in 0..5 {
            m.insert(i, 0);
        }
        let mut cur = m.first();
        while let Some(id) = cur {
            if let Some(v) = m.value_mut(id) {
                *v += 1;
            }
            cur = m.next(id);
        }
        assert!(m.values().all(|v| *v == 1));
    }
}
