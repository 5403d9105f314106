//! Open-chaining hash table.
//!
//! ## Layout
//!
//! ```text
//! buckets[0] -> Entry -> Entry -> None
//! buckets[1] -> None
//! buckets[2] -> Entry -> None
//! ```
//!
//! New entries are pushed at the head of their bucket chain. Once the entry
//! count exceeds `capacity × load_factor` the table grows to
//! `2 × capacity + 1` buckets and every entry is relinked into its new
//! bucket; entries are moved, never reallocated.
//!
//! Bucket selection uses `FxHasher` so layouts are identical across runs.

use std::borrow::Borrow;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use crate::config::{DEFAULT_CART_CAPACITY, DEFAULT_LOAD_FACTOR};

type Link<K, V> = Option<Box<Entry<K, V>>>;

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    next: Link<K, V>,
}

/// Chained hash table with a fixed growth rule.
///
/// ## Example
///
/// ```
/// use brightcart::cart::HashIndex;
///
/// let mut index = HashIndex::new();
/// assert_eq!(index.put("P1".to_string(), 5), None);
/// assert_eq!(index.put("P1".to_string(), 8), Some(5));
///
/// assert_eq!(index.get("P1"), Some(&8));
/// assert_eq!(index.remove("P1"), Some(8));
/// assert_eq!(index.get("P1"), None);
/// ```
#[derive(Debug)]
pub struct HashIndex<K, V> {
    buckets: Vec<Link<K, V>>,
    len: usize,
    load_factor: f32,
    rehashes: usize,
}

impl<K: Hash + Eq, V> Default for HashIndex<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, V> HashIndex<K, V> {
    /// Create a table with 101 buckets and a 0.75 load factor
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CART_CAPACITY, DEFAULT_LOAD_FACTOR)
    }

    /// Create a table with `capacity` buckets.
    ///
    /// A zero capacity is raised to one bucket; a non-positive load factor
    /// falls back to the default.
    pub fn with_capacity(capacity: usize, load_factor: f32) -> Self {
        let load_factor = if load_factor.is_finite() && load_factor > 0.0 {
            load_factor
        } else {
            DEFAULT_LOAD_FACTOR
        };

        Self {
            buckets: empty_buckets(capacity.max(1)),
            len: 0,
            load_factor,
            rehashes: 0,
        }
    }

    // ========================================================================
    // Size
    // ========================================================================

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current bucket count
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Number of times the table has grown
    #[inline]
    pub fn rehash_count(&self) -> usize {
        self.rehashes
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Insert or overwrite `key`, returning the previous value if any
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let index = bucket_index(&key, self.buckets.len());

        let mut cursor = self.buckets[index].as_deref_mut();
        while let Some(entry) = cursor {
            if entry.key == key {
                return Some(std::mem::replace(&mut entry.value, value));
            }
            cursor = entry.next.as_deref_mut();
        }

        let bucket = &mut self.buckets[index];
        let next = bucket.take();
        *bucket = Some(Box::new(Entry { key, value, next }));
        self.len += 1;

        if self.len as f64 > self.buckets.len() as f64 * f64::from(self.load_factor) {
            self.rehash();
        }
        None
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = bucket_index(key, self.buckets.len());

        let mut cursor = self.buckets[index].as_deref();
        while let Some(entry) = cursor {
            if entry.key.borrow() == key {
                return Some(&entry.value);
            }
            cursor = entry.next.as_deref();
        }
        None
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Detach the entry for `key` from its chain and return its value
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = bucket_index(key, self.buckets.len());

        let mut link = &mut self.buckets[index];
        while link
            .as_ref()
            .is_some_and(|entry| entry.key.borrow() != key)
        {
            link = &mut link.as_mut()?.next;
        }

        let detached = link.take()?;
        let Entry { value, next, .. } = *detached;
        *link = next;
        self.len -= 1;
        Some(value)
    }

    /// Drop every entry, keeping the current bucket count
    pub fn clear(&mut self) {
        unlink_all(&mut self.buckets);
        self.len = 0;
    }

    /// Entries in bucket order, then chain order
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            chain: None,
        }
    }

    /// Grow to `2 × capacity + 1` buckets and relink every entry
    fn rehash(&mut self) {
        let new_capacity = self.buckets.len() * 2 + 1;
        let old = std::mem::replace(&mut self.buckets, empty_buckets(new_capacity));

        for mut link in old {
            while let Some(mut entry) = link {
                link = entry.next.take();
                let index = bucket_index(&entry.key, new_capacity);
                entry.next = self.buckets[index].take();
                self.buckets[index] = Some(entry);
            }
        }

        self.rehashes += 1;
        tracing::debug!(capacity = new_capacity, entries = self.len, "hash index rehashed");
    }
}

impl<K, V> Drop for HashIndex<K, V> {
    fn drop(&mut self) {
        unlink_all(&mut self.buckets);
    }
}

/// Unlink chains iteratively so long chains do not recurse on drop
fn unlink_all<K, V>(buckets: &mut [Link<K, V>]) {
    for bucket in buckets {
        let mut link = bucket.take();
        while let Some(mut entry) = link {
            link = entry.next.take();
        }
    }
}

fn empty_buckets<K, V>(capacity: usize) -> Vec<Link<K, V>> {
    std::iter::repeat_with(|| None).take(capacity).collect()
}

fn bucket_index<Q: Hash + ?Sized>(key: &Q, capacity: usize) -> usize {
    let mut hasher = FxHasher::default();
    key.hash(&mut hasher);
    ((hasher.finish() & 0x7FFF_FFFF) as usize) % capacity
}

/// Iterator over `(key, value)` pairs of a [`HashIndex`].
pub struct Iter<'a, K, V> {
    buckets: std::slice::Iter<'a, Link<K, V>>,
    chain: Option<&'a Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.chain {
                self.chain = entry.next.as_deref();
                return Some((&entry.key, &entry.value));
            }
            self.chain = self.buckets.next()?.as_deref();
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
