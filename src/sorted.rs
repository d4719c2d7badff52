//! A sorted map stored as a contiguous sequence.
//!
//! Entries are ordered strictly ascending by a projected key, with no duplicate keys.
//! Lookups are binary searches (`O(log n)`); insertions and removals shift the tail of
//! the sequence (`O(n)`). Every neighborhood operation in this crate goes through
//! these helpers.

/// An entry that exposes an ordering key.
pub trait Keyed {
    /// Key type the sequence is ordered by.
    type Key: Ord + Copy;

    /// Projects the ordering key out of the entry.
    fn key(&self) -> Self::Key;
}

/// `(key, value)` pairs are ordered by their first element only.
impl<K: Ord + Copy, T> Keyed for (K, T) {
    type Key = K;

    #[inline(always)]
    fn key(&self) -> K {
        self.0
    }
}

/// Returns the first position whose key is not less than `key`.
#[inline]
pub fn lower_bound<T: Keyed>(seq: &[T], key: T::Key) -> usize {
    seq.partition_point(|e| e.key() < key)
}

/// Binary-searches for `key`.
///
/// Returns `Ok(position)` when present, or `Err(position)` where an entry with that key
/// would have to be inserted to keep the sequence sorted.
///
/// # Errors
/// `Err` is not a failure; it carries the insertion point of an absent key.
#[inline]
pub fn search<T: Keyed>(seq: &[T], key: T::Key) -> Result<usize, usize> {
    let pos = lower_bound(seq, key);
    if pos < seq.len() && seq[pos].key() == key {
        Ok(pos)
    } else {
        Err(pos)
    }
}

/// Returns the entry with `key`, if any.
#[inline]
pub fn get<T: Keyed>(seq: &[T], key: T::Key) -> Option<&T> {
    search(seq, key).ok().map(|pos| &seq[pos])
}

/// Returns the entry with `key` mutably, if any.
///
/// The caller must not change the entry's key.
#[inline]
pub fn get_mut<T: Keyed>(seq: &mut [T], key: T::Key) -> Option<&mut T> {
    match search(seq, key) {
        Ok(pos) => Some(&mut seq[pos]),
        Err(_) => None,
    }
}

/// Inserts `entry` at its sorted position unless its key is already present.
///
/// Returns the position of the entry with that key and whether an insertion happened.
/// An existing entry is left untouched.
#[inline]
pub fn insert_if_absent<T: Keyed>(seq: &mut Vec<T>, entry: T) -> (usize, bool) {
    match search(seq, entry.key()) {
        Ok(pos) => (pos, false),
        Err(pos) => {
            seq.insert(pos, entry);
            (pos, true)
        }
    }
}

/// Removes and returns the entry with `key`, if any.
#[inline]
pub fn remove<T: Keyed>(seq: &mut Vec<T>, key: T::Key) -> Option<T> {
    search(seq, key).ok().map(|pos| seq.remove(pos))
}

/// Returns the first position `i` with `seq[i].key() >= seq[i + 1].key()`, if any.
pub fn first_unsorted<T: Keyed>(seq: &[T]) -> Option<usize> {
    seq.windows(2).position(|w| w[0].key() >= w[1].key())
}

/// Returns `true` iff keys are strictly increasing.
#[inline]
pub fn is_strictly_sorted<T: Keyed>(seq: &[T]) -> bool {
    first_unsorted(seq).is_none()
}

// ============================================================================
// Tests
// ============================================================================
