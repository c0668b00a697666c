//! Persistent set used for row selection.
//!
//! Every mutating operation returns a new set and leaves the receiver
//! untouched. The empty set carries no allocation, so `empty()` and
//! `clear()` are free.

use std::collections::HashSet;
use std::hash::Hash;
use std::rc::Rc;

#[derive(Debug)]
pub struct ImmutableSet<K> {
    /// `None` is the canonical empty set
    inner: Option<Rc<HashSet<K>>>,
}

impl<K> Clone for ImmutableSet<K> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.as_ref().map(Rc::clone),
        }
    }
}

impl<K> Default for ImmutableSet<K> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<K> ImmutableSet<K> {
    pub const fn empty() -> Self {
        Self { inner: None }
    }

    pub fn len(&self) -> usize {
        self.inner.as_ref().map_or(0, |s| s.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) -> Self {
        Self::empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.inner.iter().flat_map(|s| s.iter())
    }
}

impl<K: Eq + Hash + Clone> ImmutableSet<K> {
    /// A set holding exactly the given values.
    pub fn just<I: IntoIterator<Item = K>>(values: I) -> Self {
        Self::empty().add(values)
    }

    pub fn has(&self, value: &K) -> bool {
        self.inner.as_ref().is_some_and(|s| s.contains(value))
    }

    /// A new set with all `values` added.
    pub fn add<I: IntoIterator<Item = K>>(&self, values: I) -> Self {
        let mut set = self.to_hash_set();
        set.extend(values);
        Self::from_hash_set(set)
    }

    pub fn delete(&self, value: &K) -> Self {
        if !self.has(value) {
            return self.clone();
        }
        let mut set = self.to_hash_set();
        set.remove(value);
        Self::from_hash_set(set)
    }

    pub fn toggle(&self, value: &K) -> Self {
        if self.has(value) {
            self.delete(value)
        } else {
            self.add([value.clone()])
        }
    }

    pub fn to_vec(&self) -> Vec<K> {
        self.iter().cloned().collect()
    }

    fn to_hash_set(&self) -> HashSet<K> {
        self.inner
            .as_ref()
            .map(|s| HashSet::clone(s))
            .unwrap_or_default()
    }

    fn from_hash_set(set: HashSet<K>) -> Self {
        if set.is_empty() {
            Self::empty()
        } else {
            Self {
                inner: Some(Rc::new(set)),
            }
        }
    }
}

impl<K: Eq + Hash> PartialEq for ImmutableSet<K> {
    fn eq(&self, other: &Self) -> bool {
        match (&self.inner, &other.inner) {
            (None, None) => true,
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

impl<K: Eq + Hash> Eq for ImmutableSet<K> {}

impl<K: Eq + Hash + Clone> FromIterator<K> for ImmutableSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self::just(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operations_do_not_mutate() {
        let a = ImmutableSet::just([1, 2]);
        let b = a.add([3]);
        let c = b.delete(&1);
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 3);
        assert!(!c.has(&1));
        assert!(a.has(&1));
    }

    #[test]
    fn toggle_is_its_own_inverse() {
        let sets = [
            ImmutableSet::empty(),
            ImmutableSet::just([1]),
            ImmutableSet::just([1, 2, 3]),
        ];
        for s in &sets {
            for k in 0..5 {
                assert_eq!(&s.toggle(&k).toggle(&k), s);
            }
        }
    }

    #[test]
    fn removing_last_value_yields_canonical_empty() {
        let s = ImmutableSet::just([7]).delete(&7);
        assert!(s.is_empty());
        assert_eq!(s, ImmutableSet::empty());
        assert!(s.inner.is_none());
    }

    #[test]
    fn clear_and_empty_are_equal() {
        let s = ImmutableSet::just(["a", "b"]);
        assert_eq!(s.clear(), ImmutableSet::empty());
    }
}
