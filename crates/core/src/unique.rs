//! Insertion-ordered collection of unique values.

use std::collections::HashSet;
use std::hash::Hash;

/// Sequence that keeps only the first occurrence of each value.
///
/// Append-if-absent over a backing set plus a vector, so iteration order is
/// first-seen order.
#[derive(Debug, Clone)]
pub struct UniqueSeq<T> {
    seen: HashSet<T>,
    items: Vec<T>,
}

impl<T> Default for UniqueSeq<T> {
    fn default() -> Self {
        Self { seen: HashSet::new(), items: Vec::new() }
    }
}

impl<T: Eq + Hash + Clone> UniqueSeq<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` unless already present. Returns whether it was appended.
    pub fn insert(&mut self, value: T) -> bool {
        if self.seen.contains(&value) {
            return false;
        }
        self.seen.insert(value.clone());
        self.items.push(value);
        true
    }

    pub fn contains(&self, value: &T) -> bool {
        self.seen.contains(value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Eq + Hash + Clone> FromIterator<T> for UniqueSeq<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut seq = Self::new();
        for value in iter {
            seq.insert(value);
        }
        seq
    }
}

impl<T> IntoIterator for UniqueSeq<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_first_seen_order() {
        let mut seq = UniqueSeq::new();
        assert!(seq.insert("b"));
        assert!(seq.insert("a"));
        assert!(!seq.insert("b"));
        assert!(seq.insert("c"));
        assert_eq!(seq.as_slice(), &["b", "a", "c"]);
    }

    #[test]
    fn test_from_iter_dedupes() {
        let seq: UniqueSeq<i32> = [3, 1, 3, 2, 1].into_iter().collect();
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.into_vec(), vec![3, 1, 2]);
    }

    #[test]
    fn test_contains_and_empty() {
        let mut seq = UniqueSeq::new();
        assert!(seq.is_empty());
        seq.insert("猫耳FM".to_string());
        assert!(seq.contains(&"猫耳FM".to_string()));
        assert!(!seq.contains(&"其他".to_string()));
        assert_eq!(seq.iter().count(), 1);
    }
}
