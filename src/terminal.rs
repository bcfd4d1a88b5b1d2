//! Terminal actions: the calls that actually drive a sequence.
//!
//! Every action takes `&self`, so a re-drivable sequence can be driven again
//! afterwards. Actions that can answer before seeing every element (`find`,
//! `exists`, `for_all`, `head`, `nth`, `position`, `is_empty`) stop the producer
//! as soon as the answer is known.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Write};
use std::hash::Hash;
use std::ops::{Add, Mul};

use crate::error::{SeqError, SeqResult};
use crate::sequence::Sequence;

impl<T: Send + 'static> Sequence<T> {
    /// Run `f` on every element
    pub fn for_each<F>(&self, mut f: F) -> SeqResult<()>
    where
        F: FnMut(T),
    {
        self.produce(&mut |item| {
            f(item);
            true
        })?;
        Ok(())
    }

    /// Run a fallible `f` on every element, stopping at the first error
    pub fn try_for_each<F>(&self, mut f: F) -> SeqResult<()>
    where
        F: FnMut(T) -> SeqResult<()>,
    {
        let mut failure = None;
        self.produce(&mut |item| match f(item) {
            Ok(()) => true,
            Err(err) => {
                failure = Some(err);
                false
            }
        })?;
        failure.map_or(Ok(()), Err)
    }

    pub fn to_vec(&self) -> SeqResult<Vec<T>> {
        let mut out = Vec::new();
        self.for_each(|item| out.push(item))?;
        Ok(out)
    }

    /// Number of elements
    pub fn len(&self) -> SeqResult<usize> {
        let mut n = 0usize;
        self.for_each(|_| n += 1)?;
        Ok(n)
    }

    /// Whether the sequence has no elements; pulls at most one
    pub fn is_empty(&self) -> SeqResult<bool> {
        Ok(self.head_option()?.is_none())
    }

    pub fn count(&self) -> SeqResult<usize> {
        self.len()
    }

    /// Number of elements for which `predicate` holds
    pub fn count_by<F>(&self, mut predicate: F) -> SeqResult<usize>
    where
        F: FnMut(&T) -> bool,
    {
        let mut n = 0usize;
        self.for_each(|item| {
            if predicate(&item) {
                n += 1;
            }
        })?;
        Ok(n)
    }

    pub fn fold<B, F>(&self, init: B, mut f: F) -> SeqResult<B>
    where
        F: FnMut(B, T) -> B,
    {
        let mut acc = Some(init);
        self.for_each(|item| acc = acc.take().map(|prev| f(prev, item)))?;
        // Empty only when `f` panicked and the producer caught the unwind and kept going.
        acc.ok_or_else(|| SeqError::custom("fold function panicked during traversal"))
    }

    /// Combine all elements with `f`; `None` for an empty sequence
    pub fn reduce<F>(&self, mut f: F) -> SeqResult<Option<T>>
    where
        F: FnMut(T, T) -> T,
    {
        let mut acc: Option<T> = None;
        self.for_each(|item| {
            acc = Some(match acc.take() {
                Some(prev) => f(prev, item),
                None => item,
            })
        })?;
        Ok(acc)
    }

    pub fn sum(&self) -> SeqResult<T>
    where
        T: Default + Add<Output = T>,
    {
        self.fold(T::default(), |acc, item| acc + item)
    }

    pub fn product(&self) -> SeqResult<T>
    where
        T: From<u8> + Mul<Output = T>,
    {
        self.fold(T::from(1), |acc, item| acc * item)
    }

    /// Smallest element; the first one among equals
    pub fn min(&self) -> SeqResult<Option<T>>
    where
        T: Ord,
    {
        self.min_by(Ord::cmp)
    }

    /// Largest element; the last one among equals
    pub fn max(&self) -> SeqResult<Option<T>>
    where
        T: Ord,
    {
        self.max_by(Ord::cmp)
    }

    pub fn min_by<F>(&self, mut compare: F) -> SeqResult<Option<T>>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.reduce(|best, item| match compare(&item, &best) {
            Ordering::Less => item,
            _ => best,
        })
    }

    pub fn max_by<F>(&self, mut compare: F) -> SeqResult<Option<T>>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.reduce(|best, item| match compare(&item, &best) {
            Ordering::Less => best,
            _ => item,
        })
    }

    pub fn min_by_key<K, F>(&self, mut key: F) -> SeqResult<Option<T>>
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.min_by(|a, b| key(a).cmp(&key(b)))
    }

    pub fn max_by_key<K, F>(&self, mut key: F) -> SeqResult<Option<T>>
    where
        K: Ord,
        F: FnMut(&T) -> K,
    {
        self.max_by(|a, b| key(a).cmp(&key(b)))
    }

    /// First element matching `predicate`
    pub fn find<F>(&self, mut predicate: F) -> SeqResult<Option<T>>
    where
        F: FnMut(&T) -> bool,
    {
        let mut found = None;
        self.produce(&mut |item| {
            if predicate(&item) {
                found = Some(item);
                return false;
            }
            true
        })?;
        Ok(found)
    }

    /// Index of the first element matching `predicate`
    pub fn position<F>(&self, mut predicate: F) -> SeqResult<Option<usize>>
    where
        F: FnMut(&T) -> bool,
    {
        let mut index = 0usize;
        let mut found = None;
        self.produce(&mut |item| {
            if predicate(&item) {
                found = Some(index);
                return false;
            }
            index += 1;
            true
        })?;
        Ok(found)
    }

    /// Whether any element matches `predicate`
    pub fn exists<F>(&self, predicate: F) -> SeqResult<bool>
    where
        F: FnMut(&T) -> bool,
    {
        Ok(self.position(predicate)?.is_some())
    }

    pub fn any<F>(&self, predicate: F) -> SeqResult<bool>
    where
        F: FnMut(&T) -> bool,
    {
        self.exists(predicate)
    }

    /// Whether every element matches `predicate`; true for an empty sequence
    pub fn for_all<F>(&self, mut predicate: F) -> SeqResult<bool>
    where
        F: FnMut(&T) -> bool,
    {
        Ok(!self.exists(|item| !predicate(item))?)
    }

    pub fn all<F>(&self, predicate: F) -> SeqResult<bool>
    where
        F: FnMut(&T) -> bool,
    {
        self.for_all(predicate)
    }

    /// First element, or [`SeqError::EmptySequence`]
    pub fn head(&self) -> SeqResult<T> {
        self.head_option()?.ok_or(SeqError::EmptySequence)
    }

    pub fn head_option(&self) -> SeqResult<Option<T>> {
        self.find(|_| true)
    }

    /// Last element, or [`SeqError::EmptySequence`]
    pub fn last(&self) -> SeqResult<T> {
        self.last_option()?.ok_or(SeqError::EmptySequence)
    }

    pub fn last_option(&self) -> SeqResult<Option<T>> {
        let mut last = None;
        self.for_each(|item| last = Some(item))?;
        Ok(last)
    }

    /// Element at position `n`, counting from zero
    pub fn nth(&self, n: usize) -> SeqResult<Option<T>> {
        let mut index = 0usize;
        self.find(|_| {
            let hit = index == n;
            index += 1;
            hit
        })
    }

    /// Split off the last element: `(everything before it, last)`
    pub fn unsnoc(&self) -> SeqResult<(Vec<T>, T)> {
        let mut items = self.to_vec()?;
        match items.pop() {
            Some(last) => Ok((items, last)),
            None => Err(SeqError::EmptySequence),
        }
    }

    /// Everything except the last element
    pub fn init(&self) -> SeqResult<Vec<T>> {
        self.unsnoc().map(|(init, _)| init)
    }

    /// Render every element with `Display`, separated by `separator`
    pub fn make_string(&self, separator: &str) -> SeqResult<String>
    where
        T: Display,
    {
        self.make_string_with("", separator, "")
    }

    /// Like [`Sequence::make_string`] with a prefix and a suffix around the result
    pub fn make_string_with(&self, prefix: &str, separator: &str, suffix: &str) -> SeqResult<String>
    where
        T: Display,
    {
        let mut out = String::from(prefix);
        let mut first = true;
        self.for_each(|item| {
            if !first {
                out.push_str(separator);
            }
            first = false;
            // Writing into a String cannot fail.
            let _ = write!(out, "{}", item);
        })?;
        out.push_str(suffix);
        Ok(out)
    }

    pub fn join(&self, separator: &str) -> SeqResult<String>
    where
        T: Display,
    {
        self.make_string(separator)
    }

    pub fn to_set(&self) -> SeqResult<HashSet<T>>
    where
        T: Eq + Hash,
    {
        let mut out = HashSet::new();
        self.for_each(|item| {
            out.insert(item);
        })?;
        Ok(out)
    }

    /// Split into `(matching, not matching)`, each in sequence order
    pub fn partition<F>(&self, mut predicate: F) -> SeqResult<(Vec<T>, Vec<T>)>
    where
        F: FnMut(&T) -> bool,
    {
        let mut matching = Vec::new();
        let mut rest = Vec::new();
        self.for_each(|item| {
            if predicate(&item) {
                matching.push(item);
            } else {
                rest.push(item);
            }
        })?;
        Ok((matching, rest))
    }

    /// Collect elements into groups keyed by `key`, preserving order within a group
    pub fn group_by<K, F>(&self, mut key: F) -> SeqResult<HashMap<K, Vec<T>>>
    where
        K: Eq + Hash,
        F: FnMut(&T) -> K,
    {
        let mut out: HashMap<K, Vec<T>> = HashMap::new();
        self.for_each(|item| out.entry(key(&item)).or_default().push(item))?;
        Ok(out)
    }

    /// Occurrences of each distinct element
    pub fn count_by_value(&self) -> SeqResult<HashMap<T, usize>>
    where
        T: Eq + Hash,
    {
        let mut out: HashMap<T, usize> = HashMap::new();
        self.for_each(|item| *out.entry(item).or_insert(0) += 1)?;
        Ok(out)
    }
}
