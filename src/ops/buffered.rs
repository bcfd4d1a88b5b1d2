//! Operators that need to see more than one element at a time.
//!
//! `reversed`, the `sorted` family and `cache` drain their upstream into a
//! vector before emitting anything, so they never finish on an infinite
//! sequence. `distinct` streams but remembers every key it has seen during the
//! current traversal.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::SeqResult;
use crate::producer::{push_all, Flow, Producer};
use crate::sequence::Sequence;

struct Reversed<T> {
    upstream: Sequence<T>,
}

impl<T: Send + 'static> Producer<T> for Reversed<T> {
    fn produce(&self, consume: &mut dyn FnMut(T) -> bool) -> SeqResult<Flow> {
        let items = self.upstream.to_vec()?;
        Ok(push_all(items.into_iter().rev(), consume))
    }
}

struct SortedBy<T, F> {
    upstream: Sequence<T>,
    compare: F,
}

impl<T, F> Producer<T> for SortedBy<T, F>
where
    T: Send + 'static,
    F: Fn(&T, &T) -> Ordering + Send + Sync,
{
    fn produce(&self, consume: &mut dyn FnMut(T) -> bool) -> SeqResult<Flow> {
        let mut items = self.upstream.to_vec()?;
        items.sort_by(|a, b| (self.compare)(a, b));
        Ok(push_all(items, consume))
    }
}

struct DistinctBy<T, K, F> {
    upstream: Sequence<T>,
    key: F,
    _key: PhantomData<fn() -> K>,
}

impl<T, K, F> Producer<T> for DistinctBy<T, K, F>
where
    T: Send + 'static,
    K: Eq + Hash,
    F: Fn(&T) -> K + Send + Sync,
{
    fn produce(&self, consume: &mut dyn FnMut(T) -> bool) -> SeqResult<Flow> {
        let mut seen = HashSet::new();
        self.upstream.produce(&mut |item| {
            if seen.insert((self.key)(&item)) {
                consume(item)
            } else {
                true
            }
        })
    }
}

struct Cache<T> {
    upstream: Sequence<T>,
    items: Mutex<Option<Arc<Vec<T>>>>,
}

impl<T> Cache<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn items(&self) -> SeqResult<Arc<Vec<T>>> {
        let mut slot = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(items) = slot.as_ref() {
            return Ok(Arc::clone(items));
        }
        // A failed first drive leaves the slot empty so a later drive retries.
        let items = Arc::new(self.upstream.to_vec()?);
        log::trace!("cached {} elements", items.len());
        *slot = Some(Arc::clone(&items));
        Ok(items)
    }
}

impl<T> Producer<T> for Cache<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn produce(&self, consume: &mut dyn FnMut(T) -> bool) -> SeqResult<Flow> {
        let items = self.items()?;
        Ok(push_all(items.iter().cloned(), consume))
    }
}

impl<T: Send + 'static> Sequence<T> {
    /// Elements in reverse order
    pub fn reversed(self) -> Sequence<T> {
        Sequence::new(Reversed { upstream: self })
    }

    pub fn sorted(self) -> Sequence<T>
    where
        T: Ord,
    {
        self.sorted_by(Ord::cmp)
    }

    /// Stable sort with a comparator
    pub fn sorted_by<F>(self, compare: F) -> Sequence<T>
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        Sequence::new(SortedBy { upstream: self, compare })
    }

    pub fn sorted_by_key<K, F>(self, key: F) -> Sequence<T>
    where
        K: Ord,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.sorted_by(move |a, b| key(a).cmp(&key(b)))
    }

    /// Drop elements equal to one already emitted, keeping first occurrences
    pub fn distinct(self) -> Sequence<T>
    where
        T: Eq + Hash + Clone,
    {
        self.distinct_by(Clone::clone)
    }

    /// Drop elements whose key was already seen
    pub fn distinct_by<K, F>(self, key: F) -> Sequence<T>
    where
        K: Eq + Hash + 'static,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        Sequence::new(DistinctBy {
            upstream: self,
            key,
            _key: PhantomData,
        })
    }

    /// Materialise the sequence on its first drive and replay the stored
    /// elements afterwards.
    ///
    /// Useful in front of a single-use source that has to be traversed more
    /// than once, or an expensive chain.
    pub fn cache(self) -> Sequence<T>
    where
        T: Clone + Sync,
    {
        Sequence::new(Cache {
            upstream: self,
            items: Mutex::new(None),
        })
    }
}
