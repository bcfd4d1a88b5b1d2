//! Fixed-arity records and the paired sequence shape.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::error::SeqResult;
use crate::producer::{Downstream, Flow, PairProducer, Producer};
use crate::sequence::Sequence;

/// Immutable two-field record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pair<L, R> {
    left: L,
    right: R,
}

impl<L, R> Pair<L, R> {
    pub fn new(left: L, right: R) -> Self {
        Self { left, right }
    }

    pub fn left(&self) -> &L {
        &self.left
    }

    pub fn right(&self) -> &R {
        &self.right
    }

    /// Decompose into the two components
    pub fn splat(self) -> (L, R) {
        (self.left, self.right)
    }
}

impl<L, R> From<(L, R)> for Pair<L, R> {
    fn from((left, right): (L, R)) -> Self {
        Pair::new(left, right)
    }
}

impl<L, R> From<Pair<L, R>> for (L, R) {
    fn from(pair: Pair<L, R>) -> Self {
        pair.splat()
    }
}

/// Immutable three-field record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Triple<A, B, C> {
    left: A,
    middle: B,
    right: C,
}

impl<A, B, C> Triple<A, B, C> {
    pub fn new(left: A, middle: B, right: C) -> Self {
        Self { left, middle, right }
    }

    pub fn left(&self) -> &A {
        &self.left
    }

    pub fn middle(&self) -> &B {
        &self.middle
    }

    pub fn right(&self) -> &C {
        &self.right
    }

    pub fn splat(self) -> (A, B, C) {
        (self.left, self.middle, self.right)
    }
}

impl<A, B, C> From<(A, B, C)> for Triple<A, B, C> {
    fn from((left, middle, right): (A, B, C)) -> Self {
        Triple::new(left, middle, right)
    }
}

impl<A, B, C> From<Triple<A, B, C>> for (A, B, C) {
    fn from(triple: Triple<A, B, C>) -> Self {
        triple.splat()
    }
}

/// A lazy sequence of key/value pairs, handed to consumers unboxed.
///
/// Isomorphic to `Sequence<Pair<K, V>>`; see [`PairSequence::to_pairs`] and
/// [`Sequence::paired`].
pub struct PairSequence<K, V> {
    producer: Arc<dyn PairProducer<K, V>>,
}

impl<K, V> Clone for PairSequence<K, V> {
    fn clone(&self) -> Self {
        PairSequence {
            producer: Arc::clone(&self.producer),
        }
    }
}

impl<K, V> fmt::Debug for PairSequence<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairSequence").finish_non_exhaustive()
    }
}

struct PairsOf<K, V> {
    upstream: PairSequence<K, V>,
}

impl<K, V> Producer<Pair<K, V>> for PairsOf<K, V>
where
    K: Send + 'static,
    V: Send + 'static,
{
    fn produce(&self, consume: &mut dyn FnMut(Pair<K, V>) -> bool) -> SeqResult<Flow> {
        self.upstream.produce(&mut |k, v| consume(Pair::new(k, v)))
    }
}

struct Unpaired<K, V> {
    upstream: Sequence<Pair<K, V>>,
}

impl<K, V> PairProducer<K, V> for Unpaired<K, V>
where
    K: Send + 'static,
    V: Send + 'static,
{
    fn produce(&self, consume: &mut dyn FnMut(K, V) -> bool) -> SeqResult<Flow> {
        self.upstream.produce(&mut |pair| {
            let (k, v) = pair.splat();
            consume(k, v)
        })
    }
}

struct MapPairs<K, V, F> {
    upstream: PairSequence<K, V>,
    f: F,
}

impl<K, V, R, F> Producer<R> for MapPairs<K, V, F>
where
    K: Send + 'static,
    V: Send + 'static,
    F: Fn(K, V) -> R + Send + Sync,
{
    fn produce(&self, consume: &mut dyn FnMut(R) -> bool) -> SeqResult<Flow> {
        self.upstream.produce(&mut |k, v| consume((self.f)(k, v)))
    }
}

struct FilterPairs<K, V, F> {
    upstream: PairSequence<K, V>,
    predicate: F,
}

impl<K, V, F> PairProducer<K, V> for FilterPairs<K, V, F>
where
    K: Send + 'static,
    V: Send + 'static,
    F: Fn(&K, &V) -> bool + Send + Sync,
{
    fn produce(&self, consume: &mut dyn FnMut(K, V) -> bool) -> SeqResult<Flow> {
        self.upstream.produce(&mut |k, v| if (self.predicate)(&k, &v) { consume(k, v) } else { true })
    }
}

struct TakePairs<K, V> {
    upstream: PairSequence<K, V>,
    n: usize,
}

impl<K, V> PairProducer<K, V> for TakePairs<K, V>
where
    K: Send + 'static,
    V: Send + 'static,
{
    fn produce(&self, consume: &mut dyn FnMut(K, V) -> bool) -> SeqResult<Flow> {
        if self.n == 0 {
            return Ok(Flow::Exhausted);
        }
        let mut remaining = self.n;
        let mut pass_on = |(k, v): (K, V)| consume(k, v);
        let mut downstream = Downstream::new(&mut pass_on);
        self.upstream.produce(&mut |k, v| {
            if remaining == 0 {
                return false;
            }
            remaining -= 1;
            downstream.push((k, v)) && remaining > 0
        })?;
        Ok(downstream.flow())
    }
}

impl<K, V> PairSequence<K, V>
where
    K: Send + 'static,
    V: Send + 'static,
{
    /// Wrap a pair producer
    pub fn new<P>(producer: P) -> Self
    where
        P: PairProducer<K, V> + 'static,
    {
        PairSequence {
            producer: Arc::new(producer),
        }
    }

    /// Drive the sequence once, feeding both components of every pair to `consume`
    pub fn produce(&self, consume: &mut dyn FnMut(K, V) -> bool) -> SeqResult<Flow> {
        self.producer.produce(consume)
    }

    /// View as a sequence of [`Pair`] records
    pub fn to_pairs(self) -> Sequence<Pair<K, V>> {
        Sequence::new(PairsOf { upstream: self })
    }

    /// View as a sequence of tuples
    pub fn to_tuples(self) -> Sequence<(K, V)> {
        self.map(|k, v| (k, v))
    }

    pub fn map<R, F>(self, f: F) -> Sequence<R>
    where
        R: Send + 'static,
        F: Fn(K, V) -> R + Send + Sync + 'static,
    {
        Sequence::new(MapPairs { upstream: self, f })
    }

    pub fn filter<F>(self, predicate: F) -> PairSequence<K, V>
    where
        F: Fn(&K, &V) -> bool + Send + Sync + 'static,
    {
        PairSequence::new(FilterPairs {
            upstream: self,
            predicate,
        })
    }

    pub fn take(self, n: usize) -> PairSequence<K, V> {
        PairSequence::new(TakePairs { upstream: self, n })
    }

    pub fn keys(self) -> Sequence<K> {
        self.map(|k, _| k)
    }

    pub fn values(self) -> Sequence<V> {
        self.map(|_, v| v)
    }

    /// Swap the two components of every pair
    pub fn swap(self) -> PairSequence<V, K> {
        self.map(|k, v| Pair::new(v, k)).paired()
    }

    pub fn for_each<F>(&self, mut f: F) -> SeqResult<()>
    where
        F: FnMut(K, V),
    {
        self.produce(&mut |k, v| {
            f(k, v);
            true
        })?;
        Ok(())
    }

    pub fn to_vec(&self) -> SeqResult<Vec<(K, V)>> {
        let mut out = Vec::new();
        self.for_each(|k, v| out.push((k, v)))?;
        Ok(out)
    }

    /// Collect into a map; later values overwrite earlier ones for the same key
    pub fn to_map(&self) -> SeqResult<HashMap<K, V>>
    where
        K: Eq + Hash,
    {
        let mut out = HashMap::new();
        self.for_each(|k, v| {
            out.insert(k, v);
        })?;
        Ok(out)
    }

    /// Group values by key, preserving arrival order within each group
    pub fn group_by_key(&self) -> SeqResult<HashMap<K, Vec<V>>>
    where
        K: Eq + Hash,
    {
        let mut out: HashMap<K, Vec<V>> = HashMap::new();
        self.for_each(|k, v| out.entry(k).or_default().push(v))?;
        Ok(out)
    }

    /// Fold the values of each key with `f`
    pub fn reduce_by_key<F>(&self, mut f: F) -> SeqResult<HashMap<K, V>>
    where
        K: Eq + Hash,
        F: FnMut(V, V) -> V,
    {
        let mut out: HashMap<K, V> = HashMap::new();
        self.for_each(|k, v| {
            let merged = match out.remove(&k) {
                Some(acc) => f(acc, v),
                None => v,
            };
            out.insert(k, merged);
        })?;
        Ok(out)
    }

    pub fn count_by_key(&self) -> SeqResult<HashMap<K, usize>>
    where
        K: Eq + Hash,
    {
        let mut out: HashMap<K, usize> = HashMap::new();
        self.for_each(|k, _| *out.entry(k).or_insert(0) += 1)?;
        Ok(out)
    }
}

impl<K, V> Sequence<Pair<K, V>>
where
    K: Send + 'static,
    V: Send + 'static,
{
    /// View a sequence of [`Pair`] records as a paired sequence
    pub fn paired(self) -> PairSequence<K, V> {
        PairSequence::new(Unpaired { upstream: self })
    }

    pub fn to_map(&self) -> SeqResult<HashMap<K, V>>
    where
        K: Eq + Hash,
    {
        self.clone().paired().to_map()
    }
}
