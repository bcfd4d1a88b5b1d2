//! Concatenation, repetition and running accumulation.

use crate::error::SeqResult;
use crate::producer::{Downstream, Flow, Producer};
use crate::sequence::Sequence;
use crate::sources::from_vec;

struct Concat<T> {
    parts: Vec<Sequence<T>>,
}

impl<T: Send + 'static> Producer<T> for Concat<T> {
    fn produce(&self, consume: &mut dyn FnMut(T) -> bool) -> SeqResult<Flow> {
        for part in &self.parts {
            if part.produce(consume)?.is_stopped() {
                return Ok(Flow::Stopped);
            }
        }
        Ok(Flow::Exhausted)
    }
}

/// Concatenate sequences in order
pub fn concat<T>(parts: Vec<Sequence<T>>) -> Sequence<T>
where
    T: Send + 'static,
{
    Sequence::new(Concat { parts })
}

struct Cycle<T> {
    upstream: Sequence<T>,
}

impl<T: Send + 'static> Producer<T> for Cycle<T> {
    fn produce(&self, consume: &mut dyn FnMut(T) -> bool) -> SeqResult<Flow> {
        let mut downstream = Downstream::new(consume);
        loop {
            let mut produced = false;
            self.upstream.produce(&mut |item| {
                produced = true;
                downstream.push(item)
            })?;
            if downstream.is_stopped() {
                return Ok(Flow::Stopped);
            }
            // An empty pass means every later pass is empty too.
            if !produced {
                return Ok(Flow::Exhausted);
            }
        }
    }
}

struct Accumulate<T, F> {
    upstream: Sequence<T>,
    f: F,
}

impl<T, F> Producer<T> for Accumulate<T, F>
where
    T: Clone + Send + 'static,
    F: Fn(T, T) -> T + Send + Sync,
{
    fn produce(&self, consume: &mut dyn FnMut(T) -> bool) -> SeqResult<Flow> {
        let mut acc: Option<T> = None;
        self.upstream.produce(&mut |item| {
            let next = match acc.take() {
                Some(prev) => (self.f)(prev, item),
                None => item,
            };
            acc = Some(next.clone());
            consume(next)
        })
    }
}

struct Scan<T, B, F> {
    upstream: Sequence<T>,
    init: B,
    f: F,
}

impl<T, B, F> Producer<B> for Scan<T, B, F>
where
    T: Send + 'static,
    B: Clone + Send + Sync,
    F: Fn(B, T) -> B + Send + Sync,
{
    fn produce(&self, consume: &mut dyn FnMut(B) -> bool) -> SeqResult<Flow> {
        let mut acc = self.init.clone();
        self.upstream.produce(&mut |item| {
            acc = (self.f)(acc.clone(), item);
            consume(acc.clone())
        })
    }
}

impl<T: Send + 'static> Sequence<T> {
    /// This sequence followed by `other`
    pub fn chain(self, other: Sequence<T>) -> Sequence<T> {
        concat(vec![self, other])
    }

    /// This sequence followed by each of `others` in order
    pub fn chain_all(self, others: Vec<Sequence<T>>) -> Sequence<T> {
        let mut parts = Vec::with_capacity(others.len() + 1);
        parts.push(self);
        parts.extend(others);
        concat(parts)
    }

    /// This sequence followed by `items`
    pub fn append(self, items: Vec<T>) -> Sequence<T>
    where
        T: Clone + Sync,
    {
        concat(vec![self, from_vec(items)])
    }

    /// `items` followed by this sequence
    pub fn prepend(self, items: Vec<T>) -> Sequence<T>
    where
        T: Clone + Sync,
    {
        concat(vec![from_vec(items), self])
    }

    /// Replay this sequence forever. Each pass re-drives the whole chain, so a
    /// single-use source fails on the second pass.
    pub fn cycle(self) -> Sequence<T> {
        Sequence::new(Cycle { upstream: self })
    }

    /// Running totals: `p0, f(p0, p1), f(f(p0, p1), p2), ...`
    pub fn accumulate<F>(self, f: F) -> Sequence<T>
    where
        T: Clone,
        F: Fn(T, T) -> T + Send + Sync + 'static,
    {
        Sequence::new(Accumulate { upstream: self, f })
    }

    /// Like [`Sequence::accumulate`] but seeded, and the accumulator type may differ
    pub fn scan<B, F>(self, init: B, f: F) -> Sequence<B>
    where
        B: Clone + Send + Sync + 'static,
        F: Fn(B, T) -> B + Send + Sync + 'static,
    {
        Sequence::new(Scan { upstream: self, init, f })
    }
}
