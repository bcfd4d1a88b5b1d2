//! Element-by-element operators.
//!
//! Each operator is its own producer type holding the upstream sequence. Its
//! `produce` drives the upstream with a callback that applies the operator's
//! policy and forwards to the downstream through a [`Downstream`] guard, so a
//! stop from below is turned into a `false` for the upstream straight away.

use crate::error::{SeqError, SeqResult};
use crate::pair::PairSequence;
use crate::producer::{Downstream, Flow, PairProducer, Producer};
use crate::sequence::Sequence;

struct Map<T, F> {
    upstream: Sequence<T>,
    f: F,
}

impl<T, U, F> Producer<U> for Map<T, F>
where
    T: Send + 'static,
    F: Fn(T) -> U + Send + Sync,
{
    fn produce(&self, consume: &mut dyn FnMut(U) -> bool) -> SeqResult<Flow> {
        self.upstream.produce(&mut |item| consume((self.f)(item)))
    }
}

struct TryMap<T, F> {
    upstream: Sequence<T>,
    f: F,
}

impl<T, U, F> Producer<U> for TryMap<T, F>
where
    T: Send + 'static,
    F: Fn(T) -> SeqResult<U> + Send + Sync,
{
    fn produce(&self, consume: &mut dyn FnMut(U) -> bool) -> SeqResult<Flow> {
        let mut failure = None;
        let flow = self.upstream.produce(&mut |item| match (self.f)(item) {
            Ok(mapped) => consume(mapped),
            Err(err) => {
                failure = Some(err);
                false
            }
        })?;
        match failure {
            Some(err) => Err(err),
            None => Ok(flow),
        }
    }
}

struct Filter<T, F> {
    upstream: Sequence<T>,
    predicate: F,
    keep: bool,
}

impl<T, F> Producer<T> for Filter<T, F>
where
    T: Send + 'static,
    F: Fn(&T) -> bool + Send + Sync,
{
    fn produce(&self, consume: &mut dyn FnMut(T) -> bool) -> SeqResult<Flow> {
        self.upstream.produce(&mut |item| {
            if (self.predicate)(&item) == self.keep {
                consume(item)
            } else {
                true
            }
        })
    }
}

struct FilterMap<T, F> {
    upstream: Sequence<T>,
    f: F,
}

impl<T, U, F> Producer<U> for FilterMap<T, F>
where
    T: Send + 'static,
    F: Fn(T) -> Option<U> + Send + Sync,
{
    fn produce(&self, consume: &mut dyn FnMut(U) -> bool) -> SeqResult<Flow> {
        self.upstream.produce(&mut |item| match (self.f)(item) {
            Some(mapped) => consume(mapped),
            None => true,
        })
    }
}

struct FlatMap<T, F> {
    upstream: Sequence<T>,
    f: F,
}

impl<T, I, F> Producer<I::Item> for FlatMap<T, F>
where
    T: Send + 'static,
    I: IntoIterator,
    F: Fn(T) -> I + Send + Sync,
{
    fn produce(&self, consume: &mut dyn FnMut(I::Item) -> bool) -> SeqResult<Flow> {
        let mut downstream = Downstream::new(consume);
        self.upstream.produce(&mut |item| {
            for inner in (self.f)(item) {
                if !downstream.push(inner) {
                    return false;
                }
            }
            true
        })?;
        Ok(downstream.flow())
    }
}

struct Take<T> {
    upstream: Sequence<T>,
    n: usize,
}

impl<T: Send + 'static> Producer<T> for Take<T> {
    fn produce(&self, consume: &mut dyn FnMut(T) -> bool) -> SeqResult<Flow> {
        if self.n == 0 {
            return Ok(Flow::Exhausted);
        }
        let mut remaining = self.n;
        let mut downstream = Downstream::new(consume);
        // Stop the upstream right after the n-th element, before it computes another.
        self.upstream.produce(&mut |item| {
            if remaining == 0 {
                return false;
            }
            remaining -= 1;
            downstream.push(item) && remaining > 0
        })?;
        Ok(downstream.flow())
    }
}

struct Skip<T> {
    upstream: Sequence<T>,
    n: usize,
}

impl<T: Send + 'static> Producer<T> for Skip<T> {
    fn produce(&self, consume: &mut dyn FnMut(T) -> bool) -> SeqResult<Flow> {
        let mut skipped = 0usize;
        self.upstream.produce(&mut |item| {
            if skipped < self.n {
                skipped += 1;
                true
            } else {
                consume(item)
            }
        })
    }
}

struct TakeWhile<T, F> {
    upstream: Sequence<T>,
    predicate: F,
}

impl<T, F> Producer<T> for TakeWhile<T, F>
where
    T: Send + 'static,
    F: Fn(&T) -> bool + Send + Sync,
{
    fn produce(&self, consume: &mut dyn FnMut(T) -> bool) -> SeqResult<Flow> {
        let mut downstream = Downstream::new(consume);
        self.upstream.produce(&mut |item| (self.predicate)(&item) && downstream.push(item))?;
        Ok(downstream.flow())
    }
}

struct SkipWhile<T, F> {
    upstream: Sequence<T>,
    predicate: F,
}

impl<T, F> Producer<T> for SkipWhile<T, F>
where
    T: Send + 'static,
    F: Fn(&T) -> bool + Send + Sync,
{
    fn produce(&self, consume: &mut dyn FnMut(T) -> bool) -> SeqResult<Flow> {
        let mut skipping = true;
        self.upstream.produce(&mut |item| {
            if skipping && (self.predicate)(&item) {
                return true;
            }
            skipping = false;
            consume(item)
        })
    }
}

struct Peek<T, F> {
    upstream: Sequence<T>,
    action: F,
}

impl<T, F> Producer<T> for Peek<T, F>
where
    T: Send + 'static,
    F: Fn(&T) + Send + Sync,
{
    fn produce(&self, consume: &mut dyn FnMut(T) -> bool) -> SeqResult<Flow> {
        self.upstream.produce(&mut |item| {
            (self.action)(&item);
            consume(item)
        })
    }
}

struct Enumerate<T> {
    upstream: Sequence<T>,
    start: usize,
}

impl<T: Send + 'static> PairProducer<usize, T> for Enumerate<T> {
    fn produce(&self, consume: &mut dyn FnMut(usize, T) -> bool) -> SeqResult<Flow> {
        let mut index = self.start;
        self.upstream.produce(&mut |item| {
            let current = index;
            index += 1;
            consume(current, item)
        })
    }
}

struct Slice<T> {
    upstream: Sequence<T>,
    start: usize,
    stop: Option<usize>,
    step: usize,
}

impl<T: Send + 'static> Producer<T> for Slice<T> {
    fn produce(&self, consume: &mut dyn FnMut(T) -> bool) -> SeqResult<Flow> {
        if self.step == 0 {
            return Err(SeqError::InvalidArgument("slice step must be positive".to_string()));
        }
        if self.stop.is_some_and(|stop| stop <= self.start) {
            return Ok(Flow::Exhausted);
        }
        let mut position = 0usize;
        let mut downstream = Downstream::new(consume);
        self.upstream.produce(&mut |item| {
            let current = position;
            position += 1;
            if current >= self.start && (current - self.start) % self.step == 0 && !downstream.push(item) {
                return false;
            }
            // Nothing past `stop` can be selected, so stop pulling.
            self.stop.map_or(true, |stop| position < stop)
        })?;
        Ok(downstream.flow())
    }
}

impl<T: Send + 'static> Sequence<T> {
    /// Transform every element
    pub fn map<U, F>(self, f: F) -> Sequence<U>
    where
        U: Send + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        Sequence::new(Map { upstream: self, f })
    }

    /// Transform every element with a fallible function; the first error stops
    /// the traversal and is returned from the terminal call
    pub fn try_map<U, F>(self, f: F) -> Sequence<U>
    where
        U: Send + 'static,
        F: Fn(T) -> SeqResult<U> + Send + Sync + 'static,
    {
        Sequence::new(TryMap { upstream: self, f })
    }

    /// Keep the elements for which `predicate` holds
    pub fn filter<F>(self, predicate: F) -> Sequence<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Sequence::new(Filter {
            upstream: self,
            predicate,
            keep: true,
        })
    }

    /// Keep the elements for which `predicate` does not hold
    pub fn filter_false<F>(self, predicate: F) -> Sequence<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Sequence::new(Filter {
            upstream: self,
            predicate,
            keep: false,
        })
    }

    pub fn filter_map<U, F>(self, f: F) -> Sequence<U>
    where
        U: Send + 'static,
        F: Fn(T) -> Option<U> + Send + Sync + 'static,
    {
        Sequence::new(FilterMap { upstream: self, f })
    }

    /// Map every element to an iterable and emit its contents in order
    pub fn flat_map<I, F>(self, f: F) -> Sequence<I::Item>
    where
        I: IntoIterator,
        I::Item: Send + 'static,
        F: Fn(T) -> I + Send + Sync + 'static,
    {
        Sequence::new(FlatMap { upstream: self, f })
    }

    /// First `n` elements; `take(0)` never drives the upstream
    pub fn take(self, n: usize) -> Sequence<T> {
        Sequence::new(Take { upstream: self, n })
    }

    /// Everything after the first `n` elements
    pub fn drop(self, n: usize) -> Sequence<T> {
        if n == 0 {
            return self;
        }
        Sequence::new(Skip { upstream: self, n })
    }

    pub fn take_while<F>(self, predicate: F) -> Sequence<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Sequence::new(TakeWhile {
            upstream: self,
            predicate,
        })
    }

    pub fn drop_while<F>(self, predicate: F) -> Sequence<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Sequence::new(SkipWhile {
            upstream: self,
            predicate,
        })
    }

    /// Run `action` on every element as it passes through
    pub fn peek<F>(self, action: F) -> Sequence<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        Sequence::new(Peek { upstream: self, action })
    }

    /// Pair every element with its position, counting from zero
    pub fn enumerate(self) -> PairSequence<usize, T> {
        self.enumerate_from(0)
    }

    pub fn enumerate_from(self, start: usize) -> PairSequence<usize, T> {
        PairSequence::new(Enumerate { upstream: self, start })
    }

    /// Elements at positions `start, start + step, ...` below `stop`
    pub fn slice(self, start: usize, stop: usize, step: usize) -> Sequence<T> {
        Sequence::new(Slice {
            upstream: self,
            start,
            stop: Some(stop),
            step,
        })
    }

    /// Elements at positions `start..stop`
    pub fn islice(self, start: usize, stop: usize) -> Sequence<T> {
        self.slice(start, stop, 1)
    }

    /// Every `step`-th element, starting with the first
    pub fn step_by(self, step: usize) -> Sequence<T> {
        Sequence::new(Slice {
            upstream: self,
            start: 0,
            stop: None,
            step,
        })
    }
}

/// Flattening for sequences whose elements are themselves iterable
struct Flatten<T> {
    upstream: Sequence<T>,
}

impl<T> Producer<T::Item> for Flatten<T>
where
    T: IntoIterator + Send + 'static,
{
    fn produce(&self, consume: &mut dyn FnMut(T::Item) -> bool) -> SeqResult<Flow> {
        let mut downstream = Downstream::new(consume);
        self.upstream.produce(&mut |inner| {
            for item in inner {
                if !downstream.push(item) {
                    return false;
                }
            }
            true
        })?;
        Ok(downstream.flow())
    }
}

impl<T> Sequence<T>
where
    T: IntoIterator + Send + 'static,
    T::Item: Send + 'static,
{
    /// Emit the contents of every element in order
    pub fn flatten(self) -> Sequence<T::Item> {
        Sequence::new(Flatten { upstream: self })
    }
}
