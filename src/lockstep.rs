//! Operators that advance several sequences in lockstep through bridges.
//!
//! Each traversal of a lockstep producer spawns its bridges when it starts and
//! drops them before it returns, whatever the reason for returning. Dropping a
//! bridge closes its channel and joins its worker, so stopping a zip early
//! leaves no worker behind.

use crate::bridge::{Bridge, BridgeSource};
use crate::error::{SeqError, SeqResult};
use crate::pair::{PairSequence, Triple};
use crate::producer::{Downstream, Flow, PairProducer, Producer};
use crate::sequence::Sequence;
use crate::sequence_configuration::BridgeConfig;

struct Zip<A, B> {
    left: Sequence<A>,
    right: Sequence<B>,
    config: BridgeConfig,
}

impl<A, B> PairProducer<A, B> for Zip<A, B>
where
    A: Send + 'static,
    B: Send + 'static,
{
    fn produce(&self, consume: &mut dyn FnMut(A, B) -> bool) -> SeqResult<Flow> {
        let mut left = Bridge::spawn(self.left.clone(), &self.config)?;
        let mut right = Bridge::spawn(self.right.clone(), &self.config)?;
        loop {
            let Some(a) = left.recv()? else {
                return Ok(Flow::Exhausted);
            };
            let Some(b) = right.recv()? else {
                return Ok(Flow::Exhausted);
            };
            if !consume(a, b) {
                return Ok(Flow::Stopped);
            }
        }
    }
}

struct ZipLongest<A, B> {
    left: Sequence<A>,
    right: Sequence<B>,
    fill_left: A,
    fill_right: B,
    config: BridgeConfig,
}

impl<A, B> PairProducer<A, B> for ZipLongest<A, B>
where
    A: Clone + Send + Sync + 'static,
    B: Clone + Send + Sync + 'static,
{
    fn produce(&self, consume: &mut dyn FnMut(A, B) -> bool) -> SeqResult<Flow> {
        let mut left = Bridge::spawn(self.left.clone(), &self.config)?;
        let mut right = Bridge::spawn(self.right.clone(), &self.config)?;
        loop {
            // An exhausted bridge keeps answering `None`, so no extra state is needed.
            let a = left.recv()?;
            let b = right.recv()?;
            let (a, b) = match (a, b) {
                (None, None) => return Ok(Flow::Exhausted),
                (a, b) => (
                    a.unwrap_or_else(|| self.fill_left.clone()),
                    b.unwrap_or_else(|| self.fill_right.clone()),
                ),
            };
            if !consume(a, b) {
                return Ok(Flow::Stopped);
            }
        }
    }
}

struct Zip3<A, B, C> {
    left: Sequence<A>,
    middle: Sequence<B>,
    right: Sequence<C>,
    config: BridgeConfig,
}

impl<A, B, C> Producer<Triple<A, B, C>> for Zip3<A, B, C>
where
    A: Send + 'static,
    B: Send + 'static,
    C: Send + 'static,
{
    fn produce(&self, consume: &mut dyn FnMut(Triple<A, B, C>) -> bool) -> SeqResult<Flow> {
        let mut left = Bridge::spawn(self.left.clone(), &self.config)?;
        let mut middle = Bridge::spawn(self.middle.clone(), &self.config)?;
        let mut right = Bridge::spawn(self.right.clone(), &self.config)?;
        loop {
            let Some(a) = left.recv()? else {
                return Ok(Flow::Exhausted);
            };
            let Some(b) = middle.recv()? else {
                return Ok(Flow::Exhausted);
            };
            let Some(c) = right.recv()? else {
                return Ok(Flow::Exhausted);
            };
            if !consume(Triple::new(a, b, c)) {
                return Ok(Flow::Stopped);
            }
        }
    }
}

struct Compress<T> {
    data: Sequence<T>,
    selectors: Sequence<bool>,
    config: BridgeConfig,
}

impl<T: Send + 'static> Producer<T> for Compress<T> {
    fn produce(&self, consume: &mut dyn FnMut(T) -> bool) -> SeqResult<Flow> {
        let zipped = Zip {
            left: self.data.clone(),
            right: self.selectors.clone(),
            config: self.config.clone(),
        };
        let mut downstream = Downstream::new(consume);
        zipped.produce(&mut |item, keep| if keep { downstream.push(item) } else { true })?;
        Ok(downstream.flow())
    }
}

/// Pair up the elements of two sequences, stopping at the shorter one
pub fn zip<A, B>(left: Sequence<A>, right: Sequence<B>) -> PairSequence<A, B>
where
    A: Send + 'static,
    B: Send + 'static,
{
    zip_with_config(left, right, BridgeConfig::default())
}

pub fn zip_with_config<A, B>(left: Sequence<A>, right: Sequence<B>, config: BridgeConfig) -> PairSequence<A, B>
where
    A: Send + 'static,
    B: Send + 'static,
{
    PairSequence::new(Zip { left, right, config })
}

/// Pair up the elements of two sequences until both are exhausted, padding
/// the shorter side with its fill value
pub fn zip_longest<A, B>(left: Sequence<A>, right: Sequence<B>, fill_left: A, fill_right: B) -> PairSequence<A, B>
where
    A: Clone + Send + Sync + 'static,
    B: Clone + Send + Sync + 'static,
{
    PairSequence::new(ZipLongest {
        left,
        right,
        fill_left,
        fill_right,
        config: BridgeConfig::default(),
    })
}

/// Three-way [`zip`]
pub fn zip3<A, B, C>(left: Sequence<A>, middle: Sequence<B>, right: Sequence<C>) -> Sequence<Triple<A, B, C>>
where
    A: Send + 'static,
    B: Send + 'static,
    C: Send + 'static,
{
    Sequence::new(Zip3 {
        left,
        middle,
        right,
        config: BridgeConfig::default(),
    })
}

/// Keep the elements of `data` whose selector at the same position is `true`
pub fn compress<T>(data: Sequence<T>, selectors: Sequence<bool>) -> Sequence<T>
where
    T: Send + 'static,
{
    Sequence::new(Compress {
        data,
        selectors,
        config: BridgeConfig::default(),
    })
}

/// Split off the first element.
///
/// Starts a bridge worker, pulls exactly one element and returns it with a
/// single-use sequence over the rest of the bridge. Dropping the rest without
/// driving it stops the worker.
pub fn uncons<T>(seq: &Sequence<T>) -> SeqResult<(T, Sequence<T>)>
where
    T: Send + 'static,
{
    let mut bridge = seq.bridge()?;
    match bridge.recv()? {
        Some(head) => Ok((head, Sequence::new(BridgeSource::new(bridge)))),
        None => Err(SeqError::EmptySequence),
    }
}

impl<T: Send + 'static> Sequence<T> {
    pub fn zip<U>(self, other: Sequence<U>) -> PairSequence<T, U>
    where
        U: Send + 'static,
    {
        zip(self, other)
    }

    pub fn zip_longest<U>(self, other: Sequence<U>, fill_self: T, fill_other: U) -> PairSequence<T, U>
    where
        T: Clone + Sync,
        U: Clone + Send + Sync + 'static,
    {
        zip_longest(self, other, fill_self, fill_other)
    }

    pub fn zip3<U, V>(self, middle: Sequence<U>, right: Sequence<V>) -> Sequence<Triple<T, U, V>>
    where
        U: Send + 'static,
        V: Send + 'static,
    {
        zip3(self, middle, right)
    }

    pub fn compress(self, selectors: Sequence<bool>) -> Sequence<T> {
        compress(self, selectors)
    }

    /// See [`uncons`]
    pub fn uncons(&self) -> SeqResult<(T, Sequence<T>)> {
        uncons(self)
    }

    /// Everything after the first element; fails on an empty sequence
    pub fn tail(&self) -> SeqResult<Sequence<T>> {
        uncons(self).map(|(_, rest)| rest)
    }
}
