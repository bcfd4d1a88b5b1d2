//! The push protocol every sequence is built on.
//!
//! A [`Producer`] offers its elements one at a time to a `consume` callback.
//! The callback answers `true` to ask for more and `false` to stop; once it
//! has answered `false` the producer must not call it again, must release
//! whatever it holds, and must return `Ok(Flow::Stopped)`.

use std::sync::{Mutex, PoisonError};

use crate::error::{SeqError, SeqResult};

/// How a traversal ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// The producer ran out of elements
    Exhausted,
    /// The consumer returned `false`
    Stopped,
}

impl Flow {
    pub fn is_stopped(self) -> bool {
        matches!(self, Flow::Stopped)
    }
}

/// A source of elements that can be driven with a consume callback.
///
/// Implementations must be safe to hand to a bridge worker, hence `Send + Sync`.
pub trait Producer<T>: Send + Sync {
    fn produce(&self, consume: &mut dyn FnMut(T) -> bool) -> SeqResult<Flow>;
}

/// Two-valued counterpart of [`Producer`], used by paired sequences.
pub trait PairProducer<K, V>: Send + Sync {
    fn produce(&self, consume: &mut dyn FnMut(K, V) -> bool) -> SeqResult<Flow>;
}

/// Wraps a downstream callback and remembers whether it asked to stop.
///
/// Operators push through this guard so the downstream is never called again
/// after it returned `false`, and so the operator can report the right [`Flow`]
/// even when it stopped its own upstream (as `take` does).
pub(crate) struct Downstream<'a, T> {
    consume: &'a mut dyn FnMut(T) -> bool,
    stopped: bool,
}

impl<'a, T> Downstream<'a, T> {
    pub(crate) fn new(consume: &'a mut dyn FnMut(T) -> bool) -> Self {
        Self { consume, stopped: false }
    }

    /// Offer one element; returns whether more are wanted.
    pub(crate) fn push(&mut self, item: T) -> bool {
        if self.stopped {
            return false;
        }
        if !(self.consume)(item) {
            self.stopped = true;
        }
        !self.stopped
    }

    pub(crate) fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub(crate) fn flow(&self) -> Flow {
        if self.stopped {
            Flow::Stopped
        } else {
            Flow::Exhausted
        }
    }
}

/// Producer backed by a function that drives an arbitrary external source
pub struct FnProducer<F> {
    f: F,
}

impl<F> FnProducer<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<T, F> Producer<T> for FnProducer<F>
where
    F: Fn(&mut dyn FnMut(T) -> bool) -> SeqResult<Flow> + Send + Sync,
{
    fn produce(&self, consume: &mut dyn FnMut(T) -> bool) -> SeqResult<Flow> {
        let mut downstream = Downstream::new(consume);
        (self.f)(&mut |item| downstream.push(item))?;
        Ok(downstream.flow())
    }
}

/// Hands a resource that can only be read once to exactly one traversal
pub(crate) struct SingleUse<R> {
    resource: Mutex<Option<R>>,
    what: &'static str,
}

impl<R> SingleUse<R> {
    pub(crate) fn new(resource: R, what: &'static str) -> Self {
        Self {
            resource: Mutex::new(Some(resource)),
            what,
        }
    }

    /// Claim the resource, or fail if an earlier traversal already did
    pub(crate) fn take(&self) -> SeqResult<R> {
        let taken = self
            .resource
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        taken.ok_or_else(|| {
            log::warn!("{} driven a second time", self.what);
            SeqError::AlreadyConsumed(self.what)
        })
    }
}

/// Offer every element of `items` in order until the consumer stops
pub(crate) fn push_all<T>(items: impl IntoIterator<Item = T>, consume: &mut dyn FnMut(T) -> bool) -> Flow {
    for item in items {
        if !consume(item) {
            return Flow::Stopped;
        }
    }
    Flow::Exhausted
}
