//! The public lazy-sequence handle.
//!
//! A [`Sequence`] owns one [`Producer`] and nothing else. Operators never run
//! anything when called: they wrap the current producer in a new one and hand
//! back a new `Sequence`. Work happens only when a terminal action drives the
//! outermost producer.

use std::fmt;
use std::sync::Arc;

use crate::error::SeqResult;
use crate::producer::{Flow, Producer};

/// A lazy, possibly infinite sequence of `T`
pub struct Sequence<T> {
    producer: Arc<dyn Producer<T>>,
}

impl<T> Clone for Sequence<T> {
    fn clone(&self) -> Self {
        Sequence {
            producer: Arc::clone(&self.producer),
        }
    }
}

impl<T> fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence").finish_non_exhaustive()
    }
}

impl<T: Send + 'static> Sequence<T> {
    /// Wrap a producer
    pub fn new<P>(producer: P) -> Self
    where
        P: Producer<T> + 'static,
    {
        Sequence {
            producer: Arc::new(producer),
        }
    }

    /// Drive the sequence once, feeding every element to `consume` until it returns `false`
    pub fn produce(&self, consume: &mut dyn FnMut(T) -> bool) -> SeqResult<Flow> {
        self.producer.produce(consume)
    }
}

impl<T: Send + 'static> Producer<T> for Sequence<T> {
    fn produce(&self, consume: &mut dyn FnMut(T) -> bool) -> SeqResult<Flow> {
        self.producer.produce(consume)
    }
}
