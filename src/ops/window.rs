//! Windowing operators.
//!
//! Window state lives on the stack of one traversal, so re-driving a windowed
//! sequence starts from an empty window.

use std::collections::VecDeque;

use crate::error::{SeqError, SeqResult};
use crate::pair::Pair;
use crate::producer::{Downstream, Flow, Producer};
use crate::sequence::Sequence;

struct Batched<T> {
    upstream: Sequence<T>,
    size: usize,
}

impl<T: Send + 'static> Producer<Vec<T>> for Batched<T> {
    fn produce(&self, consume: &mut dyn FnMut(Vec<T>) -> bool) -> SeqResult<Flow> {
        if self.size == 0 {
            return Err(SeqError::InvalidArgument("batch size must be positive".to_string()));
        }
        let mut downstream = Downstream::new(consume);
        let mut batch = Vec::with_capacity(self.size);
        self.upstream.produce(&mut |item| {
            batch.push(item);
            if batch.len() == self.size {
                let full = std::mem::replace(&mut batch, Vec::with_capacity(self.size));
                return downstream.push(full);
            }
            true
        })?;
        if !downstream.is_stopped() && !batch.is_empty() {
            downstream.push(batch);
        }
        Ok(downstream.flow())
    }
}

struct ChunkedBy<T, F> {
    upstream: Sequence<T>,
    starts_chunk: F,
}

impl<T, F> Producer<Vec<T>> for ChunkedBy<T, F>
where
    T: Send + 'static,
    F: Fn(&T) -> bool + Send + Sync,
{
    fn produce(&self, consume: &mut dyn FnMut(Vec<T>) -> bool) -> SeqResult<Flow> {
        let mut downstream = Downstream::new(consume);
        let mut chunk = Vec::new();
        self.upstream.produce(&mut |item| {
            let mut wanted = true;
            if (self.starts_chunk)(&item) && !chunk.is_empty() {
                wanted = downstream.push(std::mem::take(&mut chunk));
            }
            chunk.push(item);
            wanted
        })?;
        if !downstream.is_stopped() && !chunk.is_empty() {
            downstream.push(chunk);
        }
        Ok(downstream.flow())
    }
}

struct Pairwise<T> {
    upstream: Sequence<T>,
}

impl<T: Clone + Send + 'static> Producer<Pair<T, T>> for Pairwise<T> {
    fn produce(&self, consume: &mut dyn FnMut(Pair<T, T>) -> bool) -> SeqResult<Flow> {
        let mut previous: Option<T> = None;
        self.upstream.produce(&mut |item| match previous.replace(item.clone()) {
            Some(prev) => consume(Pair::new(prev, item)),
            None => true,
        })
    }
}

struct Pairs<T> {
    upstream: Sequence<T>,
}

impl<T: Send + 'static> Producer<Pair<T, T>> for Pairs<T> {
    fn produce(&self, consume: &mut dyn FnMut(Pair<T, T>) -> bool) -> SeqResult<Flow> {
        let mut pending: Option<T> = None;
        // A trailing unpaired element stays in `pending` and is dropped.
        self.upstream.produce(&mut |item| match pending.take() {
            Some(first) => consume(Pair::new(first, item)),
            None => {
                pending = Some(item);
                true
            }
        })
    }
}

struct Sliding<T> {
    upstream: Sequence<T>,
    size: usize,
}

impl<T: Clone + Send + 'static> Producer<Vec<T>> for Sliding<T> {
    fn produce(&self, consume: &mut dyn FnMut(Vec<T>) -> bool) -> SeqResult<Flow> {
        if self.size == 0 {
            return Err(SeqError::InvalidArgument("window size must be positive".to_string()));
        }
        let mut window = VecDeque::with_capacity(self.size);
        self.upstream.produce(&mut |item| {
            if window.len() == self.size {
                window.pop_front();
            }
            window.push_back(item);
            if window.len() == self.size {
                consume(window.iter().cloned().collect())
            } else {
                true
            }
        })
    }
}

impl<T: Send + 'static> Sequence<T> {
    /// Consecutive non-overlapping batches of `size` elements; the last batch
    /// may be shorter. A zero size fails when driven.
    pub fn batched(self, size: usize) -> Sequence<Vec<T>> {
        Sequence::new(Batched { upstream: self, size })
    }

    /// Split into chunks, starting a new chunk at every element for which
    /// `starts_chunk` holds (unless the current chunk is still empty)
    pub fn chunked_by<F>(self, starts_chunk: F) -> Sequence<Vec<T>>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Sequence::new(ChunkedBy {
            upstream: self,
            starts_chunk,
        })
    }

    /// Overlapping consecutive pairs `(s0, s1), (s1, s2), ...`
    pub fn pairwise(self) -> Sequence<Pair<T, T>>
    where
        T: Clone,
    {
        Sequence::new(Pairwise { upstream: self })
    }

    /// Non-overlapping pairs `(s0, s1), (s2, s3), ...`; an odd trailing element
    /// is dropped. Use [`Sequence::batched`] with size 2 to keep it.
    pub fn pairs(self) -> Sequence<Pair<T, T>> {
        Sequence::new(Pairs { upstream: self })
    }

    /// Overlapping windows of exactly `size` elements, advancing by one
    pub fn sliding(self, size: usize) -> Sequence<Vec<T>>
    where
        T: Clone,
    {
        Sequence::new(Sliding { upstream: self, size })
    }
}
