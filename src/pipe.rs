use crate::sequence::Sequence;
use std::sync::Arc;

/// A Pipe is a reusable sequence transformation from one element type to another.
/// It's a function from `Sequence<I>` to `Sequence<O>`.
pub struct Pipe<I, O> {
    f: Arc<dyn Fn(Sequence<I>) -> Sequence<O> + Send + Sync + 'static>,
}

impl<I, O> Clone for Pipe<I, O> {
    fn clone(&self) -> Self {
        Pipe {
            f: Arc::clone(&self.f),
        }
    }
}

impl<I, O> Pipe<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
{
    /// Create a new pipe from a function
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Sequence<I>) -> Sequence<O> + Send + Sync + 'static,
    {
        Pipe { f: Arc::new(f) }
    }

    /// Apply this pipe to a sequence. Nothing is driven until the result is.
    pub fn apply(&self, input: Sequence<I>) -> Sequence<O> {
        (self.f)(input)
    }

    /// Run this pipe, then `next`
    pub fn then<P>(self, next: Pipe<O, P>) -> Pipe<I, P>
    where
        P: Send + 'static,
    {
        compose(self, next)
    }
}

/// Create a pipe that applies the given function to each element
pub fn map<I, O, F>(f: F) -> Pipe<I, O>
where
    F: Fn(I) -> O + Send + Sync + Clone + 'static,
    I: Send + 'static,
    O: Send + 'static,
{
    Pipe::new(move |input: Sequence<I>| input.map(f.clone()))
}

/// Create a pipe that keeps the elements matching the predicate
pub fn filter<I, F>(predicate: F) -> Pipe<I, I>
where
    F: Fn(&I) -> bool + Send + Sync + Clone + 'static,
    I: Send + 'static,
{
    Pipe::new(move |input: Sequence<I>| input.filter(predicate.clone()))
}

/// Create a pipe that keeps the first `n` elements
pub fn take<I>(n: usize) -> Pipe<I, I>
where
    I: Send + 'static,
{
    Pipe::new(move |input: Sequence<I>| input.take(n))
}

/// Compose two pipes together
pub fn compose<I, M, O>(p1: Pipe<I, M>, p2: Pipe<M, O>) -> Pipe<I, O>
where
    I: Send + 'static,
    M: Send + 'static,
    O: Send + 'static,
{
    Pipe::new(move |input| p2.apply(p1.apply(input)))
}

/// Identity pipe that doesn't transform the sequence
pub fn identity<I>() -> Pipe<I, I>
where
    I: Send + 'static,
{
    Pipe::new(|input| input)
}

impl<T: Send + 'static> Sequence<T> {
    /// Run this sequence through `pipe`
    pub fn through<O>(self, pipe: &Pipe<T, O>) -> Sequence<O>
    where
        O: Send + 'static,
    {
        pipe.apply(self)
    }
}
